use std::io::ErrorKind;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence, SurgeError};
use trust_dns_resolver::TokioAsyncResolver;

use super::{RawOutcome, ReplyStatus, root_cause};

const PAYLOAD: [u8; 32] = [0; 32];

static NEXT_IDENTIFIER: AtomicU16 = AtomicU16::new(0);

async fn resolve(address: &str, resolver: &TokioAsyncResolver) -> Result<IpAddr, String> {
    if let Ok(ip) = address.parse::<IpAddr>() {
        return Ok(ip);
    }

    let lookup = resolver.lookup_ip(address).await.map_err(|e| {
        tracing::debug!("Lookup of {address} failed: {e}");
        format!("No such host is known: {address}")
    })?;
    lookup
        .iter()
        .next()
        .ok_or_else(|| format!("No such host is known: {address}"))
}

fn identifier() -> PingIdentifier {
    let seed = std::process::id() as u16;
    PingIdentifier(seed.wrapping_add(NEXT_IDENTIFIER.fetch_add(1, Ordering::Relaxed)))
}

fn status_from_io(err: &std::io::Error) -> Option<ReplyStatus> {
    match err.kind() {
        ErrorKind::HostUnreachable => Some(ReplyStatus::DestinationHostUnreachable),
        ErrorKind::NetworkUnreachable => Some(ReplyStatus::DestinationNetworkUnreachable),
        ErrorKind::TimedOut => Some(ReplyStatus::TimedOut),
        _ => None,
    }
}

/// Send one ICMP echo to `address` and wait at most `deadline` for the reply.
pub async fn execute(address: &str, resolver: &TokioAsyncResolver, deadline: Duration) -> RawOutcome {
    let ip = match resolve(address, resolver).await {
        Ok(ip) => ip,
        Err(message) => return RawOutcome::PingError { message },
    };

    let config = match ip {
        IpAddr::V4(_) => Config::default(),
        IpAddr::V6(_) => Config::builder().kind(ICMP::V6).build(),
    };

    // Socket creation is where missing ICMP privileges show up.
    let client = match Client::new(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::debug!("Cannot open ICMP socket for {address}: {e}");
            return match status_from_io(&e) {
                Some(code) => RawOutcome::PingStatus { code },
                None => RawOutcome::PingError {
                    message: root_cause(&e),
                },
            };
        }
    };

    let mut pinger = client.pinger(ip, identifier()).await;
    pinger.timeout(deadline);

    match pinger.ping(PingSequence(0), &PAYLOAD).await {
        Ok((_, rtt)) => RawOutcome::PingOk {
            round_trip_ms: rtt.as_millis() as u64,
        },
        Err(SurgeError::Timeout { .. }) => RawOutcome::PingStatus {
            code: ReplyStatus::TimedOut,
        },
        Err(SurgeError::IOError(e)) => match status_from_io(&e) {
            Some(code) => RawOutcome::PingStatus { code },
            None => RawOutcome::PingError {
                message: root_cause(&e),
            },
        },
        Err(e) => RawOutcome::PingError {
            message: e.to_string(),
        },
    }
}
