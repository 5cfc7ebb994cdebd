pub mod ping;
pub mod web;

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use trust_dns_resolver::TokioAsyncResolver;

use crate::config::probe_config::{PingTarget, WebTarget};

/// The detail reported for a probe that exceeded its deadline.
pub const TIMED_OUT: &str = "TimedOut";

/// A single reachability check against one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Ping { title: String, address: String },
    Web { title: String, url: String },
}

/// Discriminated status of an ICMP echo that did not produce a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    TimedOut,
    DestinationNetworkUnreachable,
    DestinationHostUnreachable,
}

/// What executing a probe produced, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOutcome {
    PingOk { round_trip_ms: u64 },
    PingStatus { code: ReplyStatus },
    PingError { message: String },
    WebOk { status_code: u16 },
    WebHttpError { status_code: u16, message: String },
    WebTransportError { message: String },
}

/// Resources shared read-only by every probe of a session.
#[derive(Clone)]
pub struct ProbeContext {
    pub http: Client,
    pub resolver: TokioAsyncResolver,
}

impl Probe {
    pub fn title(&self) -> &str {
        match self {
            Probe::Ping { title, .. } | Probe::Web { title, .. } => title,
        }
    }

    /// The probed target: the ping address or the web URL.
    pub fn address(&self) -> &str {
        match self {
            Probe::Ping { address, .. } => address,
            Probe::Web { url, .. } => url,
        }
    }

    /// Execute the probe. Never fails: every failure mode is a `RawOutcome` variant.
    pub async fn execute(&self, context: &ProbeContext, deadline: Duration) -> RawOutcome {
        match self {
            Probe::Ping { address, .. } => ping::execute(address, &context.resolver, deadline).await,
            Probe::Web { url, .. } => web::execute(url, &context.http, deadline).await,
        }
    }

    /// The outcome used when the probe did not finish before its deadline.
    pub fn timed_out(&self) -> RawOutcome {
        match self {
            Probe::Ping { .. } => RawOutcome::PingStatus {
                code: ReplyStatus::TimedOut,
            },
            Probe::Web { .. } => RawOutcome::WebTransportError {
                message: TIMED_OUT.to_string(),
            },
        }
    }
}

impl From<&PingTarget> for Probe {
    fn from(target: &PingTarget) -> Self {
        Probe::Ping {
            title: target.title.clone(),
            address: target.address.clone(),
        }
    }
}

impl From<&WebTarget> for Probe {
    fn from(target: &WebTarget) -> Self {
        Probe::Web {
            title: target.title.clone(),
            url: target.url.clone(),
        }
    }
}

impl ReplyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyStatus::TimedOut => TIMED_OUT,
            ReplyStatus::DestinationNetworkUnreachable => "DestinationNetworkUnreachable",
            ReplyStatus::DestinationHostUnreachable => "DestinationHostUnreachable",
        }
    }
}

impl fmt::Display for ReplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shorten an error to the message of its innermost cause.
/// Transport errors wrap the interesting part (refused, reset, unknown host)
/// several layers deep, and the report only has room for one line.
fn root_cause(mut err: &(dyn std::error::Error + 'static)) -> String {
    while let Some(src) = err.source() {
        err = src;
    }
    err.to_string()
}
