use std::fmt;

use reqwest::StatusCode;

use crate::probe::RawOutcome;

/// Three-level verdict of a probe.
///
/// `Warning` is part of the report vocabulary but no classifier produces it yet;
/// soft thresholds (e.g. a slow ping) belong there rather than in `Pass` or `Fail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pass,
    #[allow(dead_code)]
    Warning,
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Pass => "Pass",
            Status::Warning => "Warning",
            Status::Fail => "Fail",
        };
        f.write_str(name)
    }
}

/// Map a raw outcome to its status and report detail.
pub fn classify(outcome: &RawOutcome) -> (Status, String) {
    match outcome {
        RawOutcome::PingOk { round_trip_ms } => (Status::Pass, format!("{round_trip_ms}ms")),
        RawOutcome::PingStatus { code } => (Status::Fail, code.to_string()),
        RawOutcome::PingError { message } => (Status::Fail, message.clone()),
        RawOutcome::WebOk { status_code } => classify_status(*status_code),
        RawOutcome::WebHttpError {
            status_code,
            message,
        } => {
            let status = if is_unauthenticated(*status_code) {
                Status::Pass
            } else {
                Status::Fail
            };
            (status, message.clone())
        }
        RawOutcome::WebTransportError { message } => (Status::Fail, message.clone()),
    }
}

/// 401 and 403 prove the target answered; the probe simply carries no credentials.
fn is_unauthenticated(status_code: u16) -> bool {
    status_code == 401 || status_code == 403
}

fn classify_status(status_code: u16) -> (Status, String) {
    if (200..400).contains(&status_code) {
        return (Status::Pass, status_code.to_string());
    }

    let status = if is_unauthenticated(status_code) {
        Status::Pass
    } else {
        Status::Fail
    };
    (status, with_reason(status_code))
}

fn with_reason(status_code: u16) -> String {
    match StatusCode::from_u16(status_code)
        .ok()
        .and_then(|code| code.canonical_reason())
    {
        Some(reason) => format!("{status_code} {reason}"),
        None => status_code.to_string(),
    }
}
