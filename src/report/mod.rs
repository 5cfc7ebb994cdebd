pub mod log_file;

use chrono::{DateTime, Local};

use crate::classifier::Status;
use crate::probe::Probe;

pub const PING_GROUP_TITLE: &str = "Ping Tests";
pub const WEB_GROUP_TITLE: &str = "Web Tests";

/// The classified outcome of one probe.
/// `title` and `address` are copied from the probe before it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub title: String,
    pub address: String,
    pub status: Status,
    pub details: String,
}

impl ProbeResult {
    pub fn new(probe: &Probe, status: Status, details: impl Into<String>) -> Self {
        ProbeResult {
            title: probe.title().to_string(),
            address: probe.address().to_string(),
            status,
            details: details.into(),
        }
    }
}

/// Named, ordered results of one probe family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultGroup {
    pub title: String,
    pub results: Vec<ProbeResult>,
}

impl ResultGroup {
    pub fn new(title: impl Into<String>, results: Vec<ProbeResult>) -> Self {
        ResultGroup {
            title: title.into(),
            results,
        }
    }
}

/// Everything one session produced, ping group first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub groups: Vec<ResultGroup>,
}

/// Metadata printed in the report header.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub version: String,
    pub started_at: DateTime<Local>,
}

impl SessionInfo {
    pub fn now(version: impl Into<String>) -> Self {
        SessionInfo {
            version: version.into(),
            started_at: Local::now(),
        }
    }
}
