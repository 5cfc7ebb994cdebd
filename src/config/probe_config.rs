use serde::Deserialize;

/// The settings of one probing session.
/// Contains the per-probe timeout, the tool version printed in the report header,
/// and the ordered lists of ping and web targets.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Settings {
    /// Deadline in milliseconds applied to every probe.
    /// Defaults to 5000 if not specified.
    #[serde(default = "default_timeout_ms")]
    pub timeout: u64,

    /// The version emitted in the report header.
    #[serde(default)]
    pub version: String,

    /// Maximum number of redirects a web probe follows. 0 disables following.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,

    /// Hosts to ping, in report order.
    #[serde(default)]
    pub ping_tests: Vec<PingTarget>,

    /// URLs to fetch, in report order.
    #[serde(default)]
    pub web_tests: Vec<WebTarget>,
}

/// A host to send one ICMP echo to.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PingTarget {
    pub title: String,

    /// Host name or IP literal.
    pub address: String,
}

/// A URL to issue one HTTP GET against.
#[derive(Debug, Clone, Deserialize)]
pub struct WebTarget {
    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "URL")]
    pub url: String,
}

/// The configuration document. Either the settings mapping itself, or the
/// settings nested under a `Settings` key as in the classic appsettings layout.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ConfigDocument {
    Wrapped {
        #[serde(rename = "Settings")]
        settings: Settings,
    },
    Bare(Settings),
}

impl ConfigDocument {
    pub fn into_settings(self) -> Settings {
        match self {
            ConfigDocument::Wrapped { settings } | ConfigDocument::Bare(settings) => settings,
        }
    }
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_max_redirects() -> u32 {
    10
}
