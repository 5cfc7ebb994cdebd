use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "envprobe")]
#[command(about = "Checks that this host can reach the services it depends on")]
#[command(version)]
pub struct Args {
    /// Configuration document (YAML or JSON)
    #[arg(long = "config", env = "CONFIG_FILE", default_value = "config.yml")]
    pub config: PathBuf,

    /// Directory the report is written to
    #[arg(long = "log-dir", env = "LOG_DIR", default_value = "Logs")]
    pub log_dir: PathBuf,

    /// Per-probe deadline in milliseconds, overrides the configured Timeout
    #[arg(long = "timeout")]
    pub timeout: Option<u64>,

    /// Name servers used to resolve ping hosts (e.g. 1.1.1.1,8.8.8.8).
    /// The system resolver configuration is used when omitted.
    #[arg(long = "dns-hosts", env = "DNS_HOSTS", value_delimiter = ',')]
    pub dns_hosts: Vec<String>,

    /// Exit right after writing the report instead of waiting for a keystroke
    #[arg(long = "no-wait", env = "NO_WAIT")]
    pub no_wait: bool,
}
