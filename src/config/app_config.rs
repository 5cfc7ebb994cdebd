use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, ClientBuilder, redirect::Policy};
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{NameServerConfig, NameServerConfigGroup, Protocol, ResolverConfig, ResolverOpts},
};

use super::cli::Args;
use super::probe_config::{ConfigDocument, Settings};
use crate::error::ConfigError;

pub struct AppConfig {
    pub settings: Settings,
    pub log_dir: PathBuf,
    pub dns_hosts: Vec<String>,
    pub wait_for_key: bool,
}

/// Load the application configuration from the configuration document and the command line.
/// The document named by `--config` (or `CONFIG_FILE`) is parsed into `Settings`,
/// after which command line overrides are applied and the result is validated.
pub fn load_config(args: Args) -> Result<AppConfig, ConfigError> {
    let mut settings = read_settings(&args.config)?;

    if let Some(timeout) = args.timeout {
        settings.timeout = timeout;
    }
    validate(&settings)?;

    let dns_hosts: Vec<String> = args
        .dns_hosts
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    tracing::info!(
        "Loaded {} ping and {} web targets from {}, timeout {}ms",
        settings.ping_tests.len(),
        settings.web_tests.len(),
        args.config.display(),
        settings.timeout
    );

    Ok(AppConfig {
        settings,
        log_dir: args.log_dir,
        dns_hosts,
        wait_for_key: !args.no_wait,
    })
}

pub fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
    let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_settings(&config_str).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_settings(document: &str) -> Result<Settings, serde_yaml::Error> {
    serde_yaml::from_str::<ConfigDocument>(document).map(ConfigDocument::into_settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.timeout == 0 {
        return Err(ConfigError::Invalid(
            "Timeout must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

pub const USER_AGENT: &str = concat!("envprobe/", env!("CARGO_PKG_VERSION"));

/// Client settings derived from the configuration: redirects are followed up to
/// `max_redirects` hops (0 disables following) and requests carry `USER_AGENT`.
pub fn http_client_builder(settings: &Settings) -> ClientBuilder {
    let redirect = match settings.max_redirects {
        0 => Policy::none(),
        limit => Policy::limited(limit as usize),
    };

    Client::builder().redirect(redirect).user_agent(USER_AGENT)
}

/// Setup the HTTP client shared by all web probes.
/// The per-probe deadline is applied per request, not here.
pub fn setup_http_client(settings: &Settings) -> Result<Client, ConfigError> {
    Ok(http_client_builder(settings).build()?)
}

/// Setup the DNS resolver used to resolve ping hosts.
/// With explicit `dns_hosts` the resolver only queries those name servers,
/// otherwise the system configuration is used, falling back to the library defaults.
pub fn setup_resolver(dns_hosts: &[String]) -> Result<TokioAsyncResolver, ConfigError> {
    if dns_hosts.is_empty() {
        return Ok(match TokioAsyncResolver::tokio_from_system_conf() {
            Ok(resolver) => resolver,
            Err(e) => {
                tracing::warn!("Cannot read system DNS configuration, using defaults: {e}");
                TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
            }
        });
    }

    tracing::info!("Using DNS hosts: {:?}", dns_hosts);

    let mut opts = ResolverOpts::default();
    opts.attempts = 2;
    opts.timeout = Duration::from_millis(500);

    let mut name_servers = NameServerConfigGroup::new();

    for host in dns_hosts {
        let ip: IpAddr = host.parse().map_err(|source| ConfigError::DnsHost {
            host: host.clone(),
            source,
        })?;
        for protocol in [Protocol::Udp, Protocol::Tcp] {
            name_servers.push(NameServerConfig {
                socket_addr: (ip, 53).into(),
                protocol,
                tls_dns_name: None,
                trust_negative_responses: false,
                bind_addr: None,
            });
        }
    }

    let resolver_config = ResolverConfig::from_parts(None, vec![], name_servers);
    Ok(TokioAsyncResolver::tokio(resolver_config, opts))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::test_support::{http_client, spawn_server};

    fn args_for(path: &Path) -> Args {
        Args {
            config: path.to_path_buf(),
            log_dir: PathBuf::from("Logs"),
            timeout: None,
            dns_hosts: vec![],
            no_wait: true,
        }
    }

    #[test]
    fn test_load_config_applies_overrides() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "Timeout: 1000\nVersion: '3'\nPingTests:\n  - Title: Loopback\n    Address: 127.0.0.1"
        )
        .expect("write config");

        let mut args = args_for(file.path());
        args.timeout = Some(250);
        args.dns_hosts = vec![" 1.1.1.1".to_string(), "".to_string()];

        let config = load_config(args).expect("config loads");
        assert_eq!(config.settings.timeout, 250);
        assert_eq!(config.settings.version, "3");
        assert_eq!(config.dns_hosts, vec!["1.1.1.1".to_string()]);
        assert!(!config.wait_for_key);
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = load_config(args_for(&dir.path().join("absent.yml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_malformed_document_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "PingTests: [ {{ Title: x").expect("write config");
        let result = load_config(args_for(file.path()));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "Timeout: 0").expect("write config");
        let result = load_config(args_for(file.path()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_setup_http_client_builds() {
        let settings = parse_settings("MaxRedirects: 0").expect("settings");
        assert!(setup_http_client(&settings).is_ok());
    }

    #[tokio::test]
    async fn test_redirect_policy_follows_max_redirects() {
        let addr = spawn_server().await;
        let default_client = http_client(parse_settings("Version: '1'").expect("settings").max_redirects);
        let no_redirects = http_client(parse_settings("MaxRedirects: 0").expect("settings").max_redirects);

        let followed = default_client
            .get(format!("http://{addr}/redirect"))
            .send()
            .await
            .expect("response");
        assert_eq!(followed.status().as_u16(), 200);

        let looped = default_client.get(format!("http://{addr}/loop")).send().await;
        let err = looped.expect_err("redirect loop must not resolve");
        assert!(err.is_redirect());

        let not_followed = no_redirects
            .get(format!("http://{addr}/redirect"))
            .send()
            .await
            .expect("response");
        assert_eq!(not_followed.status().as_u16(), 302);

        let loop_not_followed = no_redirects
            .get(format!("http://{addr}/loop"))
            .send()
            .await
            .expect("response");
        assert_eq!(loop_not_followed.status().as_u16(), 302);
    }

    #[tokio::test]
    async fn test_requests_carry_user_agent() {
        let addr = spawn_server().await;
        let body = http_client(10)
            .get(format!("http://{addr}/user-agent"))
            .send()
            .await
            .expect("response")
            .text()
            .await
            .expect("body");
        assert_eq!(body, USER_AGENT);
        assert!(USER_AGENT.starts_with("envprobe/"));
    }

    #[tokio::test]
    async fn test_invalid_dns_host_is_rejected() {
        let result = setup_resolver(&["not-an-ip".to_string()]);
        assert!(matches!(result, Err(ConfigError::DnsHost { .. })));
    }
}
