// # nasddns - NAS DDNS update client
//
// Thin integration layer: parses arguments, sets up logging and the
// runtime, and wires the provider, IP source and reconciler together.
// All record logic lives in nasddns-core.
//
// ## Usage
//
// ```bash
// nasddns USERNAME PASSWORD HOSTNAME [IP] [IP_GRABBER_URL]
// ```
//
// The status token (`good`, `nochg`, `badauth`, ...) is printed to stdout,
// the human-readable message to stderr. Exit code is 0 for `good`/`nochg`
// and 1 for everything else.
//
// ## Configuration
//
// Everything beyond the positional arguments is optional and can be set
// via flags or environment variables:
//
// - `DDNS_TTL`: TTL for created/updated records (default 300)
// - `DDNS_API_BASE`: Record API base URL
// - `DDNS_HTTP_TIMEOUT`: Per-request timeout in seconds (default 30)
// - `DDNS_INSECURE`: Skip TLS certificate verification
// - `DDNS_USER_AGENT`: User-Agent header
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default warn)
//
// ## Example
//
// ```bash
// export DDNS_API_BASE=https://api.example-dns.net/v1
// nasddns alice s3cret nas.example.com
// ```

use clap::Parser;
use nasddns_core::record::parse_ipv4;
use nasddns_core::status::{self, Status};
use nasddns_core::traits::{IpSource, StaticIpSource};
use nasddns_core::{Error, Reconciler, RecordApiClient, RunConfig, Target, hostname};
use nasddns_ip_http::HttpIpSource;
use nasddns_provider_session::SessionApi;
use std::process::ExitCode;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes reported to the NAS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// `good` or `nochg`
    Success = 0,
    /// Any other status token
    Failure = 1,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<&Status> for DdnsExitCode {
    fn from(status: &Status) -> Self {
        if status.success {
            DdnsExitCode::Success
        } else {
            DdnsExitCode::Failure
        }
    }
}

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "nasddns", version)]
#[command(about = "Point a DNS A record at this machine's public IP")]
struct Args {
    /// Provider account username
    username: String,

    /// Provider account password
    password: String,

    /// Fully-qualified hostname to update
    hostname: String,

    /// IPv4 address to publish (looked up when omitted)
    ip: Option<String>,

    /// URL returning the public IP as plain text
    ip_grabber_url: Option<String>,

    /// TTL for created or updated records (seconds)
    #[arg(long, env = "DDNS_TTL", default_value_t = nasddns_core::record::DEFAULT_TTL)]
    ttl: u32,

    /// Record API base URL
    #[arg(long, env = "DDNS_API_BASE")]
    api_base: Option<String>,

    /// Per-request timeout (seconds)
    #[arg(long, env = "DDNS_HTTP_TIMEOUT", default_value_t = 30)]
    timeout_secs: u64,

    /// Skip TLS certificate verification
    #[arg(long, env = "DDNS_INSECURE")]
    insecure: bool,

    /// User-Agent header
    #[arg(long, env = "DDNS_USER_AGENT")]
    user_agent: Option<String>,

    /// Log level (logs go to stderr)
    #[arg(long, env = "DDNS_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

impl Args {
    /// Build the run configuration
    ///
    /// Empty optional positionals count as absent; some NAS firmwares pass
    /// `""` for fields the user left blank.
    fn into_config(self) -> RunConfig {
        let mut config = RunConfig::new(self.username, self.password, self.hostname);

        config.ip = self.ip.filter(|s| !s.trim().is_empty());
        if let Some(url) = self.ip_grabber_url.filter(|s| !s.trim().is_empty()) {
            config.ip_grabber_url = url;
        }
        if let Some(api_base) = self.api_base {
            config.api_base = api_base;
        }
        config.ttl = self.ttl;
        config.http.timeout_secs = self.timeout_secs;
        config.http.verify_tls = !self.insecure;
        if let Some(user_agent) = self.user_agent {
            config.http.user_agent = user_agent;
        }

        config
    }
}

fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

/// Print the status the way NAS DDNS clients expect and pick the exit code
fn emit(status: &Status) -> ExitCode {
    eprintln!("{}", status.message);
    println!("{}", status.token);
    DdnsExitCode::from(status).into()
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => e.exit(), // --help / --version
        Err(e) => {
            return emit(&status::report_error(&Error::config(e.to_string())));
        }
    };

    // Initialize tracing (stderr only; stdout carries the status token)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_log_level(&args.log_level))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let config = args.into_config();
    debug!("Configuration: {:?}", config);

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            return emit(&status::report_error(&Error::Other(format!(
                "Failed to create tokio runtime: {}",
                e
            ))));
        }
    };

    let status = rt.block_on(run(config));
    emit(&status)
}

/// Run one update and report its status
async fn run(config: RunConfig) -> Status {
    let fqdn = config.hostname.clone();

    match update(&config).await {
        Ok((outcome, target)) => {
            info!("{}: {}", target.fqdn(), outcome);
            status::report(&Ok(outcome), &target.fqdn(), target.desired_value())
        }
        Err(e) => {
            debug!("Update of {} failed: {}", fqdn, e);
            status::report_error(&e)
        }
    }
}

/// Resolve the target and reconcile it at the provider
async fn update(config: &RunConfig) -> nasddns_core::Result<(nasddns_core::Outcome, Target)> {
    config.validate()?;

    // Local validation before any network call
    hostname::split(&config.hostname)?;
    let ip_source: Box<dyn IpSource> = match &config.ip {
        Some(raw) => Box::new(StaticIpSource::new(parse_ipv4(raw)?)),
        None => Box::new(HttpIpSource::new(&config.ip_grabber_url, &config.http)?),
    };

    let ip = ip_source.current().await?;
    debug!("Desired IP {} from {} source", ip, ip_source.source_name());

    let target = Target::new(&config.hostname, ip, config.ttl)?;

    let api = SessionApi::new(&config.api_base, config.credentials.clone(), &config.http)?;
    let client = RecordApiClient::connect(api.clone(), api).await?;

    let outcome = Reconciler::new(Box::new(client)).reconcile(&target).await?;
    Ok((outcome, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["nasddns", "alice", "s3cret", "nas.example.com"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).expect("arguments parse")
    }

    #[test]
    fn test_positional_arguments() {
        let config = args(&["1.2.3.4", "https://ifconfig.me/ip"]).into_config();
        assert_eq!(config.credentials.username, "alice");
        assert_eq!(config.credentials.password, "s3cret");
        assert_eq!(config.hostname, "nas.example.com");
        assert_eq!(config.ip.as_deref(), Some("1.2.3.4"));
        assert_eq!(config.ip_grabber_url, "https://ifconfig.me/ip");
    }

    #[test]
    fn test_empty_optional_positionals_are_absent() {
        let config = args(&["", ""]).into_config();
        assert_eq!(config.ip, None);
        assert_eq!(config.ip_grabber_url, "https://api.ipify.org");
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = args(&["--ttl", "600", "--insecure", "--timeout-secs", "5"]).into_config();
        assert_eq!(config.ttl, 600);
        assert!(!config.http.verify_tls);
        assert_eq!(config.http.timeout_secs, 5);
    }

    #[test]
    fn test_missing_hostname_is_rejected() {
        assert!(Args::try_parse_from(["nasddns", "alice", "s3cret"]).is_err());
    }

    #[test]
    fn test_exit_codes() {
        let good = status::report(&Ok(nasddns_core::Outcome::UpdateApplied), "h", "1.2.3.4");
        let nochg = status::report(&Ok(nasddns_core::Outcome::NoChangeNeeded), "h", "1.2.3.4");
        let badauth = status::report_error(&Error::auth("nope"));

        assert_eq!(DdnsExitCode::from(&good), DdnsExitCode::Success);
        assert_eq!(DdnsExitCode::from(&nochg), DdnsExitCode::Success);
        assert_eq!(DdnsExitCode::from(&badauth), DdnsExitCode::Failure);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_log_level("bogus"), Level::WARN);
    }

    #[tokio::test]
    async fn test_invalid_hostname_fails_before_network() {
        let mut config = RunConfig::new("alice", "s3cret", "-bad-.com");
        config.ip = Some("1.2.3.4".to_string());
        // Unroutable base URL: reaching the network would fail differently
        config.api_base = "http://127.0.0.1:1".to_string();

        assert_eq!(run(config).await.token, "notfqdn");
    }

    #[tokio::test]
    async fn test_empty_hostname_is_notfqdn() {
        let mut config = RunConfig::new("alice", "s3cret", "");
        config.ip = Some("1.2.3.4".to_string());
        config.api_base = "http://127.0.0.1:1".to_string();

        let status = run(config).await;
        assert_eq!(status.token, "notfqdn");
        assert!(!status.success);
    }

    #[tokio::test]
    async fn test_invalid_ip_is_badparam() {
        let mut config = RunConfig::new("alice", "s3cret", "nas.example.com");
        config.ip = Some("not-an-ip".to_string());
        config.api_base = "http://127.0.0.1:1".to_string();

        assert_eq!(run(config).await.token, "badparam");
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_badresolv() {
        let mut config = RunConfig::new("alice", "s3cret", "nas.example.com");
        config.ip = Some("1.2.3.4".to_string());
        config.api_base = "http://127.0.0.1:1".to_string();

        let status = run(config).await;
        assert_eq!(status.token, "badresolv");
        assert!(!status.success);
    }
}
