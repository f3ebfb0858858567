use std::sync::LazyLock;

use anyhow::{bail, Result};
use clap::Parser;
use regex::Regex;

use crate::protocol::QueryKind;
use crate::servers::{ServerConfig, DEFAULT_BATCH_MAX_SIZE, DEFAULT_PWHOIS_PORT};

/// Pattern of an ASN target such as `AS13335` or `13335`
static ASN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:AS)?\d+$").expect("valid ASN pattern"));

#[derive(Parser)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "Query the Prefix WhoIs service for IP, routing and registry data"
)]
pub struct Cli {
    /// IP addresses to look up, or a single ASN
    #[arg(required = true, num_args = 1..)]
    pub targets: Vec<String>,

    /// Lookup to run: ip, routeview, netblock or registry
    #[arg(short, long, conflicts_with_all = ["routeview", "netblock", "registry"])]
    pub kind: Option<QueryKind>,

    /// Show the prefixes announced by the ASN (default for ASN targets)
    #[arg(long, conflicts_with_all = ["netblock", "registry"])]
    pub routeview: bool,

    /// Show the address blocks registered to the ASN
    #[arg(long, conflicts_with = "registry")]
    pub netblock: bool,

    /// Show the registration record of the ASN
    #[arg(long)]
    pub registry: bool,

    /// pwhois server to use
    #[arg(short, long)]
    pub server: Option<String>,

    /// Port number to use
    #[arg(short, long, default_value_t = DEFAULT_PWHOIS_PORT)]
    pub port: u16,

    /// Maximum number of addresses sent in one batch query
    #[arg(long, default_value_t = DEFAULT_BATCH_MAX_SIZE)]
    pub batch_size: usize,

    /// Display verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && !self.json
    }

    /// Select the lookup from flags, falling back to target detection
    pub fn query_kind(&self) -> QueryKind {
        if let Some(kind) = self.kind {
            kind
        } else if self.netblock {
            QueryKind::Netblock
        } else if self.registry {
            QueryKind::Registry
        } else if self.routeview || self.targets.first().is_some_and(|t| is_asn_target(t)) {
            QueryKind::RouteView
        } else {
            QueryKind::Ip
        }
    }

    /// ASN lookups take exactly one target
    pub fn check_targets(&self) -> Result<()> {
        let kind = self.query_kind();
        if kind.is_asn_query() && self.targets.len() > 1 {
            bail!(
                "{} lookup takes a single ASN, got {} targets",
                kind,
                self.targets.len()
            );
        }
        Ok(())
    }

    /// Server settings. Priority: explicit server > environment > default
    pub fn server_config(&self) -> ServerConfig {
        let host = self
            .server
            .clone()
            .or_else(ServerConfig::host_from_env)
            .unwrap_or_default();
        ServerConfig::new(host, self.port, self.batch_size)
    }
}

/// Check whether a target looks like an ASN rather than an address
pub fn is_asn_target(target: &str) -> bool {
    ASN_RE.is_match(target.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_cli(targets: &[&str]) -> Cli {
        Cli {
            targets: targets.iter().map(|t| t.to_string()).collect(),
            kind: None,
            routeview: false,
            netblock: false,
            registry: false,
            server: None,
            port: 43,
            batch_size: 500,
            verbose: false,
            json: false,
            no_color: false,
        }
    }

    #[test]
    fn test_use_color_default() {
        let cli = create_test_cli(&["8.8.8.8"]);
        assert!(cli.use_color());
    }

    #[test]
    fn test_use_color_disabled() {
        let mut cli = create_test_cli(&["8.8.8.8"]);
        cli.no_color = true;
        assert!(!cli.use_color());

        let mut cli = create_test_cli(&["8.8.8.8"]);
        cli.json = true;
        assert!(!cli.use_color());
    }

    #[test]
    fn test_query_kind_for_addresses() {
        let cli = create_test_cli(&["8.8.8.8", "1.1.1.1"]);
        assert_eq!(cli.query_kind(), QueryKind::Ip);
    }

    #[test]
    fn test_query_kind_asn_detection() {
        assert_eq!(create_test_cli(&["AS13335"]).query_kind(), QueryKind::RouteView);
        assert_eq!(create_test_cli(&["as13335"]).query_kind(), QueryKind::RouteView);
        assert_eq!(create_test_cli(&["13335"]).query_kind(), QueryKind::RouteView);
    }

    #[test]
    fn test_query_kind_flags() {
        let mut cli = create_test_cli(&["AS13335"]);
        cli.netblock = true;
        assert_eq!(cli.query_kind(), QueryKind::Netblock);

        let mut cli = create_test_cli(&["AS13335"]);
        cli.registry = true;
        assert_eq!(cli.query_kind(), QueryKind::Registry);
    }

    #[test]
    fn test_query_kind_option() {
        let mut cli = create_test_cli(&["8.8.8.8"]);
        cli.kind = Some(QueryKind::Registry);
        assert_eq!(cli.query_kind(), QueryKind::Registry);

        let cli = Cli::parse_from(["pwhois", "--kind", "netblock", "AS13335"]);
        assert_eq!(cli.kind, Some(QueryKind::Netblock));
        assert_eq!(cli.query_kind(), QueryKind::Netblock);

        let cli = Cli::parse_from(["pwhois", "-k", "ip", "8.8.8.8"]);
        assert_eq!(cli.query_kind(), QueryKind::Ip);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Cli::try_parse_from(["pwhois", "--kind", "bogus", "8.8.8.8"]).is_err());
        assert!(Cli::try_parse_from(["pwhois", "--kind", "ip", "--netblock", "AS1"]).is_err());
    }

    #[test]
    fn test_several_asn_targets_rejected() {
        let cli = create_test_cli(&["AS13335", "AS15169"]);
        let err = cli.check_targets().unwrap_err();
        assert_eq!(err.to_string(), "routeview lookup takes a single ASN, got 2 targets");

        let mut cli = create_test_cli(&["AS13335", "8.8.8.8"]);
        cli.registry = true;
        assert!(cli.check_targets().is_err());

        assert!(create_test_cli(&["AS13335"]).check_targets().is_ok());
        assert!(create_test_cli(&["8.8.8.8", "1.1.1.1"]).check_targets().is_ok());
    }

    #[test]
    fn test_is_asn_target() {
        assert!(is_asn_target("AS1236"));
        assert!(is_asn_target(" 1236 "));
        assert!(!is_asn_target("8.8.8.8"));
        assert!(!is_asn_target("AS12a"));
        assert!(!is_asn_target("2001:db8::1"));
    }

    #[test]
    fn test_server_config_explicit() {
        let mut cli = create_test_cli(&["8.8.8.8"]);
        cli.server = Some("127.0.0.1".to_string());
        cli.port = 4343;
        cli.batch_size = 10;

        let config = cli.server_config();
        assert_eq!(config.address(), "127.0.0.1:4343");
        assert_eq!(config.max_batch_size(), 10);
    }

    #[test]
    fn test_batch_size_zero_uses_default() {
        let mut cli = create_test_cli(&["8.8.8.8"]);
        cli.server = Some("127.0.0.1".to_string());
        cli.batch_size = 0;
        assert_eq!(cli.server_config().max_batch_size(), DEFAULT_BATCH_MAX_SIZE);
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::parse_from(["pwhois", "--netblock", "-p", "4343", "AS13335"]);
        assert!(cli.netblock);
        assert_eq!(cli.port, 4343);
        assert_eq!(cli.targets, vec!["AS13335"]);
    }

    #[test]
    fn test_conflicting_flags_rejected() {
        assert!(Cli::try_parse_from(["pwhois", "--netblock", "--registry", "AS13335"]).is_err());
    }
}
