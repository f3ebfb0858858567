use std::collections::HashSet;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

use crate::error::{PwhoisError, Result};
use crate::servers::ServerConfig;

/// Application identifier sent with every query, similar to an HTTP user agent
pub const APP_NAME: &str = "GO pwhois Module";

/// Protocol constants
pub const BATCH_START: &str = "begin\n";
pub const BATCH_END: &str = "end\n";
pub const SOURCE_AS_PARAM: &str = "source-as=";

/// The four lookups the pwhois service answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Ip,
    RouteView,
    Netblock,
    Registry,
}

impl QueryKind {
    /// Wire keyword for ASN queries. Address queries carry none.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            QueryKind::Ip => None,
            QueryKind::RouteView => Some("routeview"),
            QueryKind::Netblock => Some("netblock"),
            QueryKind::Registry => Some("registry"),
        }
    }

    pub fn is_asn_query(&self) -> bool {
        self.keyword().is_some()
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().unwrap_or("ip"))
    }
}

impl FromStr for QueryKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ip" | "address" => Ok(QueryKind::Ip),
            "routeview" => Ok(QueryKind::RouteView),
            "netblock" => Ok(QueryKind::Netblock),
            "registry" => Ok(QueryKind::Registry),
            other => Err(format!("unknown query kind: {}", other)),
        }
    }
}

/// A serialized pwhois query together with the keys it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    kind: QueryKind,
    keys: Vec<String>,
    text: String,
}

impl Query {
    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    /// Validated addresses for an address query, or the bare ASN
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The ASN this query was built for, if it is an ASN query
    pub fn asn(&self) -> Option<&str> {
        if self.kind.is_asn_query() {
            self.keys.first().map(String::as_str)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Builds wire queries bounded by a session's batch limit
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder {
    max_batch_size: usize,
}

impl QueryBuilder {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            max_batch_size: config.max_batch_size(),
        }
    }

    /// Build an address query.
    ///
    /// Values that are not IPv4/IPv6 addresses are dropped, duplicates are
    /// removed keeping first-seen order. One address yields the single-line
    /// form, more than one is wrapped in `begin`/`end`.
    pub fn ip<S: AsRef<str>>(&self, values: &[S]) -> Result<Query> {
        let mut seen = HashSet::new();
        let addresses: Vec<String> = values
            .iter()
            .map(AsRef::as_ref)
            .filter(|value| value.parse::<IpAddr>().is_ok())
            .filter(|value| seen.insert(*value))
            .map(str::to_string)
            .collect();

        if addresses.is_empty() {
            return Err(PwhoisError::NoValidInput);
        }
        if addresses.len() > self.max_batch_size {
            return Err(PwhoisError::BatchTooLarge {
                size: addresses.len(),
                max: self.max_batch_size,
            });
        }

        let mut text = format!("app=\"{}\"\n", APP_NAME);
        if let [address] = addresses.as_slice() {
            text.push_str(address);
            text.push('\n');
        } else {
            text.push_str(BATCH_START);
            for address in &addresses {
                text.push_str(address);
                text.push('\n');
            }
            text.push_str(BATCH_END);
        }

        Ok(Query {
            kind: QueryKind::Ip,
            keys: addresses,
            text,
        })
    }

    pub fn routeview(&self, asn: &str) -> Result<Query> {
        Self::asn_query(QueryKind::RouteView, asn)
    }

    /// Netblock queries additionally require a purely numeric ASN.
    pub fn netblock(&self, asn: &str) -> Result<Query> {
        Self::asn_query(QueryKind::Netblock, asn)
    }

    pub fn registry(&self, asn: &str) -> Result<Query> {
        Self::asn_query(QueryKind::Registry, asn)
    }

    /// Build a query of any kind. ASN kinds use the first value only.
    pub fn build<S: AsRef<str>>(&self, kind: QueryKind, values: &[S]) -> Result<Query> {
        match kind {
            QueryKind::Ip => self.ip(values),
            _ => {
                if values.len() > 1 {
                    warn!(
                        kind = %kind,
                        ignored = values.len() - 1,
                        "ASN lookups take one value, extra values are ignored"
                    );
                }
                let asn = values.first().map(AsRef::as_ref).unwrap_or_default();
                Self::asn_query(kind, asn)
            }
        }
    }

    fn asn_query(kind: QueryKind, asn: &str) -> Result<Query> {
        let asn = strip_as_prefix(asn.trim());
        if asn.is_empty() {
            return Err(PwhoisError::NoValidInput);
        }
        if kind == QueryKind::Netblock && !is_only_digits(asn) {
            return Err(PwhoisError::InvalidAsn(asn.to_string()));
        }

        let keyword = kind.keyword().unwrap_or_default();
        let text = format!(
            "app=\"{}\" {} {}{}\n",
            APP_NAME, keyword, SOURCE_AS_PARAM, asn
        );

        Ok(Query {
            kind,
            keys: vec![asn.to_string()],
            text,
        })
    }
}

/// Strip an optional `AS`/`as` prefix from an ASN token
pub fn strip_as_prefix(asn: &str) -> &str {
    asn.strip_prefix("AS")
        .or_else(|| asn.strip_prefix("as"))
        .unwrap_or(asn)
}

fn is_only_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
