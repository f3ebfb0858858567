use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::connection::Connection;
use crate::error::{PwhoisError, Result};
use crate::parse::{self, classify};
use crate::protocol::{Query, QueryBuilder};
use crate::records::{
    IpLookup, Lookup, NetblockRecord, Records, Registry, RegistryRecord, RouteViewResult, WhoIs,
};
use crate::servers::ServerConfig;

/// A single request/response cycle against a pwhois server.
///
/// A session owns at most one connection. The connection is consumed by the
/// first lookup, so every lookup needs its own connected session.
#[derive(Debug)]
pub struct Session {
    config: ServerConfig,
    connection: Option<Connection>,
}

impl Session {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            connection: None,
        }
    }

    /// Create a session and connect it right away
    pub async fn connected(config: ServerConfig) -> Result<Self> {
        let mut session = Self::new(config);
        session.connect().await?;
        Ok(session)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn builder(&self) -> QueryBuilder {
        QueryBuilder::new(&self.config)
    }

    /// Establish the session's connection. Connecting an already connected
    /// session is a no-op.
    pub async fn connect(&mut self) -> Result<()> {
        if self.connection.is_none() {
            self.connection = Some(Connection::open(&self.config).await?);
        }
        Ok(())
    }

    /// Run any prepared query, dispatching on its kind
    pub async fn lookup(&mut self, query: &Query) -> Result<Lookup> {
        let response = self.exchange(query).await?;
        let records = parse::parse_response(query.kind(), &response)?;

        match records {
            Records::Ip(records) => finish_ip(query, records).map(Lookup::Ip),
            Records::RouteView(result) => Ok(Lookup::RouteView(finish_routeview(query, result))),
            Records::Netblock(records) => finish_netblock(query, records).map(Lookup::Netblock),
            Records::Registry(records) => finish_registry(query, records).map(Lookup::Registry),
        }
    }

    /// Look up one or more IP addresses
    pub async fn lookup_ip<S: AsRef<str>>(&mut self, addresses: &[S]) -> Result<IpLookup> {
        let query = self.builder().ip(addresses)?;
        let response = self.exchange(&query).await?;
        classify::check(&response)?;
        finish_ip(&query, parse::ip::parse(&response)?)
    }

    /// Look up the prefixes an ASN announces
    pub async fn lookup_routeview(&mut self, asn: &str) -> Result<RouteViewResult> {
        let query = self.builder().routeview(asn)?;
        let response = self.exchange(&query).await?;
        classify::check(&response)?;
        Ok(finish_routeview(&query, parse::routeview::parse(&response)?))
    }

    /// Look up the address blocks registered to an ASN
    pub async fn lookup_netblock(&mut self, asn: &str) -> Result<NetblockRecord> {
        let query = self.builder().netblock(asn)?;
        let response = self.exchange(&query).await?;
        classify::check(&response)?;
        finish_netblock(&query, parse::netblock::parse(&response)?)
    }

    /// Look up the registration record of an ASN
    pub async fn lookup_registry(&mut self, asn: &str) -> Result<RegistryRecord> {
        let query = self.builder().registry(asn)?;
        let response = self.exchange(&query).await?;
        classify::check(&response)?;
        finish_registry(&query, parse::registry::parse(&response)?)
    }

    async fn exchange(&mut self, query: &Query) -> Result<String> {
        let connection = self.connection.take().ok_or(PwhoisError::NotConnected)?;
        info!(server = %connection.address(), kind = %query.kind(), keys = query.keys().len(), "Running pwhois lookup");
        connection.exchange(query).await
    }
}

fn finish_ip(query: &Query, records: Vec<WhoIs>) -> Result<IpLookup> {
    if records.is_empty() {
        return Err(PwhoisError::NoRecordsReturned);
    }
    Ok(IpLookup {
        addresses: query.keys().to_vec(),
        records,
    })
}

fn finish_routeview(query: &Query, mut result: RouteViewResult) -> RouteViewResult {
    result.asn = query.asn().unwrap_or_default().to_string();
    result
}

fn finish_netblock(query: &Query, records: Vec<NetblockRecord>) -> Result<NetblockRecord> {
    let mut record = records
        .into_iter()
        .next()
        .ok_or(PwhoisError::NoRecordsReturned)?;
    record.asn = query.asn().unwrap_or_default().to_string();
    Ok(record)
}

fn finish_registry(query: &Query, records: Vec<Registry>) -> Result<RegistryRecord> {
    let registry = records
        .into_iter()
        .next()
        .ok_or(PwhoisError::NoRecordsReturned)?;
    Ok(RegistryRecord {
        asn: query.asn().unwrap_or_default().to_string(),
        registry,
    })
}

/// Run one lookup on its own task.
///
/// Exactly one result, success or error, is sent on the returned channel.
pub fn spawn_lookup(mut session: Session, query: Query) -> oneshot::Receiver<Result<Lookup>> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let result = session.lookup(&query).await;
        if tx.send(result).is_err() {
            debug!("Lookup receiver dropped before the result was delivered");
        }
    });
    rx
}
