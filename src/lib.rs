//! Async client for the Prefix WhoIs (pwhois) lookup service.
//!
//! ```no_run
//! use pwhois::{ServerConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> pwhois::Result<()> {
//!     let mut session = Session::connected(ServerConfig::default()).await?;
//!     let lookup = session.lookup_ip(&["8.8.8.8", "1.1.1.1"]).await?;
//!     for record in &lookup.records {
//!         println!("{} AS{} {}", record.ip, record.origin_as, record.org_name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod colorize;
pub mod connection;
pub mod error;
pub mod parse;
pub mod protocol;
pub mod records;
pub mod servers;
pub mod session;

pub use cli::Cli;
pub use colorize::{ColorScheme, OutputColorizer};
pub use connection::Connection;
pub use error::{PwhoisError, Result};
pub use protocol::{Query, QueryBuilder, QueryKind, APP_NAME};
pub use records::{
    BgpRoute, IpLookup, Lookup, Netblock, NetblockRecord, Records, Registry, RegistryRecord,
    RouteViewResult, WhoIs,
};
pub use servers::ServerConfig;
pub use session::{spawn_lookup, Session};
