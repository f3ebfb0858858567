use chrono::NaiveDateTime;
use serde::Serialize;

/// Geolocation, origin AS and organisation data for one IP address
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WhoIs {
    pub ip: String,
    pub origin_as: String,
    pub prefix: String,
    pub as_path: String,
    pub as_org_name: String,
    pub org_name: String,
    pub net_name: String,
    pub cache_date: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub region: String,
    pub country: String,
    pub country_code: String,
    pub route_originated_date: NaiveDateTime,
    pub route_originated_ts: i64,
}

/// Result of an address lookup, tagged with the addresses that were sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IpLookup {
    pub addresses: Vec<String>,
    pub records: Vec<WhoIs>,
}

/// One announced prefix from a routeview lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BgpRoute {
    pub prefix: String,
    pub create_date: NaiveDateTime,
    pub modify_date: NaiveDateTime,
    pub originated_date: NaiveDateTime,
    pub next_hop: String,
    pub as_path: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteViewResult {
    pub asn: String,
    pub origin_as: String,
    pub as_org_name: String,
    pub as_source: String,
    pub routes: Vec<BgpRoute>,
}

/// One registered address block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Netblock {
    pub name: String,
    pub net_type: String,
    pub range: String,
    pub register_date: NaiveDateTime,
    pub update_date: NaiveDateTime,
    pub create_date: NaiveDateTime,
    pub modify_date: NaiveDateTime,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetblockRecord {
    pub asn: String,
    pub as_number: i64,
    pub origin_as: String,
    pub as_source: String,
    pub org: i64,
    pub org_id: String,
    pub org_name: String,
    pub org_source: String,
    pub netblocks: Vec<Netblock>,
}

/// Registration and ownership data of an ASN's organisation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registry {
    pub org_record: String,
    pub org_id: String,
    pub org_name: String,
    pub can_allocate: bool,
    pub source: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub country_code: String,
    pub register_date: NaiveDateTime,
    pub update_date: NaiveDateTime,
    pub create_date: NaiveDateTime,
    pub modify_date: NaiveDateTime,
    pub admin_handle: String,
    pub abuse_handle: String,
    pub tech_handle: String,
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryRecord {
    pub asn: String,
    pub registry: Registry,
}

/// Decoded collections, one variant per query kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "records", rename_all = "lowercase")]
pub enum Records {
    Ip(Vec<WhoIs>),
    RouteView(RouteViewResult),
    Netblock(Vec<NetblockRecord>),
    Registry(Vec<Registry>),
}

impl Records {
    pub fn is_empty(&self) -> bool {
        match self {
            Records::Ip(records) => records.is_empty(),
            Records::RouteView(result) => result.routes.is_empty(),
            Records::Netblock(records) => records.is_empty(),
            Records::Registry(records) => records.is_empty(),
        }
    }
}

/// Final result of one lookup as handed to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Lookup {
    Ip(IpLookup),
    RouteView(RouteViewResult),
    Netblock(NetblockRecord),
    Registry(RegistryRecord),
}
