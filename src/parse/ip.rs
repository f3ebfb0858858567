use super::{parse_attribute_blocks, Attributes};
use crate::error::Result;
use crate::records::WhoIs;

/// Parse an address lookup response, one record per attribute block
pub fn parse(response: &str) -> Result<Vec<WhoIs>> {
    parse_attribute_blocks(response, decode)
}

fn decode(attributes: &Attributes<'_>) -> WhoIs {
    WhoIs {
        ip: attributes.text("IP"),
        origin_as: attributes.text("Origin-AS"),
        prefix: attributes.text("Prefix"),
        as_path: attributes.text("AS-Path"),
        as_org_name: attributes.text("AS-Org-Name"),
        org_name: attributes.text("Org-Name"),
        net_name: attributes.text("Net-Name"),
        cache_date: attributes.timestamp("Cache-Date"),
        latitude: attributes.float("Latitude"),
        longitude: attributes.float("Longitude"),
        city: attributes.text("City"),
        region: attributes.text("Region"),
        country: attributes.text("Country"),
        country_code: attributes.text("Country-Code"),
        route_originated_date: attributes.timestamp("Route-Originated-Date"),
        route_originated_ts: attributes.int("Route-Originated-TS"),
    }
}
