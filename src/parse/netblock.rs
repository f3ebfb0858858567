use tracing::debug;

use super::{field, fields, joined_timestamp, parse_date, Sections, ATTRIBUTE_SEPARATOR};
use crate::error::{PwhoisError, Result};
use crate::records::{Netblock, NetblockRecord};

/// Marker in front of every netblock data row
pub const ROW_MARKER: &str = "*>";

/// Prefix of a header line reporting a service-side failure
pub const SERVICE_ERROR_PREFIX: &str = "Error: ";

/// Positions of the columns in a netblock data row, counted after the
/// row marker has been removed:
/// `104.16.0.0 - 104.31.255.255 | NAME | type | 2014-03-28 | 2021-05-26 | Mar 28 2014 16:31:21 | May 26 2021 16:28:46 | ARIN`
#[derive(Debug, Clone, Copy)]
pub struct NetblockLayout {
    pub min_fields: usize,
    pub range_start: usize,
    pub range_end: usize,
    pub name: usize,
    pub net_type: usize,
    pub register_date: usize,
    pub update_date: usize,
    pub create_date: [usize; 4],
    pub modify_date: [usize; 4],
    pub source: usize,
}

pub const NETBLOCK_LAYOUT: NetblockLayout = NetblockLayout {
    min_fields: 23,
    range_start: 0,
    range_end: 2,
    name: 4,
    net_type: 6,
    register_date: 8,
    update_date: 10,
    create_date: [12, 13, 14, 15],
    modify_date: [17, 18, 19, 20],
    source: 22,
};

/// Parse a netblock response into a single record. The queried ASN is
/// filled in by the caller.
pub fn parse(response: &str) -> Result<Vec<NetblockRecord>> {
    parse_with_layout(response, &NETBLOCK_LAYOUT)
}

pub fn parse_with_layout(response: &str, layout: &NetblockLayout) -> Result<Vec<NetblockRecord>> {
    if response.is_empty() {
        return Err(PwhoisError::EmptyResponse);
    }

    let sections = Sections::split(response, |line| {
        if line.contains(ATTRIBUTE_SEPARATOR) {
            None
        } else {
            line.strip_prefix(ROW_MARKER)
        }
    });

    // e.g. `Error: No netblock found in registry database for org-id=UAAB`
    if let Some(message) = sections
        .header
        .iter()
        .find_map(|line| line.strip_prefix(SERVICE_ERROR_PREFIX))
    {
        return Err(PwhoisError::ServiceError(message.trim().to_string()));
    }

    sections.require_both()?;

    let header = sections.attributes();
    let mut netblocks = Vec::with_capacity(sections.rows.len());
    let mut skipped = 0usize;

    for row in &sections.rows {
        let fields = fields(row);
        if fields.len() < layout.min_fields {
            skipped += 1;
            continue;
        }
        netblocks.push(decode_row(&fields, layout));
    }

    debug!(netblocks = netblocks.len(), skipped, "Parsed netblock rows");

    let origin_as = header
        .get("Origin-AS")
        .or_else(|| header.get("AS"))
        .unwrap_or_default()
        .to_string();

    Ok(vec![NetblockRecord {
        asn: String::new(),
        as_number: header.int("AS"),
        origin_as,
        as_source: header.text("AS-Source"),
        org: header.int("Org"),
        org_id: header.text("Org-ID"),
        org_name: header.text("Org-Name"),
        org_source: header.text("Org-Source"),
        netblocks,
    }])
}

fn decode_row(fields: &[&str], layout: &NetblockLayout) -> Netblock {
    Netblock {
        name: field(fields, layout.name).to_string(),
        net_type: field(fields, layout.net_type).to_string(),
        range: format!(
            "{}-{}",
            field(fields, layout.range_start),
            field(fields, layout.range_end)
        ),
        register_date: parse_date(field(fields, layout.register_date)),
        update_date: parse_date(field(fields, layout.update_date)),
        create_date: joined_timestamp(fields, &layout.create_date),
        modify_date: joined_timestamp(fields, &layout.modify_date),
        source: field(fields, layout.source).to_string(),
    }
}
