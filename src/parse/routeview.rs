use tracing::debug;

use super::{field, fields, joined_timestamp, Sections, ATTRIBUTE_SEPARATOR};
use crate::error::{PwhoisError, Result};
use crate::records::{BgpRoute, RouteViewResult};

/// Positions of the columns in a routeview data row.
///
/// A row looks like
/// `*> 4.0.0.0/9 | Jan 05 2021 12:00:01 | Jan 05 2021 12:00:01 | Dec 30 2020 08:15:44 | 4.68.1.1 | 3356`
/// where everything from `as_path_start` on is the AS path.
#[derive(Debug, Clone, Copy)]
pub struct RouteViewLayout {
    pub min_fields: usize,
    pub prefix: usize,
    pub create_date: [usize; 4],
    pub modify_date: [usize; 4],
    pub originated_date: [usize; 4],
    pub next_hop: usize,
    pub as_path_start: usize,
}

pub const ROUTEVIEW_LAYOUT: RouteViewLayout = RouteViewLayout {
    min_fields: 20,
    prefix: 1,
    create_date: [3, 4, 5, 6],
    modify_date: [8, 9, 10, 11],
    originated_date: [13, 14, 15, 16],
    next_hop: 18,
    as_path_start: 20,
};

/// Parse a routeview response. The queried ASN is filled in by the caller.
pub fn parse(response: &str) -> Result<RouteViewResult> {
    parse_with_layout(response, &ROUTEVIEW_LAYOUT)
}

pub fn parse_with_layout(response: &str, layout: &RouteViewLayout) -> Result<RouteViewResult> {
    if response.is_empty() {
        return Err(PwhoisError::EmptyResponse);
    }

    let sections = Sections::split(response, |line| {
        (!line.contains(ATTRIBUTE_SEPARATOR)
            && line.split_whitespace().count() >= layout.min_fields)
            .then_some(line)
    });
    sections.require_both()?;

    let header = sections.attributes();
    let routes: Vec<BgpRoute> = sections
        .rows
        .iter()
        .map(|row| decode_row(&fields(row), layout))
        .collect();

    debug!(routes = routes.len(), "Parsed routeview rows");

    Ok(RouteViewResult {
        asn: String::new(),
        origin_as: header.text("Origin-AS"),
        as_org_name: header.text("AS-Org-Name"),
        as_source: header.text("AS-Source"),
        routes,
    })
}

fn decode_row(fields: &[&str], layout: &RouteViewLayout) -> BgpRoute {
    BgpRoute {
        prefix: field(fields, layout.prefix).to_string(),
        create_date: joined_timestamp(fields, &layout.create_date),
        modify_date: joined_timestamp(fields, &layout.modify_date),
        originated_date: joined_timestamp(fields, &layout.originated_date),
        next_hop: field(fields, layout.next_hop).to_string(),
        as_path: parse_as_path(fields.get(layout.as_path_start..).unwrap_or_default()),
    }
}

/// Non-numeric path entries become zero so positions are preserved
pub fn parse_as_path(tokens: &[&str]) -> Vec<i64> {
    tokens
        .iter()
        .map(|token| token.parse().unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const LEVEL3: &str = "Origin-AS: 3356
AS-Org-Name: Level 3 Parent, LLC
AS-Source: ARIN

*> 4.0.0.0/9 | Jan 05 2021 12:00:01 | Feb 06 2022 13:01:02 | Dec 30 2020 08:15:44 | 4.68.1.1 | 3356
*> 8.0.0.0/12 | Jan 05 2021 12:00:01 | Feb 06 2022 13:01:02 | Dec 30 2020 08:15:44 | 4.68.1.1 | 174 3356 {65000}
short row that is skipped
";

    #[test]
    fn test_parse_routes() {
        let result = parse(LEVEL3).unwrap();
        assert_eq!(result.origin_as, "3356");
        assert_eq!(result.as_org_name, "Level 3 Parent, LLC");
        assert_eq!(result.as_source, "ARIN");
        assert_eq!(result.routes.len(), 2);

        let first = &result.routes[0];
        assert_eq!(first.prefix, "4.0.0.0/9");
        assert_eq!(first.next_hop, "4.68.1.1");
        assert_eq!(first.as_path, vec![3356]);
        assert_eq!(first.create_date.year(), 2021);
        assert_eq!(first.modify_date.month(), 2);
        assert_eq!(first.originated_date.hour(), 8);
    }

    #[test]
    fn test_as_path_non_numeric_is_zero() {
        let result = parse(LEVEL3).unwrap();
        assert_eq!(result.routes[1].as_path, vec![174, 3356, 0]);
    }

    #[test]
    fn test_parse_as_path() {
        assert_eq!(parse_as_path(&["1", "x", "3"]), vec![1, 0, 3]);
        assert!(parse_as_path(&[]).is_empty());
    }

    #[test]
    fn test_missing_header() {
        let rows_only = LEVEL3.split_once("\n\n").map(|(_, rows)| rows).unwrap();
        assert!(matches!(parse(rows_only), Err(PwhoisError::NoHeader)));
    }

    #[test]
    fn test_long_header_is_not_a_route() {
        let org = "The Very Long Example Organisation Name That Keeps Going With Many \
Words Across Several Regions And Subsidiaries Worldwide Incorporated";
        assert!(org.split_whitespace().count() >= 20);

        let response = format!(
            "Origin-AS: 64500\nAS-Org-Name: {}\n\
*> 4.0.0.0/9 | Jan 05 2021 12:00:01 | Feb 06 2022 13:01:02 | Dec 30 2020 08:15:44 | 4.68.1.1 | 3356\n",
            org
        );
        let result = parse(&response).unwrap();
        assert_eq!(result.as_org_name, org);
        assert_eq!(result.routes.len(), 1);
        assert_eq!(result.routes[0].prefix, "4.0.0.0/9");
    }

    #[test]
    fn test_missing_rows() {
        let header_only = "Origin-AS: 3356\nAS-Org-Name: Level 3 Parent, LLC\n";
        assert!(matches!(parse(header_only), Err(PwhoisError::NoDataRows)));
    }

    #[test]
    fn test_empty_response() {
        assert!(matches!(parse(""), Err(PwhoisError::EmptyResponse)));
    }

    #[test]
    fn test_custom_layout() {
        let layout = RouteViewLayout {
            min_fields: 3,
            prefix: 0,
            create_date: [9, 9, 9, 9],
            modify_date: [9, 9, 9, 9],
            originated_date: [9, 9, 9, 9],
            next_hop: 1,
            as_path_start: 2,
        };
        let result = parse_with_layout("AS: 1\n10.0.0.0/8 192.0.2.1 64500 64501\n", &layout).unwrap();
        assert_eq!(result.routes[0].prefix, "10.0.0.0/8");
        assert_eq!(result.routes[0].next_hop, "192.0.2.1");
        assert_eq!(result.routes[0].as_path, vec![64500, 64501]);
    }
}
