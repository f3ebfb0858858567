use chrono::NaiveDateTime;
use colored::*;

use crate::parse::TIMESTAMP_FORMAT;
use crate::records::{IpLookup, Lookup, NetblockRecord, RegistryRecord, RouteViewResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Pwhois,
    None,
}

pub struct OutputColorizer;

impl OutputColorizer {
    /// Render a lookup result as `Key: Value` blocks in the service's own style
    pub fn render(lookup: &Lookup) -> String {
        let mut out = Block::default();
        match lookup {
            Lookup::Ip(result) => Self::render_ip(result, &mut out),
            Lookup::RouteView(result) => Self::render_routeview(result, &mut out),
            Lookup::Netblock(result) => Self::render_netblock(result, &mut out),
            Lookup::Registry(result) => Self::render_registry(result, &mut out),
        }
        out.finish()
    }

    /// Apply colorization based on the scheme
    pub fn colorize(output: &str, scheme: ColorScheme) -> String {
        match scheme {
            ColorScheme::Pwhois => Self::colorize_pwhois(output),
            ColorScheme::None => output.to_string(),
        }
    }

    fn render_ip(result: &IpLookup, out: &mut Block) {
        for record in &result.records {
            out.pair("IP", &record.ip);
            out.pair("Origin-AS", &record.origin_as);
            out.pair("Prefix", &record.prefix);
            out.pair("AS-Path", &record.as_path);
            out.pair("AS-Org-Name", &record.as_org_name);
            out.pair("Org-Name", &record.org_name);
            out.pair("Net-Name", &record.net_name);
            out.date("Cache-Date", &record.cache_date);
            out.number("Latitude", record.latitude);
            out.number("Longitude", record.longitude);
            out.pair("City", &record.city);
            out.pair("Region", &record.region);
            out.pair("Country", &record.country);
            out.pair("Country-Code", &record.country_code);
            out.date("Route-Originated-Date", &record.route_originated_date);
            out.number("Route-Originated-TS", record.route_originated_ts);
            out.end_block();
        }
    }

    fn render_routeview(result: &RouteViewResult, out: &mut Block) {
        out.pair("ASN", &result.asn);
        out.pair("Origin-AS", &result.origin_as);
        out.pair("AS-Org-Name", &result.as_org_name);
        out.pair("AS-Source", &result.as_source);
        out.number("Routes", result.routes.len());
        out.end_block();

        for route in &result.routes {
            out.pair("Prefix", &route.prefix);
            out.pair("Next-Hop", &route.next_hop);
            let path: Vec<String> = route.as_path.iter().map(i64::to_string).collect();
            out.pair("AS-Path", &path.join(" "));
            out.date("Create-Date", &route.create_date);
            out.date("Modify-Date", &route.modify_date);
            out.date("Originated-Date", &route.originated_date);
            out.end_block();
        }
    }

    fn render_netblock(result: &NetblockRecord, out: &mut Block) {
        out.pair("ASN", &result.asn);
        out.pair("Origin-AS", &result.origin_as);
        out.pair("AS-Source", &result.as_source);
        out.pair("Org-ID", &result.org_id);
        out.pair("Org-Name", &result.org_name);
        out.pair("Org-Source", &result.org_source);
        out.number("Netblocks", result.netblocks.len());
        out.end_block();

        for block in &result.netblocks {
            out.pair("Net-Range", &block.range);
            out.pair("Net-Name", &block.name);
            out.pair("Net-Type", &block.net_type);
            out.date("Register-Date", &block.register_date);
            out.date("Update-Date", &block.update_date);
            out.date("Create-Date", &block.create_date);
            out.date("Modify-Date", &block.modify_date);
            out.pair("Source", &block.source);
            out.end_block();
        }
    }

    fn render_registry(result: &RegistryRecord, out: &mut Block) {
        let registry = &result.registry;
        out.pair("ASN", &result.asn);
        out.pair("Org-Record", &registry.org_record);
        out.pair("Org-ID", &registry.org_id);
        out.pair("Org-Name", &registry.org_name);
        out.pair("Can-Allocate", if registry.can_allocate { "yes" } else { "no" });
        out.pair("Source", &registry.source);
        out.pair("Street-1", &registry.street);
        out.pair("Postal-Code", &registry.postal_code);
        out.pair("City", &registry.city);
        out.pair("Region", &registry.region);
        out.pair("Country", &registry.country);
        out.pair("Country-Code", &registry.country_code);
        out.date("Register-Date", &registry.register_date);
        out.date("Update-Date", &registry.update_date);
        out.date("Create-Date", &registry.create_date);
        out.date("Modify-Date", &registry.modify_date);
        out.pair("Admin-0-Handle", &registry.admin_handle);
        out.pair("Abuse-0-Handle", &registry.abuse_handle);
        out.pair("Tech-0-Handle", &registry.tech_handle);
        out.pair("Comment", &registry.comment);
        out.end_block();
    }

    /// Colorize rendered `Key: Value` output
    fn colorize_pwhois(output: &str) -> String {
        output
            .lines()
            .map(|line| {
                Self::colorize_field_value_pair(line).unwrap_or_else(|| line.to_string())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Colorize a field: value pair
    fn colorize_field_value_pair(line: &str) -> Option<String> {
        let (field, value) = line.split_once(": ")?;
        let colored_field = Self::colorize_field_name(field);
        let colored_value = Self::colorize_field_value(field, value);
        Some(format!("{}: {}", colored_field, colored_value))
    }

    /// Colorize field names based on their type
    fn colorize_field_name(field: &str) -> String {
        match field {
            // Routing fields
            "ASN" | "Origin-AS" | "AS-Path" => field.bright_red().to_string(),

            // Network fields
            "IP" | "Prefix" | "Net-Range" | "Next-Hop" | "Net-Name" | "Net-Type" => {
                field.bright_cyan().to_string()
            }

            // Name fields
            "AS-Org-Name" | "Org-Name" | "Org-ID" | "Org-Record" => {
                field.bright_green().to_string()
            }

            // Date fields
            "Cache-Date" | "Route-Originated-Date" | "Route-Originated-TS" | "Create-Date"
            | "Modify-Date" | "Originated-Date" | "Register-Date" | "Update-Date" => {
                field.bright_magenta().to_string()
            }

            // Contact fields
            "Admin-0-Handle" | "Abuse-0-Handle" | "Tech-0-Handle" => field.green().to_string(),

            // Registry fields
            "Source" | "AS-Source" | "Org-Source" => field.bright_blue().to_string(),

            // Location fields
            "City" | "Region" | "Country" | "Country-Code" | "Street-1" | "Postal-Code"
            | "Latitude" | "Longitude" => field.bright_white().to_string(),

            // Counters
            "Routes" | "Netblocks" => field.yellow().to_string(),

            _ => field.white().to_string(),
        }
    }

    /// Colorize field values based on content and context
    fn colorize_field_value(field: &str, value: &str) -> String {
        match field {
            "ASN" | "Origin-AS" => value.bright_red().bold().to_string(),
            "AS-Path" => value.red().to_string(),
            "IP" | "Prefix" | "Net-Range" => value.bright_cyan().bold().to_string(),
            "AS-Org-Name" | "Org-Name" => value.bright_white().bold().to_string(),
            "Country-Code" => value.bright_yellow().to_string(),
            _ => value.to_string(),
        }
    }
}

/// Accumulates rendered lines, skipping empty values
#[derive(Default)]
struct Block {
    lines: Vec<String>,
}

impl Block {
    fn pair(&mut self, key: &str, value: &str) {
        if !value.is_empty() {
            self.lines.push(format!("{}: {}", key, value));
        }
    }

    fn number<T: ToString>(&mut self, key: &str, value: T) {
        self.pair(key, &value.to_string());
    }

    fn date(&mut self, key: &str, value: &NaiveDateTime) {
        if *value != NaiveDateTime::default() {
            self.pair(key, &value.format(TIMESTAMP_FORMAT).to_string());
        }
    }

    fn end_block(&mut self) {
        if self.lines.last().is_some_and(|line| !line.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn finish(mut self) -> String {
        while self.lines.last().is_some_and(|line| line.is_empty()) {
            self.lines.pop();
        }
        self.lines.join("\n")
    }
}
