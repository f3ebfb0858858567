use super::{parse_attribute_blocks, Attributes};
use crate::error::Result;
use crate::records::Registry;

/// Parse a registry lookup response. Normally a single block.
pub fn parse(response: &str) -> Result<Vec<Registry>> {
    parse_attribute_blocks(response, decode)
}

fn decode(attributes: &Attributes<'_>) -> Registry {
    Registry {
        org_record: attributes.text("Org-Record"),
        org_id: attributes.text("Org-ID"),
        org_name: attributes.text("Org-Name"),
        can_allocate: attributes.boolean("Can-Allocate"),
        source: attributes.text("Source"),
        street: attributes.text("Street-1"),
        postal_code: attributes.text("Postal-Code"),
        city: attributes.text("City"),
        region: attributes.text("Region"),
        country: attributes.text("Country"),
        country_code: attributes.text("Country-Code"),
        register_date: attributes.timestamp("Register-Date"),
        update_date: attributes.timestamp("Update-Date"),
        create_date: attributes.timestamp("Create-Date"),
        modify_date: attributes.timestamp("Modify-Date"),
        admin_handle: attributes.text("Admin-0-Handle"),
        abuse_handle: attributes.text("Abuse-0-Handle"),
        tech_handle: attributes.text("Tech-0-Handle"),
        comment: attributes.text("Comment"),
    }
}
