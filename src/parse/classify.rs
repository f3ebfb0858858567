use tracing::warn;

use crate::error::{PwhoisError, Result};

/// Substring the service emits when a client's query quota is used up
pub const QUOTA_MARKER: &str = "query limit exceeded";

/// Doubled prefix the service prepends to some error lines
const DOUBLED_ERROR_PREFIX: &str = "Error: Error: ";

/// Check a raw response for service-level failures.
///
/// Runs before structural parsing, so a quota failure is never mistaken
/// for empty or malformed data.
pub fn check(response: &str) -> Result<()> {
    if response.contains(QUOTA_MARKER) {
        let message = response.replacen(DOUBLED_ERROR_PREFIX, "", 1);
        let message = message.trim().to_string();
        warn!(%message, "pwhois query quota exceeded");
        return Err(PwhoisError::QuotaExceeded(message));
    }
    Ok(())
}
