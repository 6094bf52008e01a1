use std::sync::OnceLock;

use finlens_core::{TransactionRecord, UNKNOWN_COUNTERPARTY};
use regex::Regex;

fn re_upi() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"UPI/([^/]*)/").expect("invalid regex"))
}

fn re_capitalized() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"([A-Z\s]{4,})").expect("invalid regex"))
}

/// Counterparty name from a narration.
///
/// Tries the segment after `UPI/` first, then the first run of four or more
/// capitals/spaces. Empty candidates fall through to the next heuristic.
pub fn infer_name(narration: &str) -> String {
    let upi = re_upi()
        .captures(narration)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty());
    if let Some(name) = upi {
        return name.to_string();
    }

    re_capitalized()
        .captures(narration)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_COUNTERPARTY.to_string())
}

/// Fill in `name` for every record.
pub fn assign_names(records: &mut [TransactionRecord]) {
    for r in records.iter_mut() {
        r.name = infer_name(&r.narration);
    }
}
