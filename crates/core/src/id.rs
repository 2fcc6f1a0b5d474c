//! Server-generated identifiers and timestamps.

use std::fmt::Write as _;

use rand::Rng;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Principal recorded in `created_by` / `updated_by`. The service has no
/// user authentication of its own, so every mutation is attributed to it.
pub const SERVICE_PRINCIPAL: &str = "vlist";

/// Generate a random identifier: 32 lowercase hex characters.
///
/// Used when a create request omits an explicit `id`.
pub fn generate_id() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    let mut out = String::with_capacity(32);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

/// Generate a tie-breaker value for stable sorting of records that share
/// a timestamp. Same format as a generated id.
pub fn generate_tie_breaker() -> String {
    generate_id()
}

/// Current UTC time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_id_is_32_lowercase_hex_chars() {
        let id = generate_id();
        assert_eq!(id.len(), 32);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
    }

    #[test]
    fn now_rfc3339_parses_back() {
        let ts = now_rfc3339();
        assert!(OffsetDateTime::parse(&ts, &Rfc3339).is_ok());
    }
}
