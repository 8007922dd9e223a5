//! Destination-safe event identifiers.

/// Strip everything but ASCII letters and digits from a feed UID.
///
/// The mapping is deterministic but not injective: `a.b@c` and `ab@c` both
/// become `abc`. [`crate::collection::SourceCollection`] detects those clashes.
pub fn sanitize(raw_id: &str) -> String {
    raw_id.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Whether `id` already satisfies `^[A-Za-z0-9]+$`.
pub fn is_sanitized(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}
