//! Field normalization applied before any comparison.

/// Lowercase and trim. Missing fields normalize to the empty string.
pub fn normalize_text(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_lowercase()).unwrap_or_default()
}

/// Digits only: `(555) 123-4567` and `555.123.4567` both become `5551234567`.
pub fn normalize_phone(value: Option<&str>) -> String {
    value
        .map(|v| v.chars().filter(char::is_ascii_digit).collect())
        .unwrap_or_default()
}

/// Bare host: scheme, credentials, `www.`, port, path, query, fragment and
/// trailing dot removed, lowercased.
pub fn normalize_website(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return String::new();
    };
    let lowered = raw.trim().to_lowercase();

    let without_scheme = match lowered.find("://") {
        Some(idx) => &lowered[idx + 3..],
        None => lowered.as_str(),
    };
    let authority = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    let host = host_port.split(':').next().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.trim_end_matches('.').to_string()
}
