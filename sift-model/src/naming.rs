//! Index-side field naming policy.
//!
//! Search-index field names contain only lowercase characters and
//! underscores, so logical (camel-cased) member names are normalized before
//! the dynamic-field type suffix is appended.

/// Converts a camel-cased member name into lowercase, underscore-separated
/// words by splitting immediately before every uppercase letter.
///
/// `"publishDate"` becomes `"publish_date"`. A run of consecutive capitals
/// splits letter by letter (`"idABC"` → `"id_a_b_c"`); acronym grouping is
/// deliberately not attempted. A leading capital does not produce a leading
/// underscore.
pub fn normalize_field_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len() + 4);

    for ch in name.chars() {
        if ch.is_uppercase() {
            if !normalized.is_empty() {
                normalized.push('_');
            }
            normalized.extend(ch.to_lowercase());
        } else {
            normalized.push(ch);
        }
    }

    normalized
}
