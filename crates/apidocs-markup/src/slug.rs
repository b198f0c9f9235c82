//! Heading identifiers and filename-derived labels.

/// Convert heading text to a URL-safe identifier.
///
/// Lowercases, keeps ASCII letters, digits and `_`, turns runs of whitespace
/// and `-` into a single `-`, drops everything else, and never emits a
/// leading or trailing `-`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !result.is_empty() {
                result.push('-');
            }
            pending_dash = false;
            result.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    result
}

/// Label derived from a hyphenated key: `api-reference` becomes `Api Reference`.
#[must_use]
pub fn title_case(key: &str) -> String {
    key.split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
