//! Input validation and sanitization for profile fields
//!
//! Accepted text is HTML-escaped before it is stored.

use std::collections::BTreeMap;

use crate::error::AppError;

pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_POSITION_CHARS: usize = 100;
pub const MAX_LOCATION_CHARS: usize = 100;
pub const MAX_BIO_CHARS: usize = 500;
pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_CHARS: usize = 50;

pub fn sanitize_html(input: &str) -> String {
    html_escape::encode_safe(input).into_owned()
}

/// Lower-case and check `local@domain.tld` shape
///
/// The address is stored as entered (lower-cased), so characters with HTML
/// meaning are refused instead of escaped.
pub fn validate_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_lowercase();
    let (local, domain) = normalized.split_once('@')?;

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".!#$%'*+/=?^_`{|}~-".contains(c));
    let domain_ok = !domain.is_empty()
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !local_ok || !domain_ok {
        return None;
    }

    // A dot with at least one character on each side
    let dotted = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
    if !dotted {
        return None;
    }

    Some(normalized)
}

/// Letters, spaces, hyphens and apostrophes, 1-50 characters
pub fn validate_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    let count = trimmed.chars().count();
    if count == 0 || count > MAX_NAME_CHARS {
        return None;
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || c == '-' || c == '\'')
    {
        return None;
    }
    Some(sanitize_html(trimmed))
}

/// Non-empty free text whose escaped form fits in `max_chars`
pub fn validate_text(text: &str, max_chars: usize) -> Option<String> {
    let sanitized = sanitize_html(text.trim());
    let count = sanitized.chars().count();
    (count > 0 && count <= max_chars).then_some(sanitized)
}

/// Letters, spaces and `-',.`, 1-100 characters
pub fn validate_location(location: &str) -> Option<String> {
    let trimmed = location.trim();
    let count = trimmed.chars().count();
    if count == 0 || count > MAX_LOCATION_CHARS {
        return None;
    }
    if !trimmed.chars().all(|c| {
        c.is_ascii_alphabetic() || c.is_whitespace() || matches!(c, '-' | '\'' | ',' | '.')
    }) {
        return None;
    }
    Some(sanitize_html(trimmed))
}

/// Only `http` and `https` URLs are accepted
pub fn validate_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed).ok()?;
    matches!(parsed.scheme(), "http" | "https").then(|| trimmed.to_string())
}

/// Keep at most 10 non-empty tags of up to 50 characters
pub fn validate_tags(items: &[String]) -> Vec<String> {
    items
        .iter()
        .take(MAX_TAGS)
        .map(|item| sanitize_html(item.trim()))
        .filter(|item| {
            let count = item.chars().count();
            count > 0 && count <= MAX_TAG_CHARS
        })
        .collect()
}

/// Validate an optional field, treating blank input as absent
pub fn optional(
    value: Option<&str>,
    field: &str,
    validate: impl Fn(&str) -> Option<String>,
) -> Result<Option<String>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => validate(v)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("invalid {}", field))),
    }
}

pub fn validate_social_links(
    links: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, AppError> {
    let mut validated = BTreeMap::new();
    for (platform, link) in links {
        let platform = validate_text(platform, MAX_TAG_CHARS)
            .ok_or_else(|| AppError::Validation("invalid social link platform".to_string()))?;
        let link = validate_url(link).ok_or_else(|| {
            AppError::Validation(format!("invalid social link for {}", platform))
        })?;
        validated.insert(platform, link);
    }
    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_lowercased_and_shape_checked() {
        assert_eq!(
            validate_email("  Alice@Example.COM "),
            Some("alice@example.com".to_string())
        );
        assert_eq!(validate_email("alice@example"), None);
        assert_eq!(validate_email("alice@.com"), None);
        assert_eq!(validate_email("al ice@example.com"), None);
        assert_eq!(validate_email("a@b@example.com"), None);
    }

    #[test]
    fn email_keeps_apostrophes_verbatim_and_refuses_markup() {
        assert_eq!(
            validate_email("O'Neil/Sales@Example.com"),
            Some("o'neil/sales@example.com".to_string())
        );
        assert_eq!(validate_email("<script>@example.com"), None);
        assert_eq!(validate_email("tom&jerry@example.com"), None);
        assert_eq!(validate_email("alice@exa\"mple.com"), None);
    }

    #[test]
    fn names_allow_apostrophes_and_hyphens() {
        assert_eq!(
            validate_name("Mary-Jane O'Neil"),
            Some("Mary-Jane O&#x27;Neil".to_string())
        );
        assert_eq!(validate_name("R2D2"), None);
        assert_eq!(validate_name(""), None);
        assert_eq!(validate_name(&"a".repeat(51)), None);
    }

    #[test]
    fn text_is_escaped_and_length_checked() {
        assert_eq!(
            validate_text("<b>hi</b>", 100),
            Some("&lt;b&gt;hi&lt;&#x2F;b&gt;".to_string())
        );
        assert_eq!(validate_text("   ", 100), None);
        assert_eq!(validate_text("abcdef", 5), None);
    }

    #[test]
    fn location_accepts_punctuation() {
        assert!(validate_location("St. John's, Newfoundland").is_some());
        assert!(validate_location("Zone 51").is_none());
    }

    #[test]
    fn only_http_urls_pass() {
        assert!(validate_url("https://linkedin.com/in/alice").is_some());
        assert!(validate_url("javascript:alert(1)").is_none());
        assert!(validate_url("not a url").is_none());
    }

    #[test]
    fn tags_are_capped_and_filtered() {
        let mut items: Vec<String> = (0..12).map(|i| format!("tag{}", i)).collect();
        items[0] = "   ".to_string();
        items[1] = "x".repeat(60);

        let tags = validate_tags(&items);
        assert_eq!(tags.len(), 8);
        assert_eq!(tags[0], "tag2");
    }

    #[test]
    fn optional_treats_blank_as_absent() {
        assert_eq!(optional(Some("  "), "bio", |v| Some(v.to_string())).unwrap(), None);
        assert!(matches!(
            optional(Some("Zone 51"), "location", validate_location),
            Err(AppError::Validation(msg)) if msg == "invalid location"
        ));
    }

    #[test]
    fn social_links_require_http_urls() {
        let mut links = BTreeMap::new();
        links.insert("github".to_string(), "https://github.com/alice".to_string());
        assert_eq!(validate_social_links(&links).unwrap().len(), 1);

        links.insert("site".to_string(), "ftp://example.com".to_string());
        assert!(validate_social_links(&links).is_err());
    }
}
