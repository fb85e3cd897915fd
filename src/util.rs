//! Shared utility functions.

/// Convert a slug to title case.
///
/// Splits on `-` and `_`, capitalizes each word.
/// "getting-started" -> "Getting Started"
/// "api_reference" -> "Api Reference"
pub fn title_case(s: &str) -> String {
    s.split(['-', '_'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert text to kebab case.
///
/// Words are runs of letters or runs of digits; everything else separates
/// them, and apostrophes are dropped. A lower-to-upper case change also
/// starts a new word.
/// "Case Study" -> "case-study"
/// "fooBar" -> "foo-bar"
/// "rust2024" -> "rust-2024"
pub fn kebab_case(s: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in s.chars().filter(|c| !matches!(c, '\'' | '\u{2019}')) {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }

        if let Some(p) = prev {
            let boundary = (p.is_numeric() != c.is_numeric())
                || (p.is_lowercase() && c.is_uppercase());
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }

        current.extend(c.to_lowercase());
        prev = Some(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words.join("-")
}

/// Extract the hostname from an absolute URL.
///
/// Userinfo and port are dropped and the host is lowercased. Returns `None`
/// for anything without a `scheme://` prefix or with an empty host.
pub fn hostname(url: &str) -> Option<String> {
    let (scheme, rest) = url.trim().split_once("://")?;
    if scheme.is_empty() {
        return None;
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);

    let host = if host_port.starts_with('[') {
        // IPv6 literal keeps its brackets
        host_port
            .find(']')
            .map_or(host_port, |end| &host_port[..=end])
    } else {
        host_port.split(':').next().unwrap_or_default()
    };

    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}
