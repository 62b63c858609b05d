// src/core/sanitize.rs

/// Decode the handful of entities the price pages actually use.
/// Unknown named entities are left untouched.
pub fn normalize_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        // entities are short; don't scan the whole doc for a ';'
        let semi = rest.bytes().take(12).position(|b| b == b';');
        let decoded = semi.and_then(|e| decode_entity(&rest[1..e]));
        match (semi, decoded) {
            (Some(e), Some(ch)) => {
                out.push(ch);
                rest = &rest[e + 1..];
            }
            _ => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    Some(match name {
        "nbsp" => ' ',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "cent" => '¢',
        "ndash" => '–',
        "mdash" => '—',
        "rsquo" => '’',
        _ => return None,
    })
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// ASCII case-insensitive substring test; non-ASCII chars compare exactly.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    h.windows(n.len()).any(|w| w.eq_ignore_ascii_case(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_decode_named_and_numeric() {
        assert_eq!(normalize_entities("139.9&cent;"), "139.9¢");
        assert_eq!(normalize_entities("139.9&#162;"), "139.9¢");
        assert_eq!(normalize_entities("139.9&#xA2;"), "139.9¢");
        assert_eq!(normalize_entities("Gas&nbsp;&amp;&nbsp;Oil"), "Gas & Oil");
    }

    #[test]
    fn unknown_or_bare_ampersand_passes_through() {
        assert_eq!(normalize_entities("A & B"), "A & B");
        assert_eq!(normalize_entities("&bogus; x"), "&bogus; x");
        assert_eq!(normalize_entities("trailing &"), "trailing &");
    }

    #[test]
    fn normalize_ws_collapses_runs() {
        assert_eq!(normalize_ws("  a \n\t b  "), "a b");
    }

    #[test]
    fn contains_ci_ignores_ascii_case() {
        assert!(contains_ci("Price for TOMORROW", "tomorrow"));
        assert!(!contains_ci("Today", "tomorrow"));
        assert!(contains_ci("anything", ""));
    }
}
