use regex::Regex;

/// Finds `href` attribute values in raw HTML.
///
/// Double-quoted, single-quoted and unquoted values are accepted. This is a
/// pattern scan rather than a DOM parse, so malformed markup never fails; a
/// page without anchors just yields nothing.
pub struct HrefScanner {
    pattern: Regex,
}

impl HrefScanner {
    pub fn new() -> Self {
        let pattern = Regex::new(r#"(?i)(?:^|[\s<])href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'<>`=]+))"#)
            .expect("href pattern is a valid regex");
        Self { pattern }
    }

    pub fn scan(&self, html: &str) -> Vec<String> {
        self.pattern
            .captures_iter(html)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
            .map(|m| decode_entities(m.as_str().trim()))
            .collect()
    }
}

impl Default for HrefScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&amp;", "&")
        .replace("&#38;", "&")
        .replace("&#x2F;", "/")
        .replace("&#47;", "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_styles() {
        let html = r#"<a href="/a">A</a> <a href='/b'>B</a> <a href=/c>C</a>"#;
        assert_eq!(HrefScanner::new().scan(html), vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn test_case_and_spacing() {
        let html = r#"<A HREF = "/upper">x</A><link rel="stylesheet" href="/s.css">"#;
        assert_eq!(HrefScanner::new().scan(html), vec!["/upper", "/s.css"]);
    }

    #[test]
    fn test_prefixed_attributes_ignored() {
        let html = r#"<div data-href="/not-a-link" x-href='/nope'><a
            href="/yes">Y</a></div>"#;
        assert_eq!(HrefScanner::new().scan(html), vec!["/yes"]);
    }

    #[test]
    fn test_no_anchors() {
        assert!(HrefScanner::new().scan("<html><body>plain</body></html>").is_empty());
    }

    #[test]
    fn test_entities_decoded() {
        let html = r#"<a href="/search?q=a&amp;page=2">"#;
        assert_eq!(HrefScanner::new().scan(html), vec!["/search?q=a&page=2"]);
    }

    #[test]
    fn test_unquoted_stops_at_tag_end() {
        let html = "<a href=/x>X</a>";
        assert_eq!(HrefScanner::new().scan(html), vec!["/x"]);
    }
}
