//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Extract the domain from a URL string.
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_lowercase()))
}

/// Whether `url_str` lives on `domain`. Unparsable URLs never match.
pub fn is_same_domain(domain: &str, url_str: &str) -> bool {
    get_domain(url_str).is_some_and(|d| d.eq_ignore_ascii_case(domain))
}

/// Lower-cased, space-to-underscore file stem for a school name.
pub fn file_stem(school_name: &str) -> String {
    school_name.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://example.edu/catalog/").unwrap();
        assert_eq!(
            resolve_url(&base, "science.html"),
            "https://example.edu/catalog/science.html"
        );
        assert_eq!(
            resolve_url(&base, "/root.html"),
            "https://example.edu/root.html"
        );
        assert_eq!(
            resolve_url(&base, "https://other.edu/x"),
            "https://other.edu/x"
        );
    }

    #[test]
    fn test_get_domain() {
        assert_eq!(
            get_domain("https://Catalog.Example.edu/path"),
            Some("catalog.example.edu".to_string())
        );
        assert_eq!(
            get_domain("https://sub.example.edu:8080/path"),
            Some("sub.example.edu".to_string())
        );
        assert_eq!(get_domain("invalid-url"), None);
    }

    #[test]
    fn test_is_same_domain() {
        assert!(is_same_domain("example.edu", "https://example.edu/a"));
        assert!(!is_same_domain("example.edu", "https://www.example.edu/a"));
        assert!(!is_same_domain("example.edu", "mailto:someone@example.edu"));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(
            file_stem("Bethune-Cookman University"),
            "bethune-cookman_university"
        );
    }
}
