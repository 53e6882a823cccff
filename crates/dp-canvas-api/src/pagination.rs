//! RFC 8288 `Link` header parsing for paginated Canvas collections
//!
//! Canvas paginates list endpoints and advertises the page graph in a `Link`
//! response header, e.g.
//! `<https://canvas/api/v1/...?page=2>; rel="next", <...?page=5>; rel="last"`.
//! [`PageLinks`] extracts the relation targets; the HTTP client follows
//! `next` until exhausted.

use url::Url;

/// Relation targets advertised by a paginated response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<Url>,
    pub prev: Option<Url>,
    pub first: Option<Url>,
    pub last: Option<Url>,
}

impl PageLinks {
    /// Parse a `Link` header value. Malformed segments are skipped rather
    /// than failing the whole header; an unparseable or absent header yields
    /// an empty set of links, which callers treat as "single page".
    pub fn parse(header: &str) -> Self {
        let mut links = Self::default();
        for segment in header.split(',') {
            let mut parts = segment.split(';');
            let target = match parts.next() {
                Some(t) => t.trim(),
                None => continue,
            };
            if !target.starts_with('<') || !target.ends_with('>') {
                continue;
            }
            let url = match Url::parse(&target[1..target.len() - 1]) {
                Ok(u) => u,
                Err(_) => continue,
            };
            for param in parts {
                let param = param.trim();
                if let Some(rel) = param.strip_prefix("rel=") {
                    match rel.trim_matches('"') {
                        "next" => links.next = Some(url.clone()),
                        "prev" => links.prev = Some(url.clone()),
                        "first" => links.first = Some(url.clone()),
                        "last" => links.last = Some(url.clone()),
                        _ => {}
                    }
                }
            }
        }
        links
    }

    /// True when the response advertised no pagination relations at all.
    pub fn is_empty(&self) -> bool {
        self.next.is_none() && self.prev.is_none() && self.first.is_none() && self.last.is_none()
    }
}

/// One fetched page of a paginated collection: its records plus the link
/// relations needed to continue.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub links: PageLinks,
}

impl<T> Page<T> {
    /// A page with no pagination metadata (an unpaginated response).
    pub fn single(items: Vec<T>) -> Self {
        Self {
            items,
            links: PageLinks::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_next_and_last_relations() {
        let header = r#"<https://canvas.example.com/api/v1/courses/5/sections?page=2&per_page=10>; rel="next", <https://canvas.example.com/api/v1/courses/5/sections?page=4&per_page=10>; rel="last""#;
        let links = PageLinks::parse(header);
        assert_eq!(
            links.next.as_ref().map(Url::as_str),
            Some("https://canvas.example.com/api/v1/courses/5/sections?page=2&per_page=10")
        );
        assert!(links.last.is_some());
        assert!(links.prev.is_none());
        assert!(!links.is_empty());
    }

    #[test]
    fn last_page_has_no_next() {
        let header = r#"<https://canvas.example.com/x?page=3>; rel="prev", <https://canvas.example.com/x?page=1>; rel="first""#;
        let links = PageLinks::parse(header);
        assert!(links.next.is_none());
        assert!(links.prev.is_some());
    }

    #[test]
    fn malformed_segments_are_skipped() {
        let links = PageLinks::parse("garbage, <not a url>; rel=\"next\"");
        assert!(links.is_empty());
    }

    #[test]
    fn empty_header_means_single_page() {
        assert!(PageLinks::parse("").is_empty());
    }
}
