//! Song-id extraction from artist listing pages
//!
//! A listing page enumerates the artist's songs as `/song/<id>/` links.
//! The markup around those links shifts between site updates, so only the
//! href shape is trusted: anything else on the page is ignored.

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

static SONG_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/song/(\d+)/?").expect("hardcoded regex pattern is valid"));

/// Extracts song ids from a listing page in first-seen order
///
/// Duplicate links on the same page are folded. An empty result is a
/// signal (markup change or access block), not "zero songs" — the runner
/// aborts when the union over all listing pages stays empty.
pub fn extract_song_ids(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(captures) = SONG_LINK.captures(href) {
                    let id = captures[1].to_string();
                    if seen.insert(id.clone()) {
                        ids.push(id);
                    }
                }
            }
        }
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_ids_in_order() {
        let html = r#"<html><body>
            <a href="/song/10/">A</a>
            <a href="/song/20/">B</a>
        </body></html>"#;
        assert_eq!(extract_song_ids(html), vec!["10", "20"]);
    }

    #[test]
    fn test_folds_duplicates_preserving_first_seen_order() {
        let html = r#"<html><body>
            <a href="/song/10/">A</a>
            <a href="/song/20/">B</a>
            <a href="/song/10/">A again</a>
        </body></html>"#;
        assert_eq!(extract_song_ids(html), vec!["10", "20"]);
    }

    #[test]
    fn test_accepts_missing_trailing_slash() {
        let html = r#"<a href="/song/42">X</a>"#;
        assert_eq!(extract_song_ids(html), vec!["42"]);
    }

    #[test]
    fn test_ignores_other_links() {
        let html = r#"<html><body>
            <a href="/artist/1686/">Artist</a>
            <a href="/song/abc/">Bad id</a>
            <a href="https://www.uta-net.com/song/10/">Absolute</a>
            <a href="/news/123/">News</a>
        </body></html>"#;
        assert!(extract_song_ids(html).is_empty());
    }

    #[test]
    fn test_empty_page_yields_empty() {
        assert!(extract_song_ids("<html><body></body></html>").is_empty());
    }
}
