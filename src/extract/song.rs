//! Title and lyrics extraction from a song page
//!
//! The catalogue's song pages are heuristically structured: the lyrics
//! container has carried several ids and class names across site updates,
//! and old pages survive with old markup. Selection therefore runs an
//! ordered chain of independent heuristics, from most to least specific.
//! The last tier can mis-select on markup drift; that ambiguity is part of
//! the contract — a wrong-but-plausible container degrades gracefully into
//! a skipped or odd record instead of failing the run.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Trailing site-brand suffix on `<title>`: 「…… 歌詞 - 歌ネット」
static TITLE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*歌詞\s*-\s*歌ネット\s*$").expect("hardcoded regex pattern is valid")
});

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("hardcoded regex pattern is valid"));

/// Everything from these markers on is page chrome, not lyrics
const BOILERPLATE_MARKERS: [&str; 2] = ["この歌詞をマイ歌ネットに登録", "この曲のフレーズを投稿"];

/// Container ids the lyrics body has used across site versions
const KNOWN_IDS: [&str; 2] = ["kashi_area", "kashi"];

/// Class-name vocabulary for the second-tier container match
const CLASS_VOCABULARY: [&str; 3] = ["kashi_area", "kashi", "song_table"];

/// Page chrome ids the fallback scan must never select
const CHROME_IDS: [&str; 4] = ["header", "footer", "nav", "menu"];

/// Substrings whose presence marks a text block as lyrics-bearing
const LYRIC_INDICATORS: [&str; 2] = ["歌詞", "作詞"];

/// Fields extracted from one song page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSong {
    pub title: String,
    pub content: String,
}

/// Extracts title and lyrics body from a song page
///
/// Returns empty content when no container heuristic matches; the caller
/// applies the minimum-length gate.
pub fn extract_song(html: &str) -> ExtractedSong {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let content = match select_lyrics_container(&document) {
        Some(container) => clean_content(&container_text(container)),
        None => String::new(),
    };

    ExtractedSong { title, content }
}

/// Resolves the song title
///
/// Tiers: first `<h2>` text; else `<title>` with the site suffix stripped
/// and the leading artist-name token dropped; else `"unknown"`.
fn extract_title(document: &Html) -> String {
    if let Ok(selector) = Selector::parse("h2") {
        if let Some(h2) = document.select(&selector).next() {
            let text: String = h2.text().map(str::trim).collect();
            if !text.is_empty() {
                return text;
            }
        }
    }

    if let Ok(selector) = Selector::parse("title") {
        if let Some(element) = document.select(&selector).next() {
            let raw: String = element.text().collect();
            let stripped = TITLE_SUFFIX.replace(&raw, "");
            let stripped = stripped.trim();
            if !stripped.is_empty() {
                // Page titles read "<artist> <song title>"
                return drop_leading_token(stripped);
            }
        }
    }

    "unknown".to_string()
}

/// Drops the first whitespace-delimited token, keeping the remainder
fn drop_leading_token(text: &str) -> String {
    match text.find(char::is_whitespace) {
        Some(pos) => text[pos..].trim_start().to_string(),
        None => text.to_string(),
    }
}

/// Ordered container heuristics, most specific first
const CONTAINER_HEURISTICS: [fn(&Html) -> Option<ElementRef>; 3] =
    [by_known_id, by_class_vocabulary, by_text_profile];

fn select_lyrics_container(document: &Html) -> Option<ElementRef<'_>> {
    CONTAINER_HEURISTICS
        .iter()
        .find_map(|heuristic| heuristic(document))
}

/// Tier 1: a div carrying one of the ids the site has used for lyrics
fn by_known_id(document: &Html) -> Option<ElementRef<'_>> {
    for id in KNOWN_IDS {
        if let Ok(selector) = Selector::parse(&format!("div#{}", id)) {
            if let Some(element) = document.select(&selector).next() {
                return Some(element);
            }
        }
    }
    None
}

/// Tier 2: a div whose class attribute contains a vocabulary entry
///
/// Vocabulary order wins over document order: `kashi_area` anywhere on the
/// page beats an earlier `song_table`.
fn by_class_vocabulary(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("div[class]").ok()?;
    for needle in CLASS_VOCABULARY {
        for element in document.select(&selector) {
            let matches = element
                .value()
                .attr("class")
                .map(|classes| classes.contains(needle))
                .unwrap_or(false);
            if matches {
                return Some(element);
            }
        }
    }
    None
}

/// Tier 3: first non-chrome div with a lyrics-shaped text profile
fn by_text_profile(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("div").ok()?;
    for element in document.select(&selector) {
        if let Some(id) = element.value().attr("id") {
            if CHROME_IDS.contains(&id) {
                continue;
            }
        }
        let text = container_text(element);
        if text.chars().count() > 100
            && LYRIC_INDICATORS
                .iter()
                .any(|indicator| text.contains(indicator))
        {
            return Some(element);
        }
    }
    None
}

/// Flattens a container to text, one trimmed fragment per line
///
/// Script and style subtrees are skipped so ad and player snippets never
/// leak into the lyrics body.
fn container_text(container: ElementRef<'_>) -> String {
    let mut fragments = Vec::new();
    collect_text(container, &mut fragments);
    fragments.join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if name == "script" || name == "style" {
                continue;
            }
            collect_text(child_element, out);
        }
    }
}

/// Strips trailing boilerplate and collapses blank-line runs
fn clean_content(text: &str) -> String {
    let mut content = text.to_string();
    for marker in BOILERPLATE_MARKERS {
        if let Some(pos) = content.find(marker) {
            content.truncate(pos);
            content = content.trim().to_string();
        }
    }
    let collapsed = BLANK_RUN.replace_all(&content, "\n\n");
    collapsed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_h2() {
        let html = r#"<html><head><title>ポルノグラフィティ サウダージ 歌詞 - 歌ネット</title></head>
            <body><h2>サウダージ</h2><div id="kashi_area">歌詞本文</div></body></html>"#;
        let song = extract_song(html);
        assert_eq!(song.title, "サウダージ");
    }

    #[test]
    fn test_title_from_document_title_strips_suffix_and_artist() {
        let html = r#"<html><head><title>ポルノグラフィティ アゲハ蝶 歌詞 - 歌ネット</title></head>
            <body></body></html>"#;
        let song = extract_song(html);
        assert_eq!(song.title, "アゲハ蝶");
    }

    #[test]
    fn test_title_single_token_kept_whole() {
        let html = r#"<html><head><title>アゲハ蝶 歌詞 - 歌ネット</title></head><body></body></html>"#;
        let song = extract_song(html);
        assert_eq!(song.title, "アゲハ蝶");
    }

    #[test]
    fn test_title_falls_back_to_unknown() {
        let song = extract_song("<html><body><p>nothing here</p></body></html>");
        assert_eq!(song.title, "unknown");
    }

    #[test]
    fn test_container_by_known_id() {
        let html = r#"<html><body>
            <div id="other">decoy</div>
            <div id="kashi_area">一行目<br>二行目</div>
        </body></html>"#;
        let song = extract_song(html);
        assert_eq!(song.content, "一行目\n二行目");
    }

    #[test]
    fn test_container_id_order_prefers_kashi_area() {
        let html = r#"<html><body>
            <div id="kashi">short</div>
            <div id="kashi_area">the real one</div>
        </body></html>"#;
        let song = extract_song(html);
        assert_eq!(song.content, "the real one");
    }

    #[test]
    fn test_container_by_class_vocabulary() {
        let html = r#"<html><body>
            <div class="side song_table">table chrome</div>
            <div class="kashi_area main">本文テキスト</div>
        </body></html>"#;
        let song = extract_song(html);
        // Vocabulary order: kashi_area wins although song_table comes first
        assert_eq!(song.content, "本文テキスト");
    }

    #[test]
    fn test_container_fallback_text_profile() {
        let filler = "あ".repeat(120);
        let html = format!(
            r#"<html><body>
            <div id="header">ナビゲーションメニューのテキスト</div>
            <div id="main">作詞：某氏 {}</div>
            </body></html>"#,
            filler
        );
        let song = extract_song(&html);
        assert!(song.content.contains("作詞：某氏"));
    }

    #[test]
    fn test_fallback_skips_chrome_ids() {
        let filler = "歌詞".repeat(80);
        let html = format!(
            r#"<html><body><div id="footer">{}</div></body></html>"#,
            filler
        );
        let song = extract_song(&html);
        assert_eq!(song.content, "");
    }

    #[test]
    fn test_fallback_requires_lyric_indicator() {
        let filler = "x".repeat(200);
        let html = format!(r#"<html><body><div>{}</div></body></html>"#, filler);
        let song = extract_song(&html);
        assert_eq!(song.content, "");
    }

    #[test]
    fn test_script_and_style_stripped() {
        let html = r#"<html><body><div id="kashi_area">
            本文
            <script>var ad = "junk";</script>
            <style>.x { color: red }</style>
            続き
        </div></body></html>"#;
        let song = extract_song(html);
        assert_eq!(song.content, "本文\n続き");
    }

    #[test]
    fn test_boilerplate_truncation() {
        let html = r#"<html><body><div id="kashi_area">本文の歌詞この歌詞をマイ歌ネットに登録あとで出てくる宣伝</div></body></html>"#;
        let song = extract_song(html);
        assert_eq!(song.content, "本文の歌詞");
    }

    #[test]
    fn test_second_boilerplate_marker() {
        let html = r#"<html><body><div id="kashi_area">本文この曲のフレーズを投稿宣伝</div></body></html>"#;
        let song = extract_song(html);
        assert_eq!(song.content, "本文");
    }

    #[test]
    fn test_blank_run_collapses_to_two_newlines() {
        let collapsed = clean_content("一番\n\n\n\n二番");
        assert_eq!(collapsed, "一番\n\n二番");
    }

    #[test]
    fn test_no_container_yields_empty_content() {
        let song = extract_song("<html><body><p>短い</p></body></html>");
        assert_eq!(song.content, "");
    }
}
