//! The hybrid document format: an optional `---`-fenced block of
//! `key: value` metadata lines, followed by a prose body.

use ratatui::text::Text;
use tracing::warn;

use crate::content::markup::{self, MarkupError};
use crate::http::Fetch;

const FENCE: &str = "---";

/// Ordered key/value metadata. Later writes to an existing key replace the
/// value in place, keeping the key's original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    // Accessors for the keys rendering relies on. Absent keys fall back to
    // empty defaults; nothing here validates.

    pub fn title(&self) -> &str {
        self.get("title").unwrap_or_default()
    }

    pub fn release_date(&self) -> &str {
        self.get("release_date").unwrap_or_default()
    }

    pub fn featured(&self) -> bool {
        matches!(
            self.get("featured").map(str::to_ascii_lowercase).as_deref(),
            Some("true" | "yes" | "1")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub metadata: Metadata,
    pub content: Text<'static>,
}

/// Total: any input yields a document. Malformed metadata lines are
/// skipped, a failed body conversion falls back to the raw body text.
pub fn parse(raw: &str) -> ParsedDocument {
    parse_with(raw, markup::convert)
}

pub fn parse_with<F>(raw: &str, convert: F) -> ParsedDocument
where
    F: FnOnce(&str) -> Result<Text<'static>, MarkupError>,
{
    let (block, body) = split_fenced(raw);
    let metadata = parse_metadata(block.unwrap_or_default());
    let content = match convert(body) {
        Ok(text) => text,
        Err(err) => {
            warn!("{err}, keeping raw body");
            Text::raw(body.to_string())
        }
    };
    ParsedDocument { metadata, content }
}

/// Fetches and parses a document. Network failures and non-success
/// statuses yield `None`; they never escalate past this point.
pub async fn load_from(fetch: &dyn Fetch, path: &str) -> Option<ParsedDocument> {
    match fetch.fetch_text(path).await {
        Ok(raw) => Some(parse(&raw)),
        Err(err) => {
            warn!("document {path} unavailable: {err}");
            None
        }
    }
}

/// Splits off a fence-delimited metadata block. The opening fence must be
/// the very first line; without a matching closing fence the whole input
/// is body.
fn split_fenced(raw: &str) -> (Option<&str>, &str) {
    let mut lines = raw.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (None, raw);
    };
    if first.trim_end_matches(['\n', '\r']) != FENCE {
        return (None, raw);
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if line.trim_end_matches(['\n', '\r']) == FENCE {
            return (Some(&raw[block_start..offset]), &raw[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, raw)
}

fn parse_metadata(block: &str) -> Metadata {
    let mut metadata = Metadata::default();
    for line in block.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        metadata.insert(key, value.trim());
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_block_splits_metadata_from_body() {
        let doc = parse("---\ntitle: First Light\nrelease_date: 2024-03-01\n---\nThe record.\n");
        assert_eq!(doc.metadata.get("title"), Some("First Light"));
        assert_eq!(doc.metadata.get("release_date"), Some("2024-03-01"));
        assert_eq!(doc.content, markup::to_text("The record.\n"));
    }

    #[test]
    fn values_keep_everything_after_the_first_colon() {
        let doc = parse("---\nnote: released: march\n---\n");
        assert_eq!(doc.metadata.get("note"), Some("released: march"));
    }

    #[test]
    fn duplicate_keys_are_last_write_wins() {
        let doc = parse("---\ntitle: Old\ntitle: New\n---\n");
        assert_eq!(doc.metadata.get("title"), Some("New"));
        assert_eq!(doc.metadata.len(), 1);
    }

    #[test]
    fn malformed_lines_are_skipped_without_aborting() {
        let doc = parse("---\n\nno colon here\n: empty key\ntitle: Kept\n   \n---\nbody");
        assert_eq!(doc.metadata.len(), 1);
        assert_eq!(doc.metadata.get("title"), Some("Kept"));
        assert_eq!(doc.content, markup::to_text("body"));
    }

    #[test]
    fn missing_fence_treats_whole_input_as_body() {
        let doc = parse("just prose, no metadata");
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.content, markup::to_text("just prose, no metadata"));
    }

    #[test]
    fn fence_must_open_on_the_first_line() {
        let doc = parse("prelude\n---\ntitle: Nope\n---\n");
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn unclosed_fence_degrades_to_body() {
        let doc = parse("---\ntitle: Dangling");
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.content, markup::to_text("---\ntitle: Dangling"));
    }

    #[test]
    fn empty_input_parses_to_empty_document() {
        let doc = parse("");
        assert!(doc.metadata.is_empty());
        assert!(doc.content.lines.is_empty());
    }

    #[test]
    fn crlf_fences_are_recognized() {
        let doc = parse("---\r\ntitle: Windows\r\n---\r\nbody\r\n");
        assert_eq!(doc.metadata.get("title"), Some("Windows"));
    }

    #[test]
    fn converter_failure_falls_back_to_raw_body() {
        let doc = parse_with("---\ntitle: T\n---\nraw body", |_| {
            Err(MarkupError("simulated".into()))
        });
        assert_eq!(doc.metadata.get("title"), Some("T"));
        assert_eq!(doc.content, Text::raw("raw body"));
    }

    #[test]
    fn metadata_order_is_preserved() {
        let doc = parse("---\nb: 2\na: 1\nb: 3\n---\n");
        let keys: Vec<_> = doc.metadata.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(doc.metadata.get("b"), Some("3"));
    }

    #[test]
    fn featured_flag_accepts_common_truthy_values() {
        for value in ["true", "yes", "1", "TRUE"] {
            let doc = parse(&format!("---\nfeatured: {value}\n---\n"));
            assert!(doc.metadata.featured(), "{value} should mark featured");
        }
        let doc = parse("---\nfeatured: false\n---\n");
        assert!(!doc.metadata.featured());
        assert!(!parse("").metadata.featured());
    }
}
