//! Widget text normalization and the snapshot type the whole pipeline
//! compares on. Normalization happens exactly once, at construction;
//! nothing downstream re-derives it.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Widgets showing this text (any case, any surrounding markup) mean
/// "nothing listed" and canonicalize to the empty snapshot.
const NO_DATA_SENTINEL: &str = "no data";

/// Normalize raw widget markup into comparison form:
/// entity decode, strip tags, collapse whitespace, trim,
/// fold the "No Data" sentinel to the empty string.
pub fn normalize(raw: &str) -> String {
    let mut out = html_escape::decode_html_entities(raw).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    if out.eq_ignore_ascii_case(NO_DATA_SENTINEL) {
        out.clear();
    }
    out
}

/// A point-in-time capture of the widget's normalized text.
/// No identity beyond its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSnapshot {
    text: String,
}

impl WidgetSnapshot {
    /// Build a snapshot from raw widget markup.
    pub fn new(raw: &str) -> Self {
        Self {
            text: normalize(raw),
        }
    }

    /// Rebuild a snapshot from persisted text. Persisted content is already
    /// normalized, but normalization is idempotent so we run it anyway
    /// rather than trust the file.
    pub fn from_stored(text: &str) -> Self {
        Self::new(text)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the widget reports nothing listed ("No Data" or blank).
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
