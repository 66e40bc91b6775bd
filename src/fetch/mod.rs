//! Retrieval of the opportunity widget's raw markup.

pub mod portal;

use anyhow::Result;
use once_cell::sync::OnceCell;
use regex::Regex;

pub use portal::PortalFetcher;

/// Element id of the "Program Announcement" widget on the portal page.
pub const WIDGET_ID: &str = "opportunityannouncementwidget";

#[async_trait::async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Return the current raw widget markup, or a fetch failure.
    async fn fetch_widget(&self) -> Result<String>;
}

/// Pull the widget's inner HTML out of a full page. Divs nest, so the
/// closing tag is found by depth counting rather than a single regex.
/// Returns `None` when the widget is absent or its markup is unbalanced.
pub fn extract_widget(page: &str) -> Option<String> {
    static RE_OPEN: OnceCell<Regex> = OnceCell::new();
    let re_open = RE_OPEN.get_or_init(|| {
        Regex::new(&format!(
            r#"(?is)<div\b[^>]*\bid\s*=\s*["']{WIDGET_ID}["'][^>]*>"#
        ))
        .unwrap()
    });

    static RE_DIV: OnceCell<Regex> = OnceCell::new();
    let re_div = RE_DIV.get_or_init(|| Regex::new(r"(?is)<div\b[^>]*>|</div\s*>").unwrap());

    let open = re_open.find(page)?;
    let inner = &page[open.end()..];

    let mut depth = 1usize;
    for tag in re_div.find_iter(inner) {
        if tag.as_str().starts_with("</") {
            depth -= 1;
            if depth == 0 {
                return Some(inner[..tag.start()].to_string());
            }
        } else {
            depth += 1;
        }
    }
    None
}
