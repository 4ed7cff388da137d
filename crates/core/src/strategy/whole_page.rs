use super::{ExtractionStrategy, StrategyId};
use crate::Result;
use crate::cleaner::normalize_whitespace;
use crate::fetch::Page;
use crate::parse::Document;
use crate::preprocess::{WHOLE_PAGE_STRIP, strip_elements};

/// The least selective strategy: all visible text outside scripts and
/// navigation chrome. Long but noisy, which makes it the usual winner on
/// pages the other strategies cannot read.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholePageStrategy;

impl ExtractionStrategy for WholePageStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::WholePage
    }

    fn extract(&self, page: &Page) -> Result<String> {
        Ok(extract_whole_page(&page.html))
    }
}

pub fn extract_whole_page(html: &str) -> String {
    let doc = Document::parse(&strip_elements(html, WHOLE_PAGE_STRIP));
    normalize_whitespace(&doc.text_nodes_joined("\n")).trim().to_string()
}
