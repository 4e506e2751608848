mod problem;
pub mod text;

pub use problem::UsacoLayout;

use crate::document::ProblemDocument;
use crate::error::{Result, ScraperError};
use scraper::{Html, Selector};

/// Site-specific rules for pulling a problem out of a parsed page.
///
/// Everything that depends on the target site's markup lives behind this
/// trait; a layout change only touches the implementation.
pub trait ProblemLayout {
    fn extract(&self, document: &Html, source_url: Option<&str>) -> Result<ProblemDocument>;
}

pub struct Scraper {
    document: Html,
}

impl Scraper {
    pub fn new(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn extract<L: ProblemLayout + ?Sized>(
        &self,
        layout: &L,
        source_url: Option<&str>,
    ) -> Result<ProblemDocument> {
        layout.extract(&self.document, source_url)
    }
}

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScraperError::SelectorError(e.to_string()).into())
}
