use super::selector;
use super::text::{inline_text, plain, preformatted_text, BlockCollector};
use super::ProblemLayout;
use crate::document::{Contest, ProblemDocument, Sample};
use crate::error::{Result, ScraperError};
pub use crate::{log_debug, log_info, log_warn};
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::OnceLock;
use url::Url;

/// Markup rules for `usaco.org` problem pages.
///
/// The page carries two `<h2>` headings (contest, then problem), a results
/// button whose `onclick` holds the contest link, and the statement inside
/// `div.problem-text` with samples in `pre.in` / `pre.out`.
pub struct UsacoLayout {
    base_url: String,
}

impl Default for UsacoLayout {
    fn default() -> Self {
        Self::new("https://usaco.org/")
    }
}

impl UsacoLayout {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn headings(&self, document: &Html) -> Result<Vec<String>> {
        let h2 = selector("h2")?;
        Ok(document
            .select(&h2)
            .map(|el| plain(&inline_text(el)))
            .filter(|text| !text.is_empty())
            .collect())
    }

    fn extract_title(&self, headings: &[String]) -> Option<String> {
        headings
            .iter()
            .find(|h| h.starts_with("Problem"))
            .or_else(|| headings.get(1))
            .cloned()
    }

    fn extract_contest(
        &self,
        document: &Html,
        headings: &[String],
        title: &str,
        source_url: Option<&str>,
    ) -> Result<Option<Contest>> {
        let Some(contest_title) = headings.iter().find(|h| h.as_str() != title) else {
            return Ok(None);
        };

        let division = contest_title
            .split_whitespace()
            .last()
            .filter(|word| !word.ends_with(','))
            .map(str::to_string);

        Ok(Some(Contest {
            title: contest_title.clone(),
            url: self.extract_contest_url(document, source_url)?,
            division,
        }))
    }

    fn extract_contest_url(&self, document: &Html, source_url: Option<&str>) -> Result<Option<String>> {
        let button = selector("button[onclick]")?;
        let href = document
            .select(&button)
            .filter_map(|el| el.value().attr("onclick"))
            .find_map(|onclick| onclick.split('\'').nth(1))
            .filter(|href| !href.is_empty());

        let Some(href) = href else {
            return Ok(None);
        };

        let base = source_url
            .and_then(|u| Url::parse(u).ok())
            .or_else(|| Url::parse(&self.base_url).ok());

        Ok(base
            .and_then(|base| base.join(href).ok())
            .map(|url| url.to_string()))
    }

    fn extract_samples(&self, statement: ElementRef<'_>) -> Result<Vec<Sample>> {
        let inputs: Vec<String> = statement
            .select(&selector("pre.in")?)
            .map(preformatted_text)
            .collect();
        let outputs: Vec<String> = statement
            .select(&selector("pre.out")?)
            .map(preformatted_text)
            .collect();

        if inputs.len() != outputs.len() {
            return Err(ScraperError::SampleMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            }
            .into());
        }

        Ok(inputs
            .into_iter()
            .zip(outputs)
            .map(|(input, output)| Sample { input, output })
            .collect())
    }
}

impl ProblemLayout for UsacoLayout {
    fn extract(&self, document: &Html, source_url: Option<&str>) -> Result<ProblemDocument> {
        let headings = self.headings(document)?;
        let title = self
            .extract_title(&headings)
            .ok_or(ScraperError::MissingSection("problem title"))?;
        log_debug!("[scraper] Found problem title: {}", title);

        let contest = self.extract_contest(document, &headings, &title, source_url)?;
        if contest.is_none() {
            log_warn!("[scraper] No contest heading found for {}", title);
        }

        let statement = document
            .select(&selector("div.problem-text")?)
            .next()
            .ok_or(ScraperError::MissingSection("statement body"))?;

        let body = BlockCollector::default().collect(statement);
        if body.is_empty() {
            return Err(ScraperError::MissingSection("statement body").into());
        }

        let samples = self.extract_samples(statement)?;

        let limits_text = body
            .iter()
            .filter_map(|block| match block {
                crate::document::Block::Paragraph(text) => Some(plain(text)),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n");
        let time_limit = capture(time_limit_pattern(), &limits_text);
        let memory_limit = capture(memory_limit_pattern(), &limits_text);

        log_info!(
            "[scraper] Extracted '{}': {} blocks, {} samples",
            title,
            body.len(),
            samples.len()
        );

        Ok(ProblemDocument {
            url: source_url.map(str::to_string),
            contest,
            title,
            time_limit,
            memory_limit,
            body,
            samples,
        })
    }
}

fn time_limit_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)time limit[^.\n]*?\bis\s+(\d+(?:\.\d+)?\s*(?:ms|milliseconds?|seconds?|s)\b)")
            .expect("time limit pattern is valid")
    })
}

fn memory_limit_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)memory limit[^.\n]*?\bis\s+(\d+\s*(?:[kmg]i?b|megabytes?|gigabytes?)\b)")
            .expect("memory limit pattern is valid")
    })
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}
