use crate::client::{Client, ClientBuilder};
use crate::config::Config;
use crate::document::ProblemDocument;
use crate::error::{ClientError, Result};
use crate::scraper::{ProblemLayout, Scraper, UsacoLayout};
use crate::writer::{self, OutputTarget};
pub use crate::log_info;
use std::path::PathBuf;

/// Fetch, extract and write, one problem per call.
pub struct Pipeline {
    config: Config,
    client: Client,
    layout: Box<dyn ProblemLayout + Send + Sync>,
}

impl Pipeline {
    pub fn new(config: &Config) -> Result<Self> {
        let client = ClientBuilder::from_config(&config.client)?
            .base_url(&config.site.base_url)
            .build()?;

        Ok(Self {
            config: config.clone(),
            client,
            layout: Box::new(UsacoLayout::new(&config.site.base_url)),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetches `url` and extracts the problem from it.
    pub async fn scrape(&self, url: &str) -> Result<ProblemDocument> {
        let url = url.trim();
        let site = &self.config.site;
        if site.restrict_to_site && !site.is_problem_url(url) {
            return Err(ClientError::InvalidUrl(format!(
                "URL must start with {} and contain {}: {}",
                site.base_url, site.problem_marker, url
            ))
            .into());
        }

        log_info!("[pipeline] Fetching {}", url);
        let response = self.client.get(url).await?;
        log_info!(
            "[pipeline] Received response: Status: {}, Content Length: {} bytes",
            response.status,
            response.content.len()
        );

        Scraper::new(&response.content).extract(self.layout.as_ref(), Some(url))
    }

    /// Full run: scrape `url` and write it to `target`.
    pub async fn run(&self, url: &str, target: &OutputTarget) -> Result<PathBuf> {
        let doc = self.scrape(url).await?;
        writer::write_document(&doc, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::{serve_once, unreachable_url};
    use crate::error::{AppError, ScraperError};

    const PROBLEM: &str = include_str!("../fixtures/viewproblem.html");
    const RESULTS: &str = include_str!("../fixtures/results_page.html");

    fn local_pipeline() -> Pipeline {
        let mut config = Config::default();
        config.site.restrict_to_site = false;
        config.client.timeout_secs = 5;
        Pipeline::new(&config).unwrap()
    }

    fn target(dir: &std::path::Path) -> OutputTarget {
        OutputTarget {
            save: None,
            default_dir: dir.to_path_buf(),
            default_name: "README.md".to_string(),
            overwrite: false,
        }
    }

    #[tokio::test]
    async fn writes_problem_page() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve_once("200 OK", PROBLEM);

        let path = local_pipeline().run(&url, &target(dir.path())).await.unwrap();

        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with("# [Problem 1. Candy Cane Feast]"));
        assert!(written.contains("## Sample 1"));
    }

    #[tokio::test]
    async fn non_problem_page_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve_once("200 OK", RESULTS);

        let err = local_pipeline().run(&url, &target(dir.path())).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Scraper(ScraperError::MissingSection(_))
        ));
        assert!(!dir.path().join("README.md").exists());
    }

    #[tokio::test]
    async fn unreachable_url_stops_before_extraction() {
        let dir = tempfile::tempdir().unwrap();

        let err = local_pipeline()
            .run(&unreachable_url(), &target(dir.path()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Client(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn off_site_url_is_rejected_without_request() {
        let pipeline = Pipeline::new(&Config::default()).unwrap();
        let err = pipeline
            .scrape("https://example.com/index.php?page=viewproblem2")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Client(ClientError::InvalidUrl(_))));
    }
}
