//! Front-end controller for the windowed scraper.
//!
//! Holds the state behind the window (URL field, save location, overwrite
//! toggle, preview pane, status line) and runs the same pipeline as the
//! command line when the "Scrape" action fires. Drawing the widgets is left
//! to whichever toolkit embeds it.

mod settings;

pub use settings::Settings;

use crate::config::Config;
use crate::error::{OutputError, Result};
use crate::pipeline::Pipeline;
use crate::utils::ensure_directory;
use crate::writer::{self, OutputTarget};
pub use crate::{log_error, log_info};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Idle,
    Saved(PathBuf),
    Failed(String),
}

impl Status {
    /// Text for the status line.
    pub fn message(&self) -> String {
        match self {
            Status::Idle => String::new(),
            Status::Saved(path) => format!("Saved to {}", path.display()),
            Status::Failed(reason) => reason.clone(),
        }
    }
}

pub struct ScraperWindow {
    pipeline: Pipeline,
    settings: Settings,
    settings_path: PathBuf,
    url: String,
    save_location: Option<PathBuf>,
    overwrite: bool,
    preview: Option<String>,
    file_name: Option<String>,
    status: Status,
}

impl ScraperWindow {
    pub fn open(config: &Config) -> Result<Self> {
        let settings_path = config.gui.settings_file.clone();
        let settings = Settings::load(&settings_path, &config.gui.download_dir);

        Ok(Self {
            pipeline: Pipeline::new(config)?,
            settings,
            settings_path,
            url: String::new(),
            save_location: None,
            overwrite: false,
            preview: None,
            file_name: None,
            status: Status::Idle,
        })
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = url.trim().to_string();
    }

    /// The "Scrape" button is only enabled for problem page URLs.
    pub fn scrape_enabled(&self) -> bool {
        let site = &self.pipeline.config().site;
        if site.restrict_to_site {
            site.is_problem_url(&self.url)
        } else {
            !self.url.is_empty()
        }
    }

    pub fn set_save_location(&mut self, location: Option<PathBuf>) {
        self.save_location = location;
    }

    pub fn set_overwrite(&mut self, overwrite: bool) {
        self.overwrite = overwrite;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Replaces the preview with text edited in the preview pane.
    pub fn set_preview_text(&mut self, text: &str) {
        self.preview = Some(text.to_string());
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Runs fetch, extract and write for the current URL and updates the
    /// status line with the outcome.
    pub async fn scrape(&mut self) -> &Status {
        if !self.scrape_enabled() {
            self.status = Status::Failed(format!(
                "Enter a problem URL from {}",
                self.pipeline.config().site.base_url
            ));
            return &self.status;
        }

        self.status = match self.scrape_and_save().await {
            Ok(path) => self.saved(path),
            Err(e) => {
                log_error!(e => "[gui] Scrape failed for {}", self.url);
                self.preview = None;
                self.file_name = None;
                Status::Failed(e.to_string())
            }
        };
        &self.status
    }

    /// Writes the preview text, edits included, to `location`. The path is
    /// resolved like the save location of a scrape, relative paths against
    /// the last save directory.
    pub fn save(&mut self, location: &Path) -> &Status {
        self.status = match self.save_preview(location) {
            Ok(path) => self.saved(path),
            Err(e) => {
                log_error!(e => "[gui] Save failed for {}", location.display());
                Status::Failed(e.to_string())
            }
        };
        &self.status
    }

    fn save_preview(&self, location: &Path) -> Result<PathBuf> {
        let text = self.preview.as_deref().ok_or(OutputError::EmptyPreview)?;
        let default_name = self
            .file_name
            .as_deref()
            .unwrap_or(&self.pipeline.config().output.file_name);

        let path =
            writer::resolve_output_path(Some(location), &self.settings.save_directory, default_name)?;
        writer::write_text(&path, text, self.overwrite)?;
        log_info!("[gui] Saved preview to {}", path.display());
        Ok(path)
    }

    fn saved(&mut self, path: PathBuf) -> Status {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            self.settings.save_directory = dir.to_path_buf();
        }
        Status::Saved(path)
    }

    async fn scrape_and_save(&mut self) -> Result<PathBuf> {
        let doc = self.pipeline.scrape(&self.url).await?;

        let default_dir = self.settings.save_directory.clone();
        if self.save_location.is_none() {
            ensure_directory(&default_dir)?;
        }

        let default_name = format!("{}.md", doc.slug());
        let target = OutputTarget {
            save: self.save_location.clone(),
            default_dir,
            default_name: default_name.clone(),
            overwrite: self.overwrite,
        };
        let path = writer::write_document(&doc, &target)?;
        self.preview = Some(writer::render(&doc));
        self.file_name = Some(default_name);
        Ok(path)
    }

    /// Persists the window settings; called when the window closes.
    pub fn close(self) -> Result<()> {
        self.save_settings(&self.settings_path)
    }

    fn save_settings(&self, path: &Path) -> Result<()> {
        self.settings.save(path)?;
        log_info!("[gui] Saved settings to {}", path.display());
        Ok(())
    }
}
