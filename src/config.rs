use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Rolling log files are only written when a directory is configured.
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default = "default_log_filename")]
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_problem_marker")]
    pub problem_marker: String,
    #[serde(default = "default_restrict_to_site")]
    pub restrict_to_site: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuiConfig {
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    #[serde(default = "default_settings_file")]
    pub settings_file: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub gui: GuiConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
            filename: default_log_filename(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            problem_marker: default_problem_marker(),
            restrict_to_site: default_restrict_to_site(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
        }
    }
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            settings_file: default_settings_file(),
        }
    }
}

impl SiteConfig {
    /// Whether `url` points at a problem page of the configured site.
    pub fn is_problem_url(&self, url: &str) -> bool {
        let url = url.trim();
        !url.is_empty() && url.starts_with(&self.base_url) && url.contains(&self.problem_marker)
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::FileRead)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Reads `path` if it exists. A missing file is only an error when the
    /// caller asked for it explicitly.
    pub fn load(path: &Path, explicit: bool) -> Result<Self> {
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    fn validate(&self) -> Result<()> {
        if self.site.base_url.is_empty() {
            return Err(ConfigError::MissingField("site.base_url".to_string()).into());
        }
        if !self.site.base_url.starts_with("http") {
            return Err(ConfigError::InvalidValue(format!(
                "site.base_url must start with http(s): {}",
                self.site.base_url
            ))
            .into());
        }

        if self.client.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "client.timeout_secs must be greater than 0".to_string(),
            )
            .into());
        }

        if self.output.file_name.is_empty() {
            return Err(ConfigError::MissingField("output.file_name".to_string()).into());
        }

        if self.gui.download_dir.as_os_str().is_empty() {
            return Err(
                ConfigError::InvalidValue("gui.download_dir cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}

fn default_base_url() -> String {
    "https://usaco.org/".to_string()
}

fn default_problem_marker() -> String {
    "index.php?page=viewproblem".to_string()
}

fn default_restrict_to_site() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36".to_string()
}

fn default_file_name() -> String {
    "README.md".to_string()
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_settings_file() -> PathBuf {
    PathBuf::from("settings.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_filename() -> String {
    "usaco-scraper.log".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.site.base_url, "https://usaco.org/");
        assert_eq!(config.output.file_name, "README.md");
        assert_eq!(config.gui.download_dir, PathBuf::from("downloads"));
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::from_toml(
            r#"
            [client]
            timeout_secs = 5

            [output]
            file_name = "problem.md"

            [logging]
            level = "debug"
            directory = "logs"
            "#,
        )
        .unwrap();
        assert_eq!(config.client.timeout_secs, 5);
        assert_eq!(config.output.file_name, "problem.md");
        assert_eq!(config.logging.directory.as_deref(), Some("logs"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::from_toml("[client]\ntimeout_secs = 0\n").unwrap_err();
        assert_eq!(err.kind(), "config");
    }

    #[test]
    fn missing_default_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(Config::load(&path, false).is_ok());
        assert!(Config::load(&path, true).is_err());
    }

    #[test]
    fn problem_url_check() {
        let site = SiteConfig::default();
        assert!(site.is_problem_url("https://usaco.org/index.php?page=viewproblem2&cpid=1347"));
        assert!(!site.is_problem_url("https://usaco.org/index.php?page=dec23results"));
        assert!(!site.is_problem_url("https://example.com/index.php?page=viewproblem2"));
        assert!(!site.is_problem_url("   "));
    }
}
