use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Client(#[from] ClientError),

    #[error("Extraction error: {0}")]
    Scraper(#[from] ScraperError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl AppError {
    /// Short tag used in log records and for the process exit code.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config",
            AppError::Client(_) => "network",
            AppError::Scraper(_) => "extraction",
            AppError::Output(OutputError::FileExists(_)) => "conflict",
            AppError::Output(_) => "output",
            AppError::Io(_) => "io",
            AppError::Serde(_) => "serde",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            "network" => 2,
            "extraction" => 3,
            "conflict" => 4,
            _ => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required configuration: {0}")]
    MissingField(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build client: {0}")]
    BuildError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Response error {status_code}: {message}")]
    ResponseError { status_code: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Could not locate the {0} on the page")]
    MissingSection(&'static str),

    #[error("Found {inputs} sample inputs but {outputs} sample outputs")]
    SampleMismatch { inputs: usize, outputs: usize },

    #[error("Selector error: {0}")]
    SelectorError(String),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("File already exists: {} (use --overwrite to replace it)", .0.display())]
    FileExists(PathBuf),

    #[error("File name contains invalid characters: {0}")]
    InvalidFileName(String),

    #[error("File must be a markdown or text file, got: {0}")]
    UnsupportedExtension(String),

    #[error("Nothing to save yet, scrape a problem first")]
    EmptyPreview,

    #[error("Directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AppError>;
