pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod gui;
pub mod logging;
pub mod pipeline;
pub mod scraper;
pub mod utils;
pub mod writer;

pub use document::ProblemDocument;
pub use error::{AppError, Result};
pub use pipeline::Pipeline;
