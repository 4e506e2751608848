use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use usaco_scraper::config::Config;
use usaco_scraper::logging::{init_logging, LoggerConfig};
use usaco_scraper::writer::{self, OutputTarget};
use usaco_scraper::{log_info, Pipeline, Result};

#[derive(Parser)]
#[command(
    name = "usaco-scraper",
    about = "Download a USACO problem statement as Markdown"
)]
struct Cli {
    /// URL of the problem page
    url: String,

    /// Output file, or a directory to put README.md in
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,

    /// Replace the output file if it already exists
    #[arg(long)]
    overwrite: bool,

    /// Print the document to stdout instead of writing a file
    #[arg(long, conflicts_with_all = ["save", "overwrite"])]
    print: bool,

    /// Configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // printed directly: config errors happen before logging is set up
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path, true)?,
        None => Config::load(&PathBuf::from("config.toml"), false)?,
    };

    init_logging(LoggerConfig::from_config(
        &config.logging,
        cli.log_level.as_deref(),
    )?)?;

    let pipeline = Pipeline::new(&config)?;

    if cli.print {
        let doc = pipeline.scrape(&cli.url).await?;
        print!("{}", writer::render(&doc));
        return Ok(());
    }

    let target = OutputTarget {
        save: cli.save,
        default_dir: std::env::current_dir()?,
        default_name: config.output.file_name.clone(),
        overwrite: cli.overwrite,
    };

    let path = pipeline.run(&cli.url, &target).await?;
    log_info!("[main] Problem saved to {}", path.display());
    println!("Saved {}", path.display());
    Ok(())
}
