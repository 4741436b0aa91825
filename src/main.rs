use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use corpus_builder::config::{
    CorpusConfig, Language, OutputFormat, SkipPages, SourceDescriptor, DEFAULT_BOOKS_OUTPUT_BASE,
    DEFAULT_WEB_OUTPUT_BASE,
};
use corpus_builder::data::{
    BookCorpusLoader, LoadReport, ReqwestFetcher, WebContentExtractor, WebCorpusLoader,
};
use corpus_builder::export::CorpusWriter;

#[derive(Debug, Parser)]
#[command(author, version, about = "Build normalized text corpora from books and web pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build a corpus from a directory of Title_Author.ext documents
    Books(BooksArgs),
    /// Build a corpus from web pages
    Web(WebArgs),
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Path to configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base name of the output artifact
    #[arg(long)]
    output_base: Option<String>,

    /// Output format: txt, json, xml or zip
    #[arg(long)]
    format: Option<String>,

    /// Language code: en, ru, tg
    #[arg(long)]
    language: Option<String>,

    /// Directory the artifact is written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Leading lines/paragraphs/pages to drop
    #[arg(long)]
    skip_head: Option<usize>,

    /// Trailing lines/paragraphs/pages to drop
    #[arg(long)]
    skip_tail: Option<usize>,

    #[arg(long)]
    keep_footnotes: bool,

    #[arg(long)]
    keep_links: bool,

    #[arg(long)]
    keep_digits: bool,

    /// Extra cleaning regex, applied after the built-in passes (repeatable)
    #[arg(long = "pattern")]
    patterns: Vec<String>,
}

#[derive(Debug, Args)]
struct BooksArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Input directory containing the documents
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Also process subdirectories
    #[arg(long)]
    recursive: bool,
}

#[derive(Debug, Args)]
struct WebArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Page to fetch (repeatable)
    #[arg(long = "url")]
    urls: Vec<String>,

    /// File with one URL per line
    #[arg(long)]
    urls_file: Option<PathBuf>,

    /// Fetch timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Drop failed pages instead of keeping an error placeholder
    #[arg(long)]
    drop_failed: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Books(args) => books_command(args),
        Commands::Web(args) => web_command(args),
    }
}

fn load_config(args: &CommonArgs) -> Result<CorpusConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {:?}", path);
            let config_str = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            serde_json::from_str(&config_str).with_context(|| "Failed to parse config JSON")?
        }
        None => CorpusConfig::default(),
    };

    if let Some(base) = &args.output_base {
        config.output_base = base.clone();
    }
    if let Some(format) = &args.format {
        config.output_format = OutputFormat::parse(format);
    }
    if let Some(code) = &args.language {
        config.language = Language::from_code(code);
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = Some(dir.clone());
    }
    if args.skip_head.is_some() || args.skip_tail.is_some() {
        config.skip_pages = SkipPages::new(
            args.skip_head.unwrap_or(config.skip_pages.head),
            args.skip_tail.unwrap_or(config.skip_pages.tail),
        );
    }
    if args.keep_footnotes {
        config.ignore_footnotes = false;
    }
    if args.keep_links {
        config.ignore_links = false;
    }
    if args.keep_digits {
        config.strip_digits = false;
    }
    config.custom_patterns.extend(args.patterns.iter().cloned());

    Ok(config)
}

fn print_summary(report: &LoadReport, artifact: &Path) {
    println!("Units written: {}", report.batch.len());
    println!("Processed: {}", report.processed.len());
    if !report.skipped.is_empty() {
        println!("Skipped: {}", report.skipped.len());
        for skipped in &report.skipped {
            println!("  {}: {}", skipped.source, skipped.reason);
        }
    }
    println!("Artifact: {}", artifact.display());
}

fn books_command(args: BooksArgs) -> Result<()> {
    let mut config = load_config(&args.common)?;
    if let Some(input) = args.input {
        config.books_folder = Some(input);
    }
    if args.recursive {
        config.recursive = true;
    }
    config.validate()?;

    let Some(folder) = config.books_folder.clone() else {
        bail!("No books folder given (use --input or books_folder in the config)");
    };

    info!("Configuration: language={}, format={:?}, skip_pages=({}, {})",
        config.language,
        config.output_format,
        config.skip_pages.head,
        config.skip_pages.tail);

    let loader = BookCorpusLoader::new(config.extraction_options())?.recursive(config.recursive);
    let report = loader.load_directory(&folder)?;

    let output_dir = config.output_dir.clone().unwrap_or(folder);
    let writer = CorpusWriter::new(output_dir, &config.output_base, config.output_format);
    let artifact = writer.write(&report.batch)?;

    print_summary(&report, &artifact);
    Ok(())
}

fn read_urls_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL list: {:?}", path))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

fn web_command(args: WebArgs) -> Result<()> {
    let mut config = load_config(&args.common)?;
    if args.common.output_base.is_none() && config.output_base == DEFAULT_BOOKS_OUTPUT_BASE {
        config.output_base = DEFAULT_WEB_OUTPUT_BASE.to_string();
    }
    if let Some(timeout) = args.timeout {
        config.fetch_timeout_secs = timeout;
    }
    if args.drop_failed {
        config.keep_failed_pages = false;
    }

    let mut extra_urls = args.urls;
    if let Some(path) = &args.urls_file {
        extra_urls.extend(read_urls_file(path)?);
    }
    config
        .sources
        .extend(extra_urls.into_iter().map(|url| SourceDescriptor::Web { url }));
    config.validate()?;

    let urls = config.web_urls();
    if urls.is_empty() {
        bail!("No web sources given (use --url, --urls-file or sources in the config)");
    }

    let fetcher = ReqwestFetcher::new(Duration::from_secs(config.fetch_timeout_secs))?;
    let extractor = WebContentExtractor::new(
        Box::new(fetcher),
        config.language,
        &config.web_cleaning,
        &config.custom_patterns,
    )?;
    let loader = WebCorpusLoader::new(extractor).keep_failed(config.keep_failed_pages);
    let report = loader.load_urls(&urls)?;

    let output_dir = config.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let writer = CorpusWriter::new(output_dir, &config.output_base, config.output_format);
    let artifact = writer.write(&report.batch)?;
    let artifact = fs::canonicalize(&artifact).unwrap_or(artifact);

    print_summary(&report, &artifact);
    Ok(())
}
