use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use client_logging::LogDestination;
use pubmed_client::ExportFormat;
use pubmed_core::validation::{
    DEFAULT_ALLOW_EXTERNAL, DEFAULT_CONCURRENCY, DEFAULT_MAX_RESULTS, DEFAULT_PMC_ONLY,
};
use pubmed_core::{ArticleStatus, CreateJobRequest};

#[derive(Debug, Parser)]
#[command(name = "pubmed")]
#[command(version, about = "Create and follow PubMed article download jobs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Backend base URL (overrides PUBMED_API_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Use the in-memory mock backend instead of a server
    #[arg(long, global = true)]
    pub mock: bool,

    /// Artificial latency of every mock response
    #[arg(long, global = true, value_name = "MS", default_value_t = 200)]
    pub mock_delay_ms: u64,

    /// Where log output goes
    #[arg(long, global = true, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log at debug level
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
    Off,
}

impl LogTarget {
    pub fn destination(self) -> Option<LogDestination> {
        match self {
            LogTarget::File => Some(LogDestination::File),
            LogTarget::Terminal => Some(LogDestination::Terminal),
            LogTarget::Both => Some(LogDestination::Both),
            LogTarget::Off => None,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a job from a PubMed query
    Create(CreateArgs),
    /// Show one job
    Show { job_id: String },
    /// Start the search phase
    Search { job_id: String },
    /// Start the URL resolution phase
    Resolve { job_id: String },
    /// Start the PDF download phase
    Download { job_id: String },
    /// List the articles of a job
    Results(ResultsArgs),
    /// Save the article metadata of a job
    Export {
        job_id: String,
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        /// Output directory
        #[arg(long = "out", value_name = "DIR", default_value = ".")]
        dir: PathBuf,
    },
    /// Save a ZIP of every downloaded PDF of a job
    ExportZip {
        job_id: String,
        /// Output directory
        #[arg(long = "out", value_name = "DIR", default_value = ".")]
        dir: PathBuf,
    },
    /// Retry one article
    Retry { article_id: String },
    /// Run the crawl flow for one article
    Crawl { article_id: String },
    /// Retry every failed article of a job
    RetryFailed { job_id: String },
    /// Follow a job until it completes or fails (Ctrl-C stops)
    Watch {
        job_id: String,
        /// Poll interval override
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
    },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Human-readable job name
    #[arg(long)]
    pub name: String,
    /// PubMed query, e.g. '"atrial fibrillation"[tiab] AND malnutrition[tiab]'
    #[arg(long)]
    pub query: String,
    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
    pub max_results: u32,
    /// Earliest publication date (YYYY-MM-DD)
    #[arg(long)]
    pub date_from: Option<String>,
    /// Latest publication date (YYYY-MM-DD)
    #[arg(long)]
    pub date_to: Option<String>,
    /// Only download articles with a PMC copy
    #[arg(long, default_value_t = DEFAULT_PMC_ONLY)]
    pub pmc_only: bool,
    /// Never follow publisher links outside PubMed/PMC
    #[arg(long, default_value_t = !DEFAULT_ALLOW_EXTERNAL)]
    pub no_external: bool,
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: u32,
    /// Start search, resolve and download right away
    #[arg(long)]
    pub run: bool,
}

impl CreateArgs {
    pub fn to_request(&self) -> CreateJobRequest {
        CreateJobRequest {
            max_results: Some(self.max_results),
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            pmc_only: Some(self.pmc_only),
            allow_external: Some(!self.no_external),
            concurrency: Some(self.concurrency),
            ..CreateJobRequest::new(self.name.trim(), self.query.trim())
        }
    }
}

#[derive(Debug, Args)]
pub struct ResultsArgs {
    pub job_id: String,
    /// Only articles with this status (e.g. failed_paywall)
    #[arg(long)]
    pub status: Option<ArticleStatus>,
    /// Case-insensitive match on title, PMID or PMC id
    #[arg(long)]
    pub search: Option<String>,
    /// Titles longer than this are cut
    #[arg(long, default_value_t = 60)]
    pub title_width: usize,
}
