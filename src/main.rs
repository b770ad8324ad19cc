use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use logwarden::cli;
use logwarden::config::AppConfig;
use logwarden::filter::LogFilterSpec;
use logwarden::record::NewRequestLog;
use logwarden::storage::{PageRequest, Sort, DEFAULT_PAGE_SIZE};

#[derive(Parser)]
#[command(name = "logwarden", version, about = "Masked request logs for API gateways")]
struct Cli {
    /// Project root containing `.logwarden/`. Defaults to the current directory.
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.logwarden/` with a default config.
    Init,

    /// Append a request log entry.
    Record {
        #[arg(long)]
        ip: Option<String>,
        #[arg(long)]
        method: Option<String>,
        #[arg(long)]
        duration_ms: Option<u64>,
        #[arg(long)]
        request: Option<String>,
        #[arg(long)]
        response: Option<String>,
        /// Request time (RFC 3339). Defaults to now.
        #[arg(long, value_parser = cli::parse_timestamp)]
        date: Option<DateTime<FixedOffset>>,
    },

    /// List request logs, optionally filtered.
    Query {
        /// Origin IP substring (case-insensitive).
        #[arg(long)]
        ip: Option<String>,
        /// Inclusive lower bound (RFC 3339).
        #[arg(long, value_parser = cli::parse_timestamp)]
        from: Option<DateTime<FixedOffset>>,
        /// Inclusive upper bound (RFC 3339).
        #[arg(long, value_parser = cli::parse_timestamp)]
        to: Option<DateTime<FixedOffset>>,
        /// Show masked payloads instead of a fixed marker.
        #[arg(long)]
        include_payloads: bool,
        #[arg(long, default_value_t = 0)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: usize,
        /// `field[,asc|desc]`, e.g. `request_date,desc`.
        #[arg(long)]
        sort: Option<String>,
    },

    /// Mask TEXT (or stdin) with the configured rules.
    Mask { text: Option<String> },
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("LOGWARDEN_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Configuration problems stop the process before the command runs.
fn load_config(project_root: &Path) -> anyhow::Result<AppConfig> {
    let config = AppConfig::load_project(project_root).context("failed to load configuration")?;
    init_tracing(&config.logging.level);
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let project_root = match args.project {
        Some(path) => path,
        None => std::env::current_dir().context("cannot resolve current directory")?,
    };

    match args.command {
        Command::Init => {
            init_tracing("info");
            cli::init::run(&project_root)?;
        }
        Command::Record {
            ip,
            method,
            duration_ms,
            request,
            response,
            date,
        } => {
            let config = load_config(&project_root)?;
            let entry = NewRequestLog {
                origin_ip: ip,
                method_name: method,
                request_date: date,
                duration_ms,
                request_payload: request,
                response_payload: response,
            };
            cli::record::run(&project_root, &config, entry)?;
        }
        Command::Query {
            ip,
            from,
            to,
            include_payloads,
            page,
            size,
            sort,
        } => {
            let config = load_config(&project_root)?;
            let filter = LogFilterSpec::new(ip, from, to);
            let mut request = PageRequest::new(page, size)?;
            if let Some(sort) = sort {
                request = request.with_sort(sort.parse::<Sort>()?);
            }
            cli::query::run(&project_root, &config, &filter, include_payloads, &request)?;
        }
        Command::Mask { text } => {
            let config = load_config(&project_root)?;
            cli::mask::run(&config, text.as_deref())?;
        }
    }

    Ok(())
}
