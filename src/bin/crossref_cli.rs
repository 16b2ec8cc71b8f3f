//! crossref-cli: Crossref DOI 查询与存在性检查的命令行工具
//!
//! Usage:
//!   crossref-cli works <doi> [--raw]      Print metadata for a DOI
//!   crossref-cli exists <doi>             Exit 0 if the DOI exists, 1 if not
//!
//! Settings come from `CROSSREF_EMAIL`, `CROSSREF_TOKEN`, `CROSSREF_DEBUG`, or a
//! YAML file given with `--settings <path>`. `--cache-dir <path>` keeps
//! responses on disk between runs.

use crossref_client::cache::{CacheBackend, FileCache, MemoryCache};
use crossref_client::notify::ConsoleNotifier;
use crossref_client::{CrossrefClient, Settings, WorkMessage};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct Options {
    command: String,
    doi: String,
    raw: bool,
    settings_path: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
}

fn print_usage() {
    println!(
        r#"crossref-cli: Crossref 命令行工具

USAGE:
    crossref-cli <COMMAND> <DOI> [OPTIONS]

COMMANDS:
    works <doi>                 Print metadata for a DOI
    exists <doi>                Check whether a DOI is registered
    version                     Show version information
    help                        Show this help message

OPTIONS:
    --raw                       Print the full JSON record (works only)
    --settings <path>           Read settings from a YAML file
    --cache-dir <path>          Cache responses in a directory

ENVIRONMENT:
    CROSSREF_EMAIL              Contact email for the polite pool
    CROSSREF_TOKEN              Crossref Plus API token
    CROSSREF_DEBUG              Log transfer statistics (1/true)
    RUST_LOG                    Log filter, e.g. crossref_client=debug"#
    );
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let command = args.first().cloned().ok_or("missing command")?;
    let mut doi = None;
    let mut raw = false;
    let mut settings_path = None;
    let mut cache_dir = None;

    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--raw" => raw = true,
            "--settings" => {
                let p = rest.next().ok_or("--settings needs a path")?;
                settings_path = Some(PathBuf::from(p));
            }
            "--cache-dir" => {
                let p = rest.next().ok_or("--cache-dir needs a path")?;
                cache_dir = Some(PathBuf::from(p));
            }
            other if other.starts_with("--") => return Err(format!("unknown option: {other}")),
            other => {
                if doi.replace(other.to_string()).is_some() {
                    return Err("only one DOI may be given".into());
                }
            }
        }
    }

    Ok(Options {
        command,
        doi: doi.ok_or("missing DOI")?,
        raw,
        settings_path,
        cache_dir,
    })
}

fn init_tracing(debug: bool) {
    let default = if debug { "crossref_client=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_summary(work: &WorkMessage) {
    let work = &work.message;
    println!("DOI:       {}", work.doi);
    if let Some(title) = work.primary_title() {
        println!("Title:     {}", title);
    }
    let authors: Vec<String> = work.author.iter().filter_map(|a| a.display_name()).collect();
    if !authors.is_empty() {
        println!("Authors:   {}", authors.join("; "));
    }
    if let Some(container) = work.container() {
        println!("Container: {}", container);
    }
    if let Some(year) = work.year() {
        println!("Year:      {}", year);
    }
    if let Some(kind) = &work.work_type {
        println!("Type:      {}", kind);
    }
}

async fn run(opts: Options) -> Result<ExitCode, crossref_client::Error> {
    let settings = match &opts.settings_path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::from_env(),
    };
    init_tracing(settings.debug);

    let backend: Arc<dyn CacheBackend> = match &opts.cache_dir {
        Some(dir) => Arc::new(FileCache::new(dir)),
        None => Arc::new(MemoryCache::default()),
    };
    let client = CrossrefClient::builder()
        .settings(settings)
        .cache_backend(backend)
        .notifier(Arc::new(ConsoleNotifier::default()))
        .build()?;

    match opts.command.as_str() {
        "works" => {
            let work = client.works_doi(&opts.doi).await?;
            if opts.raw {
                println!("{}", serde_json::to_string_pretty(&work)?);
            } else {
                print_summary(&work);
            }
            Ok(ExitCode::SUCCESS)
        }
        "exists" => {
            let exists = client.works_doi_exists(&opts.doi).await?;
            println!("{}", if exists { "yes" } else { "no" });
            Ok(if exists { ExitCode::SUCCESS } else { ExitCode::from(1) })
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            Ok(ExitCode::from(2))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("help" | "--help" | "-h") => {
            print_usage();
            return if args.is_empty() { ExitCode::from(2) } else { ExitCode::SUCCESS };
        }
        Some("version" | "--version" | "-V") => {
            println!("crossref-cli {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let opts = match parse_args(&args) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!();
            print_usage();
            return ExitCode::from(2);
        }
    };

    match run(opts).await {
        Ok(code) => code,
        Err(e) => {
            // The notifier already printed a user-facing message for most failures.
            tracing::debug!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::from(3)
        }
    }
}
