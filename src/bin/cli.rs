use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sendcheck::{AssetFilter, AuditOrchestrator, AuditReport, ChromeOptions, ChromeProber, GitNpmBuilder, HttpFetcher, PrebuiltBuild, ReferenceBuilder, SettlePolicy, Target};

#[derive(Parser)]
#[command(name = "sendcheck")]
#[command(about = "Check that send.firefox.com serves exactly the code published on GitHub")]
#[command(version)]
struct Cli {
    /// Working directory for the upstream checkout (defaults to the user cache dir)
    #[arg(short, long)]
    workdir: Option<PathBuf>,

    /// Use an existing build output directory instead of cloning and building
    #[arg(long)]
    build_dir: Option<PathBuf>,

    /// Output format: table, json, yaml
    #[arg(short, long, default_value = "table")]
    output: OutputFormat,

    /// Path to a Chrome/Chromium executable
    #[arg(long)]
    chrome: Option<PathBuf>,

    /// Launch the browser without its sandbox (needed in some containers)
    #[arg(long)]
    no_sandbox: bool,

    /// Network silence required before the live page counts as settled (ms)
    #[arg(long, default_value = "1500")]
    quiet_window_ms: u64,

    /// Upper bound on the settle phase after page load (ms)
    #[arg(long, default_value = "15000")]
    max_settle_ms: u64,

    /// Timeout for each HTTP request (seconds)
    #[arg(long, default_value = "30")]
    http_timeout_secs: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Yaml,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("sendcheck=debug,info")
    } else {
        EnvFilter::new("sendcheck=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            print_error(e);
            ExitCode::FAILURE
        }
    }
}

fn print_error(err: Box<dyn std::error::Error>) {
    eprintln!("\x1b[31m✗ Error:\x1b[0m {}", err);
}

async fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let target = Target::send();
    let http_timeout = Duration::from_secs(cli.http_timeout_secs);
    let fetcher = HttpFetcher::new(http_timeout)?;

    let builder: Box<dyn ReferenceBuilder> = match cli.build_dir {
        Some(dir) => Box::new(
            PrebuiltBuild::new(dir, AssetFilter::scripts())
                .with_version_check(target.clone(), fetcher.client().clone()),
        ),
        None => {
            let workdir = match cli.workdir {
                Some(dir) => dir,
                None => dirs::cache_dir()
                    .ok_or("Could not determine a cache directory; pass --workdir")?
                    .join("sendcheck"),
            };
            info!("Using working directory {}", workdir.display());
            Box::new(GitNpmBuilder::new(target.clone(), workdir, fetcher.client().clone()))
        }
    };

    let settle = SettlePolicy::default()
        .with_quiet_window(Duration::from_millis(cli.quiet_window_ms))
        .with_max_settle(Duration::from_millis(cli.max_settle_ms));

    let chrome = ChromeOptions {
        executable: cli.chrome,
        no_sandbox: cli.no_sandbox,
        request_timeout: http_timeout,
    };

    let orchestrator = AuditOrchestrator::new(
        target,
        builder,
        Box::new(fetcher),
        Box::new(ChromeProber::new(chrome, settle)),
    );

    let report = orchestrator.run().await;
    print_report(&report, cli.output)?;

    Ok(report.is_ok())
}

fn print_report(report: &AuditReport, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Table => {
            let text = report.render_text();
            if report.is_ok() {
                print!("{}", text);
            } else {
                eprint!("{}", text);
            }
        }
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Yaml => print!("{}", report.to_yaml()?),
    }
    Ok(())
}
