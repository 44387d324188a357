use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use depthchart::{
    chart::Unit,
    config::Config,
    fetch::{HttpSource, SavedPageSource},
    process::{self, CombineSource},
    report::ScrapeReport,
    scrape::scrape,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "depthchart",
    author,
    version,
    about = "Scrape NFL depth charts and build unit, combined and master tables"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// YAML file overriding the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    team_csv_dir: Option<PathBuf>,
    #[arg(long, global = true)]
    combined_dir: Option<PathBuf>,
    #[arg(long, global = true)]
    html_dir: Option<PathBuf>,
    /// Only these team abbreviations, e.g. `ari,atl,bal`
    #[arg(long, global = true, value_delimiter = ',')]
    teams: Vec<String>,
    /// Log what would be written without writing it
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    /// Read saved pages from this directory instead of the network
    #[arg(long)]
    from_dir: Option<PathBuf>,
    /// Also save each table's HTML under the html dir
    #[arg(long)]
    save_html: bool,
    #[arg(long)]
    concurrency: Option<usize>,
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and parse every team page into team_CSV/
    Scrape(ScrapeArgs),
    /// Build the per-unit tables from the team files
    Process {
        /// offense, defense, special or all
        #[arg(long, default_value = "all", value_parser = parse_units)]
        unit: UnitChoice,
    },
    /// Concatenate the unit tables into the combined table
    Combine {
        /// Read the per-team files instead of the unit tables
        #[arg(long)]
        from_teams: bool,
    },
    /// Deduplicate into the master table
    Master {
        /// Combined CSVs to read, later files winning; defaults to the combined table
        inputs: Vec<PathBuf>,
    },
    /// Write one player-profile file per team
    Profiles,
    /// Delete generated html, xml and csv files
    Clean,
    /// Scrape, process, combine, master and profiles in order
    Run(ScrapeArgs),
}

#[derive(Debug, Clone)]
struct UnitChoice(Vec<Unit>);

fn parse_units(s: &str) -> Result<UnitChoice, String> {
    if s.trim().eq_ignore_ascii_case("all") {
        return Ok(UnitChoice(Unit::ALL.to_vec()));
    }
    s.parse::<Unit>().map(|u| UnitChoice(vec![u]))
}

/// Defaults, then the YAML file, then flags.
fn build_config(global: &GlobalArgs, scrape_args: Option<&ScrapeArgs>) -> Result<Config> {
    let mut config = match &global.config {
        Some(path) => Config::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(dir) = &global.team_csv_dir {
        config.team_csv_dir = dir.clone();
    }
    if let Some(dir) = &global.combined_dir {
        config.combined_dir = dir.clone();
    }
    if let Some(dir) = &global.html_dir {
        config.html_dir = dir.clone();
    }
    config.dry_run |= global.dry_run;
    config.restrict_teams(&global.teams)?;

    if let Some(args) = scrape_args {
        config.save_html |= args.save_html;
        if let Some(n) = args.concurrency {
            config.concurrency = n;
        }
        if let Some(secs) = args.timeout_secs {
            config.timeout_secs = secs;
        }
    }
    config.validate()?;
    Ok(config)
}

async fn run_scrape(config: &Config, args: &ScrapeArgs) -> Result<ScrapeReport> {
    let report = match &args.from_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "reading saved pages");
            scrape(&SavedPageSource::new(dir), config).await?
        }
        None => {
            let source = HttpSource::new(&config.base_url, &config.user_agent, config.timeout())?;
            scrape(&source, config).await?
        }
    };

    for skipped in &report.skipped {
        warn!(team = %skipped.team, reason = %skipped.reason, "not scraped");
    }
    if report.is_total_failure() {
        bail!("all {} teams failed to scrape", report.attempted());
    }
    Ok(report)
}

fn run_units(config: &Config, units: &[Unit]) -> Result<()> {
    for unit in units {
        process::process_unit(config, *unit).with_context(|| format!("processing {} unit", unit))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    let cli = Cli::parse();
    let scrape_args = match &cli.command {
        Command::Scrape(args) | Command::Run(args) => Some(args),
        _ => None,
    };
    let config = build_config(&cli.global, scrape_args)?;
    info!(teams = config.teams.len(), dry_run = config.dry_run, "startup");

    match &cli.command {
        Command::Scrape(args) => {
            run_scrape(&config, args).await?;
        }
        Command::Process { unit } => run_units(&config, &unit.0)?,
        Command::Combine { from_teams } => {
            let source = if *from_teams {
                CombineSource::Teams
            } else {
                CombineSource::Units
            };
            process::combine(&config, source).context("combining depth charts")?;
        }
        Command::Master { inputs } => {
            process::master_combine(&config, inputs).context("building master table")?;
        }
        Command::Profiles => {
            process::build_team_profiles(&config).context("building player profiles")?;
        }
        Command::Clean => {
            process::clean(&[&config.team_csv_dir, &config.html_dir], config.dry_run)
                .context("cleaning generated files")?;
        }
        Command::Run(args) => {
            run_scrape(&config, args).await?;
            if config.dry_run {
                // later stages read the team files a dry scrape never wrote
                info!("dry run: stopping after scrape");
                return Ok(());
            }
            run_units(&config, &Unit::ALL)?;
            process::combine(&config, CombineSource::Units).context("combining depth charts")?;
            let master = process::master_combine(&config, &[]).context("building master table")?;
            process::build_team_profiles(&config).context("building player profiles")?;
            info!(master = %master.display(), "pipeline finished");
        }
    }
    Ok(())
}
