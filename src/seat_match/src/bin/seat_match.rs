use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use seat_match::{
    LoadPolicy, LocalMatcher, MatchRequest, MatchResponse, RawQuery, ResultOrder,
    SeatMatcher, SeatOfferView,
    catalog::{
        config::{RawScalar, load_catalog_path},
        snapshot,
    },
    settings::{LogFormat, LoggingConfig, Settings},
};

#[derive(Parser)]
#[command(version, about = "Seat eligibility matcher")]
struct Cli {
    /// Settings file (defaults to ./seat-match.toml when present).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Inspect catalog files.
    Catalog(CatalogCmd),
    /// Find the offers an applicant is eligible for.
    Match(MatchArgs),
}

#[derive(Args)]
struct CatalogCmd {
    #[command(subcommand)]
    sub: CatalogSub,
}

#[derive(Subcommand)]
enum CatalogSub {
    /// Load a catalog and print the normalization report.
    Check {
        /// Catalog file (TOML, or JSON by extension); defaults to the configured `catalog_path`.
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
        /// Skip bad records instead of failing.
        #[arg(long)]
        lenient: bool,
    },
}

#[derive(Args)]
struct MatchArgs {
    /// Catalog file (TOML, or JSON by extension); defaults to the configured `catalog_path`.
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,
    /// Full request as JSON, e.g. '{"rank": 1300, "category": "OC", "gender": "Female"}'.
    #[arg(long, value_name = "JSON", conflicts_with_all = ["rank", "category", "gender", "phase", "year"])]
    request: Option<String>,
    /// Applicant rank (positive integer).
    #[arg(long, required_unless_present = "request")]
    rank: Option<String>,
    /// Reservation category, e.g. OC or BC-A.
    #[arg(long)]
    category: Option<String>,
    /// Gender: Male/Female (Boys/Girls accepted).
    #[arg(long)]
    gender: Option<String>,
    /// Counselling phase, e.g. "Phase 1".
    #[arg(long)]
    phase: Option<String>,
    /// Cutoff year.
    #[arg(long)]
    year: Option<String>,
    /// Result order.
    #[arg(long, value_enum)]
    order: Option<OrderArg>,
    /// Print the response body as JSON.
    #[arg(long)]
    json: bool,
    /// Skip bad catalog records instead of failing.
    #[arg(long)]
    lenient: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    /// Catalog order.
    Catalog,
    /// Ascending closing rank.
    ClosingRank,
}

impl From<OrderArg> for ResultOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Catalog => ResultOrder::Catalog,
            OrderArg::ClosingRank => ResultOrder::ClosingRank,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load settings: {e}");
            return ExitCode::from(1);
        }
    };
    init_tracing(&settings.logging);

    match run(cli.cmd, &settings) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    let _ = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}

fn run(cmd: Cmd, settings: &Settings) -> Result<ExitCode> {
    match cmd {
        Cmd::Catalog(CatalogCmd {
            sub: CatalogSub::Check { file, lenient },
        }) => {
            let path = catalog_path(file, settings)?;
            let (_, report) = load_catalog_path(&path, policy(lenient, settings))?;
            println!("{}: {report}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Cmd::Match(args) => run_match(args, settings),
    }
}

fn run_match(args: MatchArgs, settings: &Settings) -> Result<ExitCode> {
    let path = catalog_path(args.file.clone(), settings)?;
    snapshot::global().refresh_from_path(&path, policy(args.lenient, settings))?;

    let matcher = LocalMatcher::global();
    let response = MatchResponse::from(request(&args).and_then(|req| matcher.find(&req)));
    let status = response.status();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        match &response {
            MatchResponse::Matches { matches } if matches.is_empty() => {
                println!("No eligible colleges found for this rank.");
            }
            MatchResponse::Matches { matches } => {
                for view in matches {
                    println!("{}", describe(view));
                }
            }
            MatchResponse::Error { error } => eprintln!("Invalid input: {error}"),
        }
    }
    Ok(ExitCode::from(status.exit_code()))
}

fn request(args: &MatchArgs) -> Result<MatchRequest, seat_match::MatchError> {
    let mut req = match &args.request {
        Some(body) => MatchRequest::from_json(body)?,
        None => MatchRequest::new(RawQuery {
            rank: args.rank.clone().map(RawScalar::Text),
            category: args.category.clone(),
            gender: args.gender.clone(),
            phase: args.phase.clone(),
            year: args.year.clone().map(RawScalar::Text),
        }),
    };
    if let Some(order) = args.order {
        req.order = order.into();
    }
    Ok(req)
}

fn describe(view: &SeatOfferView) -> String {
    let mut line = format!("{} | {}", view.institution, view.branch);
    let seat: Vec<&str> = [view.category.as_deref(), view.gender.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !seat.is_empty() {
        line.push_str(&format!(" | {}", seat.join(" ")));
    }
    line.push_str(&format!(" | ranks {}-{}", view.min_rank, view.closing_rank));
    if let Some(phase) = &view.phase {
        line.push_str(&format!(" | {phase}"));
    }
    if let Some(year) = view.year {
        line.push_str(&format!(" | {year}"));
    }
    line
}

fn catalog_path(flag: Option<PathBuf>, settings: &Settings) -> Result<PathBuf> {
    flag.or_else(|| settings.catalog_path.clone())
        .context("no catalog file: pass --file or set catalog_path / SEAT_MATCH_CATALOG")
}

fn policy(lenient: bool, settings: &Settings) -> LoadPolicy {
    if lenient { LoadPolicy::Lenient } else { settings.policy }
}
