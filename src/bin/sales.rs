use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use sales_explorer::{Session, YearRange, loader, report, storage};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sales",
    version,
    about = "Filter & summarize sales transaction data"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the values available for filtering (regions, categories, years).
    Domains(SourceArgs),
    /// Filter the data and print KPIs, rankings, time series and pivot.
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// CSV file with columns produit, categorie, region, quantité, prix_total, date
    #[arg(long, default_value = "ventes_data.csv")]
    data: PathBuf,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Regions separated by comma or semicolon (default: all)
    #[arg(short, long)]
    regions: Option<String>,
    /// Categories separated by comma or semicolon (default: all)
    #[arg(short, long)]
    categories: Option<String>,
    /// Year (YYYY) or range (YYYY:YYYY) (default: full observed range)
    #[arg(short = 'y', long)]
    years: Option<String>,
    /// Length of the top products ranking.
    #[arg(long, default_value_t = 5)]
    top: usize,
    /// Locale for number formatting (en, de, fr, ...).
    #[arg(long, default_value = "en")]
    locale: String,
    /// Print the aggregate bundle as JSON instead of the text report.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Save the filtered records as CSV.
    #[arg(long)]
    export_csv: Option<PathBuf>,
    /// Save the aggregate bundle as JSON.
    #[arg(long)]
    export_json: Option<PathBuf>,
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_years(s: &str) -> Option<YearRange> {
    if let Some((a, b)) = s.split_once(':') {
        let start = a.trim().parse::<i32>().ok()?;
        let end = b.trim().parse::<i32>().ok()?;
        Some(YearRange::new(start, end))
    } else {
        s.trim().parse::<i32>().ok().map(YearRange::single)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Domains(args) => cmd_domains(args),
        Command::Summary(args) => cmd_summary(args),
    }
}

fn open_session(source: &SourceArgs) -> Result<Session> {
    let (dataset, load_report) = loader::load_csv(&source.data)
        .with_context(|| format!("failed to load {}", source.data.display()))?;
    info!(
        "{}: kept {} rows ({} without price), dropped {} (missing date {}, bad date {}, malformed {})",
        source.data.display(),
        load_report.kept_rows,
        load_report.missing_price,
        load_report.dropped(),
        load_report.dropped_missing_date,
        load_report.dropped_bad_date,
        load_report.dropped_malformed
    );
    Ok(Session::new(dataset))
}

fn cmd_domains(args: SourceArgs) -> Result<()> {
    let session = open_session(&args)?;
    print!("{}", report::render_domains(&session.domains()));
    Ok(())
}

fn cmd_summary(args: SummaryArgs) -> Result<()> {
    let mut session = open_session(&args.source)?.with_top_n(args.top);
    if let Some(s) = &args.regions {
        session.select_regions(parse_list(s));
    }
    if let Some(s) = &args.categories {
        session.select_categories(parse_list(s));
    }
    if let Some(s) = &args.years {
        let years = parse_years(s)
            .ok_or_else(|| anyhow::anyhow!("invalid --years, expected YYYY or YYYY:YYYY"))?;
        session.select_years(years);
    }

    let result = session.aggregate();
    info!(
        "selection matched {} of {} records",
        result.record_count,
        session.dataset().len()
    );

    if let Some(path) = args.export_csv.as_ref() {
        let rows = session.filtered();
        storage::save_csv(&rows, path)?;
        eprintln!("Saved {} rows to {}", rows.len(), path.display());
    }
    if let Some(path) = args.export_json.as_ref() {
        storage::save_json(&result, path)?;
        eprintln!("Wrote aggregates to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", report::render(&result, &args.locale));
    }
    Ok(())
}
