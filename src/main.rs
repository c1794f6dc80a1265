use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use platinum::extract::{run_extraction, ExtractOptions};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "platinum")]
#[command(about = "Extract item, trinket, and character data from Binding of Isaac wiki dumps")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a wiki dump into CSV/JSON tables
    Extract(ExtractArgs),
}

#[derive(Args)]
struct ExtractArgs {
    /// Path to the wiki XML dump (.xml or .xml.bz2)
    #[arg(short, long)]
    input: String,

    /// Output directory for generated files
    #[arg(short, long)]
    output: String,

    /// Newline-separated list of trinket page titles
    #[arg(long)]
    trinkets: Option<String>,

    /// Also write JSON files next to the CSVs
    #[arg(long)]
    json: bool,

    /// Dry run - parse and validate everything, write nothing
    #[arg(long)]
    dry_run: bool,
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    let start = Instant::now();
    let stats = run_extraction(&ExtractOptions {
        input: args.input,
        output_dir: args.output,
        trinkets_path: args.trinkets,
        write_json: args.json,
        dry_run: args.dry_run,
    })?;
    info!(
        duration_secs = start.elapsed().as_secs_f64(),
        "Extraction complete"
    );

    println!();
    println!("=== Summary ===");
    println!("Pages scanned:         {}", stats.pages_scanned);
    println!("Items:                 {}", stats.items);
    println!("Trinkets:              {}", stats.trinkets);
    println!("Characters:            {}", stats.characters);
    println!("Synergy records:       {}", stats.synergies);
    println!("Interaction records:   {}", stats.interactions);
    println!("Malformed lists:       {}", stats.malformed_lists);
    println!("Unresolved references: {}", stats.unresolved_references);

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Extract(args) => run_extract(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
