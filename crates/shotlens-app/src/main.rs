// shotlens entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr; stdout carries the report)
// 2. Parse flags, load config, overlay flags
// 3. Open the CSV data directory
// 4. List candidate matches, or analyze the selected match and print it

use shotlens_app::{app, cli, config, report};
use shotlens_data::CsvDirSource;

use anyhow::Context;
use clap::Parser;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let args = cli::Args::parse();
    let mut config = config::load_config(&args.base_dir).context("failed to load configuration")?;
    args.apply(&mut config).context("invalid command-line override")?;
    info!(
        "Config loaded: {} - {}, team {}",
        config.selection.competition_name, config.selection.competition_stage, config.selection.team
    );

    let source = CsvDirSource::new(&config.data_dir);
    info!("Reading match data from {}", source.root().display());

    if args.list_matches {
        let matches = app::candidate_matches(&source, &config.selection)
            .context("failed to read the match catalogue")?;
        if matches.is_empty() {
            println!("No matches found.");
        }
        for m in &matches {
            println!(
                "{}  {}  {} vs {}  ({})",
                m.match_id,
                m.match_date,
                m.home_team,
                m.away_team,
                m.display_label()
            );
        }
        return Ok(());
    }

    let analysis = app::run(&config, &source).context("analysis failed")?;
    let rendered = report::render(&analysis, &config.report)?;
    println!("{rendered}");

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shotlens=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
