use std::path::PathBuf;

use budget_shogi::{visualize_match, Catalog, Phase, Session};
use clap::Parser;
use referee::{read_script, run_script, Recorder};
use tracing::{info, warn};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Path to a JSON piece roster. The built-in roster is used if it is
    /// missing or invalid
    #[arg(short, long)]
    roster: Option<PathBuf>,

    /// Path to a file with one JSON action per line, or "-" for stdin
    #[arg(short, long, default_value = "-")]
    script: PathBuf,

    /// Record the accepted actions and their events as JSON into this file
    #[arg(long)]
    record_to: Option<PathBuf>,

    /// Print the final state as JSON after the board
    #[arg(long, default_value_t = false)]
    snapshot: bool,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn load_catalog(path: Option<&PathBuf>) -> Catalog {
    let text = path.and_then(|path| match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(err) => {
            warn!(path = %path.display(), %err, "Could not read the piece roster");
            None
        }
    });
    Catalog::from_json_or_default(text.as_deref())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let catalog = load_catalog(args.roster.as_ref());
    info!(
        kinds = catalog.kinds().len(),
        pieces = catalog.total_instances(),
        standard_cost = catalog.standard_cost(),
        "Roster loaded"
    );

    let mut recorder = if let Some(path) = args.record_to {
        Some(Recorder::new(path)?)
    } else {
        None
    };

    let actions = read_script(&args.script)?;
    let mut session = Session::new(catalog);
    let summary = run_script(&mut session, actions, &mut recorder);
    eprintln!(
        "{} actions accepted, {} rejected",
        summary.accepted, summary.rejected
    );

    match session.phase() {
        Phase::Setup { design } => println!("{} is still designing", design.designer()),
        Phase::Playing { position } | Phase::Finished { position, .. } => {
            println!("{}", visualize_match(position))
        }
    }

    if args.snapshot {
        println!("{}", serde_json::to_string_pretty(&session.snapshot()?)?);
    }

    if let Some(recorder) = &mut recorder {
        recorder.write_recording()?;
    }

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
