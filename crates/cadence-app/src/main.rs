use std::path::PathBuf;

use cadence_app::query::{self, Bounds, Query};
use cadence_core::config::load_config;
use cadence_rfc::rfc::recur::{
    ExpansionOptions, OccurrenceEngine, RuleCompiler, RuleFields, ScheduleView,
};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Expand a recurrence rule stored in a JSON record")]
struct Cli {
    /// JSON object keyed by storage attribute names
    #[arg(short, long)]
    record: PathBuf,

    /// Window start, or reference instant for `next`/`current` (RFC 3339)
    #[arg(long)]
    from: Option<String>,

    /// Window end (RFC 3339)
    #[arg(long)]
    to: Option<String>,

    #[arg(short, long, value_enum, default_value_t = Query::All)]
    query: Query,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();

    let config = load_config()?;

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping warn");
    }

    let record = query::load_record(&cli.record)?;
    let fields = RuleFields::from_record(&record, &config.fields)?;
    let spec = RuleCompiler::from_config(&config.recurrence)?.compile(&fields)?;

    let engine = OccurrenceEngine::new(ExpansionOptions::from_config(&config.recurrence));
    let view = ScheduleView::with_engine(&spec, engine);

    let bounds = Bounds {
        from: cli.from.as_deref().map(query::parse_instant).transpose()?,
        to: cli.to.as_deref().map(query::parse_instant).transpose()?,
    };

    tracing::info!(rule = %spec, query = ?cli.query, "Running query");

    let occurrences = query::run(&view, cli.query, bounds)?;
    println!("{}", query::render(&occurrences));

    Ok(())
}
