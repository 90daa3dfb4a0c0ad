mod renderer;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracelane_core::model::{Lane, LoadOptions, LoadedTrace, Trace};
use tracelane_core::svg::render_svg;
use tracelane_core::view::TraceView;
use tracelane_core::{Progress, ViewConfig};

#[derive(Parser)]
#[command(name = "tracelane", version)]
#[command(about = "Explore a timestamped event log as a multi-lane timeline")]
struct Cli {
    /// Trace file with one `TIMESTAMP LANE DETAIL...` event per line
    path: PathBuf,

    /// JSON file overriding view settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Add a lane with every event whose detail text matches REGEX
    #[arg(long, value_name = "REGEX")]
    filter: Option<String>,

    /// Buffer files up to this many bytes in memory; larger files are read on demand
    #[arg(long, value_name = "BYTES")]
    in_memory_limit: Option<u64>,

    /// Write one zoomed-out frame as SVG instead of starting the UI
    #[arg(long, value_name = "OUT")]
    svg: Option<PathBuf>,

    /// SVG width in pixels
    #[arg(long, default_value_t = 1200.0)]
    width: f64,

    /// SVG height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Print every event between BEGIN and END (seconds), lane by lane
    #[arg(long, num_args = 2, value_names = ["BEGIN", "END"], allow_negative_numbers = true)]
    list: Option<Vec<f64>>,

    /// Write logs to PATH (the interactive UI otherwise discards them)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn interactive(&self) -> bool {
        self.svg.is_none() && self.list.is_none()
    }

    fn load_options(&self) -> LoadOptions {
        let mut options = LoadOptions::default();
        if let Some(limit) = self.in_memory_limit {
            options.in_memory_limit = limit;
        }
        options
    }
}

/// Reports load progress to the log in 10% steps.
struct LogProgress {
    stage: &'static str,
    min: u64,
    max: u64,
    last_step: Option<u64>,
}

impl LogProgress {
    fn new(stage: &'static str) -> Self {
        Self {
            stage,
            min: 0,
            max: 0,
            last_step: None,
        }
    }
}

impl Progress for LogProgress {
    fn reset(&mut self) {
        self.last_step = None;
    }

    fn set_range(&mut self, min: u64, max: u64) {
        self.min = min;
        self.max = max;
    }

    fn set_value(&mut self, value: u64) {
        let span = self.max.saturating_sub(self.min).max(1);
        let step = value.saturating_sub(self.min).saturating_mul(10) / span;
        if self.last_step != Some(step) {
            self.last_step = Some(step);
            log::debug!("{}: {}%", self.stage, step * 10);
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    builder.format_timestamp(None);

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    } else if cli.interactive() {
        // stderr would draw over the alternate screen.
        builder.filter_level(log::LevelFilter::Off);
    }
    builder.init();
    Ok(())
}

fn load(path: &Path, options: &LoadOptions, filter: Option<&str>) -> Result<LoadedTrace> {
    let mut progress = LogProgress::new("loading");
    let mut loaded = LoadedTrace::load(path, options, Some(&mut progress))
        .with_context(|| format!("failed to load {}", path.display()))?;
    if let Some(pattern) = filter {
        let mut progress = LogProgress::new("filtering");
        loaded.add_filter_lane(pattern, Some(&mut progress));
    }
    log::info!(
        "loaded {} events into {} lanes from {}",
        loaded.file().num_events(),
        loaded.lanes().len(),
        path.display()
    );
    Ok(loaded)
}

/// Print the events of every lane within `[begin, end]`.
fn list_range(lanes: &[Lane], begin: f64, end: f64) -> Result<()> {
    let mut out = std::io::stdout().lock();
    for lane in lanes {
        let Some(range) = lane.trace.events_in_range(begin, end) else {
            continue;
        };
        writeln!(out, "{} ({}): {} events", lane.name, lane.key, range.len())?;
        for idx in range {
            let text = lane.trace.event_text(idx, true).unwrap_or_default();
            writeln!(out, "  {text}")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = match &cli.config {
        Some(path) => ViewConfig::from_json_file(path)?,
        None => ViewConfig::default(),
    };
    let options = cli.load_options();
    let loaded = load(&cli.path, &options, cli.filter.as_deref())?;

    if let Some(bounds) = &cli.list {
        return list_range(loaded.lanes(), bounds[0], bounds[1]);
    }

    let mut view = TraceView::new(config);
    view.set_lanes(loaded.into_lanes());
    view.zoom_all();

    if let Some(out) = &cli.svg {
        view.resize(cli.width, cli.height);
        let svg = render_svg(&view.render(), cli.width, cli.height);
        std::fs::write(out, svg).with_context(|| format!("failed to write {}", out.display()))?;
        return Ok(());
    }

    let title = cli.path.display().to_string();
    renderer::run(&mut view, &title, || {
        Ok(load(&cli.path, &options, cli.filter.as_deref())?.into_lanes())
    })
}
