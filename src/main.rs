use anyhow::{Context, Result};
use camtrail::config::CamtrailConfig;
use camtrail::demo;
use camtrail::model::Snapshot;
use camtrail::reconstruct::{Reconstructor, Trajectory};
use camtrail::report::{self, RenderOptions};
use camtrail::store::{self, DetectionStore};
use chrono::Duration;
use clap::{Args, ColorChoice, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::io::{IsTerminal, stdout};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "camtrail",
    about = "Reconstruct tracked-object trajectories from CCTV detections",
    arg_required_else_help = true
)]
struct Cli {
    /// Disable color
    #[arg(long = "no-color", global = true)]
    no_color: bool,

    /// Config file (defaults to $CAMTRAIL_CONFIG or the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Time-ordered list of every detection
    Timeline(TimelineArgs),
    /// Believed movement path as camera locations
    Path(PathArgs),
    /// Per-camera detection counts and dispute flags
    Cameras(CamerasArgs),
    /// Report data-quality anomalies in the snapshot
    Audit(AuditArgs),
    /// Print the JSON Schema of the snapshot format
    Schema,
}

#[derive(Args, Clone)]
struct InputArgs {
    /// Snapshot JSON file, `-` or omitted for stdin
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Use the bundled sample data instead of INPUT
    #[arg(long, conflicts_with = "input")]
    demo: bool,
}

#[derive(Args, Clone)]
struct TimelineArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Only detections attributed to this tracked object
    #[arg(long, value_name = "ID")]
    object: Option<String>,

    /// Output JSON (stable schema)
    #[arg(long)]
    json: bool,

    /// Plain tab-separated text without colors/headers
    #[arg(long, conflicts_with = "json")]
    raw: bool,

    /// Comma-separated keys to include with --json: timeline,path,cameras,meta
    #[arg(long, value_name = "list", requires = "json")]
    fields: Option<String>,
}

#[derive(Args, Clone)]
struct PathArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Only detections attributed to this tracked object
    #[arg(long, value_name = "ID")]
    object: Option<String>,

    /// Output JSON
    #[arg(long)]
    json: bool,

    /// Plain tab-separated text without colors/headers
    #[arg(long, conflicts_with = "json")]
    raw: bool,

    /// Continuity threshold in seconds (overrides config)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(i64).range(0..))]
    threshold: Option<i64>,
}

#[derive(Args, Clone)]
struct CamerasArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output JSON
    #[arg(long)]
    json: bool,

    /// Plain tab-separated text without colors/headers
    #[arg(long, conflicts_with = "json")]
    raw: bool,
}

#[derive(Args, Clone)]
struct AuditArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CAMTRAIL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<CamtrailConfig> {
    let config = match path {
        Some(p) => CamtrailConfig::load_from(p)?,
        None => CamtrailConfig::load()?,
    };
    Ok(config)
}

fn with_config<F>(path: Option<&PathBuf>, run: F) -> Result<(), i32>
where
    F: FnOnce(&CamtrailConfig) -> Result<(), i32>,
{
    let config = load_config(path).map_err(fail)?;
    run(&config)
}

fn load_store(input: &InputArgs, config: &CamtrailConfig) -> Result<DetectionStore> {
    let store = if input.demo {
        DetectionStore::from(demo::snapshot())
    } else {
        match input.input.as_deref() {
            Some(path) if path.as_os_str() != "-" => DetectionStore::load(path)?,
            _ => DetectionStore::from_reader(std::io::stdin().lock())
                .context("reading snapshot from stdin")?,
        }
    };

    if config.validation.audit_on_load {
        for anomaly in store::audit(&store) {
            warn!(detection = anomaly.detection_id(), "{}", anomaly.describe());
        }
    }
    Ok(store)
}

fn check_object(store: &DetectionStore, object: Option<&str>) -> Result<()> {
    if let Some(id) = object
        && !store.objects().is_empty()
        && store.object(id).is_none()
    {
        anyhow::bail!("unknown object: {}", id);
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<(), i32> {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            Ok(())
        }
        Err(_) => Err(3),
    }
}

fn fail(err: anyhow::Error) -> i32 {
    eprintln!("Error: {:#}", err);
    1
}

fn render_options(color: ColorChoice, config: &CamtrailConfig, raw: bool) -> RenderOptions {
    RenderOptions {
        color: config.output.color
            && stdout().is_terminal()
            && !matches!(color, ColorChoice::Never),
        raw,
        show_disputed: config.output.show_disputed,
    }
}

fn reconstruct<'a>(
    store: &'a DetectionStore,
    object: Option<&'a str>,
    threshold: Duration,
) -> Trajectory<'a> {
    Reconstructor::new()
        .with_threshold(threshold)
        .reconstruct(store, object)
}

fn run_timeline(
    args: TimelineArgs,
    config: &CamtrailConfig,
    color: ColorChoice,
) -> Result<(), i32> {
    let store = load_store(&args.input, config).map_err(fail)?;
    check_object(&store, args.object.as_deref()).map_err(fail)?;
    let trajectory = reconstruct(
        &store,
        args.object.as_deref(),
        config.reconstruction.continuity_threshold(),
    );

    if args.json {
        let mut v = report::trajectory_json(&trajectory).map_err(|_| 3)?;
        if let Some(f) = args.fields.as_deref() {
            v = match report::filter_json_fields(v, f) {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("{}", e);
                    return Err(2);
                }
            };
        }
        return print_json(&v);
    }

    let opts = render_options(color, config, args.raw);
    println!("{}", report::render_timeline(&trajectory.timeline, opts));
    Ok(())
}

fn run_path(args: PathArgs, config: &CamtrailConfig, color: ColorChoice) -> Result<(), i32> {
    let store = load_store(&args.input, config).map_err(fail)?;
    check_object(&store, args.object.as_deref()).map_err(fail)?;
    let threshold = args
        .threshold
        .map(|secs| Duration::try_seconds(secs).unwrap_or(Duration::MAX))
        .unwrap_or_else(|| config.reconstruction.continuity_threshold());
    let trajectory = reconstruct(&store, args.object.as_deref(), threshold);

    if args.json {
        let v = serde_json::to_value(&trajectory.path).map_err(|_| 3)?;
        return print_json(&v);
    }

    let opts = render_options(color, config, args.raw);
    println!("{}", report::render_path(&trajectory.path, opts));
    Ok(())
}

fn run_cameras(args: CamerasArgs, config: &CamtrailConfig, color: ColorChoice) -> Result<(), i32> {
    let store = load_store(&args.input, config).map_err(fail)?;
    let summaries = camtrail::reconstruct::summarize_cameras(store.list_cameras());

    if args.json {
        let v = serde_json::to_value(&summaries).map_err(|_| 3)?;
        return print_json(&v);
    }

    let opts = render_options(color, config, args.raw);
    println!("{}", report::render_cameras(&summaries, opts));
    Ok(())
}

fn run_audit(args: AuditArgs, config: &CamtrailConfig, color: ColorChoice) -> Result<(), i32> {
    // Reporting is the point here, so skip the warn-on-load pass.
    let quiet = CamtrailConfig {
        validation: camtrail::config::ValidationConfig {
            audit_on_load: false,
        },
        ..config.clone()
    };
    let store = load_store(&args.input, &quiet).map_err(fail)?;
    let anomalies = store::audit(&store);

    if args.json {
        let v = serde_json::to_value(&anomalies).map_err(|_| 3)?;
        print_json(&v)?;
    } else {
        let opts = render_options(color, config, false);
        println!("{}", report::render_anomalies(&anomalies, opts.color));
    }

    if anomalies.is_empty() { Ok(()) } else { Err(1) }
}

fn run_schema() -> Result<(), i32> {
    let schema = schemars::schema_for!(Snapshot);
    let v = serde_json::to_value(&schema).map_err(|_| 3)?;
    print_json(&v)
}

fn detect_color_choice() -> ColorChoice {
    // Scan args before clap so help/errors honor `--no-color`.
    // Mirror clap's parsing by stopping at `--` which terminates flags.
    let mut args = std::env::args_os();
    args.next();
    let mut flag = false;
    for arg in args {
        if arg == "--" {
            break;
        }
        if arg == "--no-color" {
            flag = true;
            break;
        }
    }
    if flag || std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

fn main() {
    init_tracing();

    let color = detect_color_choice();
    let matches = Cli::command().color(color).get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let Some(command) = cli.command else {
        return;
    };

    let config_path = cli.config.as_ref();
    let result = match command {
        Commands::Timeline(args) => {
            with_config(config_path, |config| run_timeline(args, config, color))
        }
        Commands::Path(args) => with_config(config_path, |config| run_path(args, config, color)),
        Commands::Cameras(args) => {
            with_config(config_path, |config| run_cameras(args, config, color))
        }
        Commands::Audit(args) => with_config(config_path, |config| run_audit(args, config, color)),
        Commands::Schema => run_schema(),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
