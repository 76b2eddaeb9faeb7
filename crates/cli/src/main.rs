#![deny(unsafe_code)]
//! CLI for the live-background point field.
//!
//! Subcommands:
//! - `render [preset]`: advance a field N ticks, write a PNG frame
//! - `trace [preset]`: advance a field N ticks, print one frame's draw calls as JSON
//! - `list`: print preset names
//! - `schema [preset]`: print the parameter schema

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use live_background_core::{Engine, PointField, Preset, Recorder, Seed, Srgb};
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_PRESET: &str = "orbital";

#[derive(Parser)]
#[command(name = "live-background", about = "Animated point-field background, offline")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Field construction shared by `render` and `trace`.
#[derive(Args)]
struct FieldArgs {
    /// Preset name (orbital, constellation, drift).
    preset: Option<String>,

    /// Surface width in pixels.
    #[arg(short = 'W', long, default_value_t = 800)]
    width: usize,

    /// Surface height in pixels.
    #[arg(short = 'H', long, default_value_t = 600)]
    height: usize,

    /// Update ticks to run before drawing.
    #[arg(short, long, default_value_t = 300)]
    ticks: usize,

    /// PRNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Parameter overrides as a JSON object.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Read the whole run description from a seed file instead.
    #[arg(long, conflicts_with_all = ["preset", "params", "width", "height", "ticks", "seed"])]
    from: Option<PathBuf>,
}

impl FieldArgs {
    fn to_seed(&self) -> Result<Seed, CliError> {
        if let Some(path) = &self.from {
            let text = std::fs::read_to_string(path)?;
            return serde_json::from_str(&text)
                .map_err(|e| CliError::Input(format!("invalid seed file {}: {e}", path.display())));
        }
        let params: serde_json::Value = serde_json::from_str(&self.params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
        if !params.is_object() {
            return Err(CliError::Input("--params must be a JSON object".into()));
        }
        let preset = self.preset.as_deref().unwrap_or(DEFAULT_PRESET);
        let mut seed = Seed::new(preset, self.width, self.height, self.seed);
        seed.params = params;
        seed.ticks = self.ticks;
        Ok(seed)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run a field for N ticks and write a PNG frame.
    Render {
        #[command(flatten)]
        field: FieldArgs,

        /// Background color as hex; transparent when omitted.
        #[arg(long)]
        background: Option<String>,

        /// Output file path.
        #[arg(short, long, default_value = "background.png")]
        output: PathBuf,
    },
    /// Run a field for N ticks and print one frame's draw calls.
    Trace {
        #[command(flatten)]
        field: FieldArgs,
    },
    /// List available presets.
    List,
    /// Print the parameter schema of a preset.
    Schema {
        #[arg(default_value = DEFAULT_PRESET)]
        preset: String,
    },
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let presets = Preset::list_names();
            if cli.json {
                let info = serde_json::json!({ "presets": presets });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Presets:");
                for name in presets {
                    println!("  {name}");
                }
            }
        }
        Command::Schema { preset } => {
            let config = Preset::from_name(&preset)?.config();
            println!("{}", serde_json::to_string_pretty(&config.schema())?);
        }
        Command::Render {
            field,
            background,
            output,
        } => {
            let seed = field.to_seed()?;
            let background = background
                .as_deref()
                .map(Srgb::from_hex)
                .transpose()
                .map_err(|e| CliError::Input(e.to_string()))?;

            let (field, raster) = live_background_snapshot::render_seed(&seed, background)?;
            live_background_snapshot::png::write_png(&raster, &output)?;
            info!(output = %output.display(), points = field.points().len(), "wrote snapshot");

            if cli.json {
                let info = serde_json::json!({
                    "seed": seed,
                    "points": field.points().len(),
                    "edges": field.connections().edge_count(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({}x{}, {} ticks, seed {}) -> {}",
                    seed.preset,
                    seed.width,
                    seed.height,
                    seed.ticks,
                    seed.seed,
                    output.display()
                );
            }
        }
        Command::Trace { field } => {
            let seed = field.to_seed()?;
            let field: PointField = seed.build()?;
            let mut recorder = Recorder::new(seed.width as f64, seed.height as f64);
            field.render(&mut recorder);
            let trace = serde_json::json!({
                "seed": seed,
                "params": field.params(),
                "commands": recorder.commands(),
            });
            println!("{}", serde_json::to_string_pretty(&trace)?);
        }
    }

    Ok(())
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,live_background=info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
