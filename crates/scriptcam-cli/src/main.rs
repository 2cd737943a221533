//! # Scriptcam CLI
//!
//! Command-line access to the easing library, the path interpolator and the
//! ScriptMapper command codec.
//!
//! ## Commands
//! - `list`, `eval`, `sample`: inspect the easing catalog
//! - `format`, `parse`, `validate`, `extract`, `convert`: bookmark commands
//! - `beats`: tempo arithmetic
//! - `interpolate`, `check`: camera path files
//! - `presets`, `export`, `import`: path and bookmark files

mod config;


use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use scriptcam_core::codec::{dpos_to_q, q_to_dpos};
use scriptcam_core::data::{builtin_presets, clone_preset, find_preset, DriftParams, EaseType, FunctionId};
use scriptcam_core::{
    beats, from_bookmarks, interpolate_camera_path_with, sample_curve, to_bookmarks,
    to_level_json, validate_command, EasingRegistry, InterpolationOptions, RotationMode,
    ScriptMapperCodec,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "scriptcam")]
#[command(about = "Easing curves, camera paths and ScriptMapper bookmark commands")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the easing catalog
    List {
        /// Only functions with a ScriptMapper command
        #[arg(long)]
        compatible: bool,
    },

    /// Evaluate an easing function at one point
    Eval {
        /// Function id (e.g. "cubic", "drift")
        function: String,

        /// Progress value, normally in [0, 1]
        t: f64,

        /// easein, easeout or easeboth
        #[arg(short, long, default_value = "easein")]
        ease: EaseType,

        /// Drift parameters as X,Y
        #[arg(short, long, value_parser = parse_drift_params)]
        params: Option<DriftParams>,
    },

    /// Sample an easing curve over [0, 1]
    Sample {
        function: String,

        #[arg(short, long, default_value = "easein")]
        ease: EaseType,

        #[arg(short, long, value_parser = parse_drift_params)]
        params: Option<DriftParams>,

        /// Number of intervals
        #[arg(short, long, default_value = "20")]
        steps: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Format an easing configuration as a ScriptMapper command
    Format {
        function: String,

        #[arg(short, long, default_value = "easein")]
        ease: EaseType,

        #[arg(short, long, value_parser = parse_drift_params)]
        params: Option<DriftParams>,

        /// Use the short prefixes (I, O, IO)
        #[arg(long)]
        short: bool,
    },

    /// Decode an easing command
    Parse { command: String },

    /// Validate a (possibly compound) bookmark command
    Validate { command: String },

    /// Find the easing part of a compound bookmark command
    Extract { command: String },

    /// Convert position commands between q_ and dpos_
    Convert {
        command: String,

        #[arg(long, value_enum)]
        to: PositionForm,
    },

    /// Beats spanned by a duration at a tempo
    Beats {
        /// Duration in milliseconds
        duration_ms: f64,

        bpm: f64,

        /// Also print the beat of this normalized time
        #[arg(short, long)]
        time: Option<f64>,
    },

    /// Interpolate a camera path file at a normalized time
    Interpolate {
        /// Camera path JSON file
        path: PathBuf,

        time: f64,

        /// Blend rotations the short way around
        #[arg(long)]
        shortest: bool,

        /// Take poses from q_/dpos_ bookmark commands
        #[arg(long)]
        bookmark_poses: bool,
    },

    /// List presets, or write a copy of one
    Presets {
        /// Preset name or id
        name: Option<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a camera path as bookmarks or level JSON
    Export {
        path: PathBuf,

        #[arg(short, long, value_enum, default_value = "bookmarks")]
        format: ExportFormat,

        /// Export settings (.ron file)
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rebuild a camera path from a bookmark list
    Import {
        /// JSON array of { "_time", "_name" } entries
        bookmarks: PathBuf,

        #[arg(short, long, default_value = "Imported")]
        name: String,

        #[arg(short, long)]
        bpm: Option<f64>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report structural problems in a camera path file
    Check { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PositionForm {
    Q,
    Dpos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Bookmarks,
    Level,
}

fn parse_drift_params(value: &str) -> Result<DriftParams, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got `{value}`"))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("invalid X `{x}`"))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("invalid Y `{y}`"))?;
    let params = DriftParams::new(x, y);
    if !params.in_range() {
        return Err(format!(
            "drift parameters must be within [{}, {}]",
            DriftParams::MIN,
            DriftParams::MAX
        ));
    }
    Ok(params)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scriptcam=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let registry = EasingRegistry::builtin();
    let codec = ScriptMapperCodec::new(&registry);

    match cli.command {
        Commands::List { compatible } => cmd_list(&registry, compatible),
        Commands::Eval {
            function,
            t,
            ease,
            params,
        } => {
            let id = FunctionId::from_id(&function);
            println!("{}", registry.calculate(&id, t, ease, params));
            Ok(())
        }
        Commands::Sample {
            function,
            ease,
            params,
            steps,
            json,
        } => cmd_sample(&function, ease, params, steps, json),
        Commands::Format {
            function,
            ease,
            params,
            short,
        } => cmd_format(&codec, &function, ease, params, short),
        Commands::Parse { command } => cmd_parse(&codec, &command),
        Commands::Validate { command } => {
            validate_command(&command).with_context(|| format!("Invalid command `{command}`"))?;
            println!("ok");
            Ok(())
        }
        Commands::Extract { command } => {
            match codec.extract_easing(&command) {
                Some(easing) => println!("{easing}"),
                None => println!("(none)"),
            }
            Ok(())
        }
        Commands::Convert { command, to } => {
            let converted = match to {
                PositionForm::Q => dpos_to_q(&command),
                PositionForm::Dpos => q_to_dpos(&command),
            };
            println!("{converted}");
            Ok(())
        }
        Commands::Beats {
            duration_ms,
            bpm,
            time,
        } => {
            let span = beats::calculate_beat_duration(duration_ms, bpm);
            println!("beats: {span}");
            if let Some(time) = time {
                println!("beat at {time}: {}", beats::normalized_to_beat(time, span));
            }
            Ok(())
        }
        Commands::Interpolate {
            path,
            time,
            shortest,
            bookmark_poses,
        } => {
            let options = InterpolationOptions {
                rotation_mode: if shortest {
                    RotationMode::ShortestPath
                } else {
                    RotationMode::Linear
                },
                use_bookmark_poses: bookmark_poses,
            };
            cmd_interpolate(&registry, &path, time, options)
        }
        Commands::Presets { name, output } => cmd_presets(name.as_deref(), output.as_deref()),
        Commands::Export {
            path,
            format,
            config,
            output,
        } => cmd_export(&codec, &path, format, config.as_deref(), output.as_deref()),
        Commands::Import {
            bookmarks,
            name,
            bpm,
            output,
        } => cmd_import(&codec, &bookmarks, &name, bpm, output.as_deref()),
        Commands::Check { path } => cmd_check(&path),
    }
}

fn cmd_list(registry: &EasingRegistry, compatible: bool) -> Result<()> {
    println!("Easing Functions:");
    println!("=================");
    for info in registry.iter() {
        if compatible && !info.script_mapper_compatible {
            continue;
        }
        let command = info.script_mapper_name.unwrap_or("-");
        println!("  • {:<14} {:<8} {}", info.id.as_str(), command, info.formula);
    }
    Ok(())
}

fn cmd_sample(
    function: &str,
    ease: EaseType,
    params: Option<DriftParams>,
    steps: usize,
    json: bool,
) -> Result<()> {
    let id = FunctionId::from_id(function);
    if !id.is_known() {
        tracing::warn!("Unknown function '{}', sampling as linear", function);
    }
    let samples = sample_curve(&id, ease, params, steps);

    if json {
        println!("{}", serde_json::to_string_pretty(&samples)?);
    } else {
        for (t, value) in samples {
            println!("{t:.4}\t{value:.6}");
        }
    }
    Ok(())
}

fn cmd_format(
    codec: &ScriptMapperCodec<'_>,
    function: &str,
    ease: EaseType,
    params: Option<DriftParams>,
    short: bool,
) -> Result<()> {
    let id = FunctionId::from_id(function);
    let command = if short {
        codec.format_short(&id, ease, params)
    } else {
        codec.format(&id, ease, params)
    };
    match command {
        Some(command) => {
            println!("{command}");
            Ok(())
        }
        None => Err(anyhow::anyhow!(
            "`{}` has no ScriptMapper command. Compatible: {}",
            function,
            codec
                .registry()
                .iter()
                .filter(|f| f.script_mapper_compatible)
                .map(|f| f.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}

fn cmd_parse(codec: &ScriptMapperCodec<'_>, command: &str) -> Result<()> {
    let parsed = codec
        .parse(command)
        .with_context(|| format!("`{command}` is not an easing command"))?;

    println!("function: {}", parsed.function_id);
    println!("ease:     {}", parsed.ease_type);
    if let Some(params) = parsed.params {
        println!("params:   x={} y={}", params.x, params.y);
    }
    Ok(())
}

fn cmd_interpolate(
    registry: &EasingRegistry,
    path: &Path,
    time: f64,
    options: InterpolationOptions,
) -> Result<()> {
    let camera_path = config::read_path(path)?;
    for problem in camera_path.check_invariants() {
        tracing::warn!("{}: {}", path.display(), problem);
    }

    let result = interpolate_camera_path_with(registry, &camera_path, time, options);
    let value = serde_json::json!({
        "segment": result.current_segment_index,
        "segmentId": result.current_segment.map(|s| s.id.as_str()),
        "segmentLocalTime": result.segment_local_time,
        "easedLocalTime": result.eased_local_time,
        "easedOutput": result.eased_output,
        "position": [result.position.x, result.position.y, result.position.z],
        "rotation": result.rotation.map(|r| [r.x, r.y, r.z]),
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn cmd_presets(name: Option<&str>, output: Option<&Path>) -> Result<()> {
    let Some(name) = name else {
        println!("Presets:");
        println!("========");
        for preset in builtin_presets() {
            println!(
                "  • {:<12} {} waypoints, {} ms",
                preset.name,
                preset.waypoints.len(),
                preset.total_duration
            );
        }
        return Ok(());
    };

    let preset = find_preset(name).with_context(|| format!("No preset named `{name}`"))?;
    let copy = clone_preset(&preset);
    config::write_json(&copy, output)
}

fn cmd_export(
    codec: &ScriptMapperCodec<'_>,
    path: &Path,
    format: ExportFormat,
    config_path: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let options = match config_path {
        Some(config_path) => config::load_export_options(config_path)?,
        None => Default::default(),
    };
    let camera_path = config::read_path(path)?;

    match format {
        ExportFormat::Bookmarks => {
            let bookmarks = to_bookmarks(codec, &camera_path, &options)
                .with_context(|| format!("Failed to export {}", path.display()))?;
            config::write_json(&bookmarks, output)
        }
        ExportFormat::Level => {
            let level = to_level_json(codec, &camera_path, &options)
                .with_context(|| format!("Failed to export {}", path.display()))?;
            config::write_json(&level, output)
        }
    }
}

fn cmd_import(
    codec: &ScriptMapperCodec<'_>,
    bookmarks_path: &Path,
    name: &str,
    bpm: Option<f64>,
    output: Option<&Path>,
) -> Result<()> {
    let bookmarks = config::read_bookmarks(bookmarks_path)?;
    let id = format!("import-{}", name.to_lowercase().replace(' ', "-"));
    let camera_path = from_bookmarks(codec, id, name, &bookmarks, bpm)
        .with_context(|| format!("Failed to import {}", bookmarks_path.display()))?;

    tracing::info!(
        "Imported {} waypoints from {} bookmarks",
        camera_path.waypoints.len(),
        bookmarks.len()
    );
    config::write_json(&camera_path, output)
}

fn cmd_check(path: &Path) -> Result<()> {
    let camera_path = config::read_path(path)?;
    let problems = camera_path.check_invariants();
    if problems.is_empty() {
        println!("✓ {} is well formed", path.display());
        return Ok(());
    }

    for problem in &problems {
        println!("✗ {problem}");
    }
    Err(anyhow::anyhow!(
        "{} has {} structural problem(s)",
        path.display(),
        problems.len()
    ))
}
