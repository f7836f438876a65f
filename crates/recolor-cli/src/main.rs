use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use recolor_core::models::{Finish, RecolorParams};

#[derive(Parser)]
#[command(name = "recolor")]
#[command(version, about = "Dominant-color remapping for raster images", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recolor an image toward a target color
    Recolor {
        /// Input PNG file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Target color as a hex RGB literal (e.g. "#FE8F8D")
        #[arg(short, long, value_name = "HEX")]
        color: Option<String>,

        /// Blend strength toward the processed result (0-100)
        #[arg(long, value_name = "N")]
        strength: Option<f32>,

        /// Lightness threshold for white protection (88-99)
        #[arg(long, value_name = "N")]
        white_protect: Option<f32>,

        /// Finish mode: "none", "glossy", or "matte"
        #[arg(long, value_name = "MODE")]
        finish: Option<String>,

        /// Finish intensity (0-100)
        #[arg(long, value_name = "N")]
        finish_strength: Option<f32>,

        /// Midtone chroma boost (0-100)
        #[arg(long, value_name = "N")]
        vibrance: Option<f32>,

        /// S-curve contrast (0-100)
        #[arg(long, value_name = "N")]
        depth: Option<f32>,

        /// Local contrast (0-100)
        #[arg(long, value_name = "N")]
        clarity: Option<f32>,

        /// Warm/cool hue bias (-50..50)
        #[arg(long, value_name = "N", allow_hyphen_values = true)]
        warm: Option<f32>,

        /// Parameter preset file
        #[arg(short, long, value_name = "FILE")]
        preset: Option<PathBuf>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze an image's dominant color statistics
    Analyze {
        /// Input PNG file
        input: PathBuf,

        /// Save statistics as JSON to a file
        #[arg(short, long, value_name = "FILE")]
        save: Option<PathBuf>,
    },

    /// Batch recolor multiple files with shared settings
    Batch {
        /// Input files
        #[arg(value_name = "INPUTS")]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Target color as a hex RGB literal
        #[arg(short, long, value_name = "HEX")]
        color: Option<String>,

        /// Parameter preset file
        #[arg(short, long, value_name = "FILE")]
        preset: Option<PathBuf>,

        /// Number of parallel threads
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,
    },

    /// Manage parameter presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
}

#[derive(Subcommand)]
enum PresetAction {
    /// List available presets
    List {
        /// Directory to list presets from
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Show details of a preset
    Show {
        /// Preset name or file path
        preset: String,
    },

    /// Create a new preset template
    Create {
        /// Output file path
        output: PathBuf,
    },
}

/// Optional per-flag overrides layered on top of config/preset defaults.
struct ParamOverrides {
    color: Option<String>,
    strength: Option<f32>,
    white_protect: Option<f32>,
    finish: Option<String>,
    finish_strength: Option<f32>,
    vibrance: Option<f32>,
    depth: Option<f32>,
    clarity: Option<f32>,
    warm: Option<f32>,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Recolor {
            input,
            out,
            color,
            strength,
            white_protect,
            finish,
            finish_strength,
            vibrance,
            depth,
            clarity,
            warm,
            preset,
            verbose,
        } => cmd_recolor(
            input,
            out,
            preset,
            ParamOverrides {
                color,
                strength,
                white_protect,
                finish,
                finish_strength,
                vibrance,
                depth,
                clarity,
                warm,
            },
            verbose,
        ),

        Commands::Analyze { input, save } => cmd_analyze(input, save),

        Commands::Batch {
            inputs,
            out,
            color,
            preset,
            threads,
        } => cmd_batch(inputs, out, color, preset, threads),

        Commands::Preset { action } => match action {
            PresetAction::List { dir } => cmd_preset_list(dir),
            PresetAction::Show { preset } => cmd_preset_show(preset),
            PresetAction::Create { output } => cmd_preset_create(output),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Resolve the final parameter set: config-file defaults, then an
/// optional preset file, then explicit command-line flags.
fn build_params(
    preset: Option<&Path>,
    overrides: ParamOverrides,
) -> Result<RecolorParams, String> {
    let handle = recolor_core::config::recolor_config_handle();
    let mut params = handle.config.defaults.clone().unwrap_or_default();

    if let Some(path) = preset {
        params = recolor_core::presets::load_preset(path)?;
    }

    if let Some(color) = overrides.color {
        params.target_color = color;
    }
    if let Some(v) = overrides.strength {
        params.strength = v;
    }
    if let Some(v) = overrides.white_protect {
        params.white_protect = v;
    }
    if let Some(mode) = overrides.finish {
        params.finish = parse_finish(&mode)?;
    }
    if let Some(v) = overrides.finish_strength {
        params.finish_strength = v;
    }
    if let Some(v) = overrides.vibrance {
        params.vibrance = v;
    }
    if let Some(v) = overrides.depth {
        params.depth = v;
    }
    if let Some(v) = overrides.clarity {
        params.clarity = v;
    }
    if let Some(v) = overrides.warm {
        params.warm = v;
    }

    params.sanitize();
    Ok(params)
}

fn parse_finish(mode: &str) -> Result<Finish, String> {
    match mode.to_lowercase().as_str() {
        "none" => Ok(Finish::None),
        "glossy" => Ok(Finish::Glossy),
        "matte" => Ok(Finish::Matte),
        other => Err(format!(
            "Unknown finish mode '{}' (expected none, glossy, or matte)",
            other
        )),
    }
}

/// Default output path: `<stem>_recolored.png` next to the input.
fn determine_output_path(input: &Path, out: &Option<PathBuf>) -> Result<PathBuf, String> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| format!("Invalid input file name: {}", input.display()))?;
    let file_name = format!("{}_recolored.png", stem);

    match out {
        Some(path) if path.is_dir() => Ok(path.join(file_name)),
        Some(path) => Ok(path.clone()),
        None => Ok(input.with_file_name(file_name)),
    }
}

fn cmd_recolor(
    input: PathBuf,
    out: Option<PathBuf>,
    preset: Option<PathBuf>,
    overrides: ParamOverrides,
    verbose: bool,
) -> Result<(), String> {
    recolor_core::config::set_verbose(verbose);
    recolor_core::config::log_config_usage();

    let params = build_params(preset.as_deref(), overrides)?;

    println!("Recoloring {} toward {}...", input.display(), params.target_color);

    let image = recolor_core::decoders::decode_png(&input)?;
    println!("  Image: {}x{}", image.width, image.height);

    let processed = recolor_core::process(&image, &params)?;

    let output_path = determine_output_path(&input, &out)?;
    recolor_core::exporters::export_png(&processed, &output_path)?;
    println!("Output: {}", output_path.display());

    Ok(())
}

fn cmd_analyze(input: PathBuf, save: Option<PathBuf>) -> Result<(), String> {
    let image = recolor_core::decoders::decode_png(&input)?;
    let stats = recolor_core::sample_dominant(&image);

    println!("Dominant color statistics for {}:", input.display());
    println!("  Mean lightness: {:.2}", stats.mean_l);
    println!("  Mean chroma:    {:.2}", stats.mean_chroma);
    println!("  Hue:            {:.1} deg", stats.hue.to_degrees());

    if let Some(path) = save {
        let json = serde_json::to_string_pretty(&stats)
            .map_err(|e| format!("Failed to serialize statistics: {}", e))?;
        std::fs::write(&path, json)
            .map_err(|e| format!("Failed to write statistics file: {}", e))?;
        println!("Saved statistics to {}", path.display());
    }

    Ok(())
}

fn cmd_batch(
    inputs: Vec<PathBuf>,
    out: Option<PathBuf>,
    color: Option<String>,
    preset: Option<PathBuf>,
    threads: Option<usize>,
) -> Result<(), String> {
    recolor_core::config::log_config_usage();

    if inputs.is_empty() {
        return Err("No input files specified".to_string());
    }

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("Using {} threads for parallel processing", num_threads);
    }

    let output_dir = out.clone().unwrap_or_else(|| PathBuf::from("."));
    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create output directory: {}", e))?;
    }

    let mut params = if let Some(preset_path) = &preset {
        println!("Loading preset from {}...", preset_path.display());
        recolor_core::presets::load_preset(preset_path)?
    } else {
        let handle = recolor_core::config::recolor_config_handle();
        handle.config.defaults.clone().unwrap_or_default()
    };
    if let Some(color) = color {
        params.target_color = color;
    }
    params.sanitize();

    println!("\nProcessing {} files in parallel...\n", inputs.len());

    let processed_count = AtomicUsize::new(0);
    let total_files = inputs.len();

    let results: Vec<Result<PathBuf, String>> = inputs
        .par_iter()
        .map(|input| {
            let image = recolor_core::decoders::decode_png(input)?;
            let processed = recolor_core::process(&image, &params)?;

            let output_path = determine_output_path(input, &Some(output_dir.clone()))?;
            recolor_core::exporters::export_png(&processed, &output_path)?;

            let count = processed_count.fetch_add(1, Ordering::SeqCst) + 1;
            println!(
                "[{}/{}] Processed: {} -> {}",
                count,
                total_files,
                input.display(),
                output_path.display()
            );

            Ok(output_path)
        })
        .collect();

    let mut success_count = 0;
    let mut errors: Vec<(PathBuf, String)> = Vec::new();
    for (input, result) in inputs.iter().zip(results.iter()) {
        match result {
            Ok(_) => success_count += 1,
            Err(e) => errors.push((input.clone(), e.clone())),
        }
    }

    println!("\n========================================");
    println!("BATCH PROCESSING COMPLETE");
    println!("========================================");
    println!("  Successful: {}", success_count);
    println!("  Failed:     {}", errors.len());
    println!("  Output dir: {}", output_dir.display());

    if !errors.is_empty() {
        println!("\nErrors:");
        for (path, error) in &errors {
            println!("  {}: {}", path.display(), error);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!("{} files failed to process", errors.len()))
    }
}

fn cmd_preset_list(dir: Option<PathBuf>) -> Result<(), String> {
    let dir = match dir {
        Some(dir) => dir,
        None => recolor_core::presets::get_presets_dir()?,
    };

    println!("Listing presets in: {}", dir.display());
    let presets = recolor_core::presets::list_presets(&dir)?;
    if presets.is_empty() {
        println!("No presets found.");
    } else {
        for preset in presets {
            println!("  {}", preset);
        }
    }
    Ok(())
}

fn cmd_preset_show(preset: String) -> Result<(), String> {
    let preset_path = PathBuf::from(&preset);
    let params = if preset_path.exists() {
        recolor_core::presets::load_preset(&preset_path)?
    } else {
        recolor_core::presets::validate_preset_name(&preset)?;
        let dir = recolor_core::presets::get_presets_dir()?;
        recolor_core::presets::load_preset(dir.join(format!("{}.yml", preset)))?
    };

    println!("Preset: {}", preset);
    println!("  Target color:    {}", params.target_color);
    println!("  Strength:        {}", params.strength);
    println!("  White protect:   {}", params.white_protect);
    println!("  Finish:          {:?}", params.finish);
    println!("  Finish strength: {}", params.finish_strength);
    println!("  Vibrance:        {}", params.vibrance);
    println!("  Depth:           {}", params.depth);
    println!("  Clarity:         {}", params.clarity);
    println!("  Warm:            {}", params.warm);
    Ok(())
}

fn cmd_preset_create(output: PathBuf) -> Result<(), String> {
    let params = RecolorParams::default();
    recolor_core::presets::save_preset(&params, &output)?;

    println!("Preset created: {}", output.display());
    println!("You can now edit this file to customize the parameters.");
    Ok(())
}
