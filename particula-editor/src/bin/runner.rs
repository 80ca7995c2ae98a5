//! Particula headless runner
//!
//! Extracts, renders and exports particle scenes without a window.
//!
//! Usage: `particula-runner <COMMAND> <image> [options]`

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use glam::Vec2;
use particula::prelude::*;
use particula::StopReason;
use particula_editor::args::{parse_named_mask, parse_pointer};
use particula_editor::{presets, Project};
use serde::Serialize;
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "particula-runner")]
#[command(about = "Turn images into particle scenes, frames and React components", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Inputs shared by every command.
#[derive(Args)]
struct SceneArgs {
    /// Source image (PNG or JPEG)
    image: PathBuf,

    /// Configuration JSON; missing groups use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from a built-in preset instead of the defaults
    #[arg(long, conflicts_with = "config")]
    preset: Option<String>,

    /// Interaction mask PNG (dark pixels are masked)
    #[arg(long)]
    mask: Option<PathBuf>,

    /// Named mask as name=path; repeatable
    #[arg(long = "optional-mask", value_parser = parse_named_mask)]
    optional_masks: Vec<(String, PathBuf)>,

    /// Edit list JSON
    #[arg(long)]
    edits: Option<PathBuf>,

    /// Downscale so neither side exceeds this many pixels (0 keeps the original size)
    #[arg(long, default_value = "800")]
    max_dimension: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract particles and print or save them as JSON
    Extract {
        #[command(flatten)]
        scene: SceneArgs,

        /// Write the particle list here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run the simulation and save frames as PNG
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Number of frames to simulate
        #[arg(long, default_value = "60")]
        frames: u64,

        /// Simulated milliseconds per frame
        #[arg(long, default_value = "16.67")]
        frame_ms: f64,

        /// Output directory for frame-NNNN.png files
        #[arg(long)]
        out_dir: PathBuf,

        /// Hold the pointer at x,y (image pixels) for the whole run
        #[arg(long, value_parser = parse_pointer)]
        pointer: Option<Vec2>,

        /// Save only every Nth frame
        #[arg(long, default_value = "1")]
        every: u64,
    },

    /// Generate the React component for a scene
    Export {
        #[command(flatten)]
        scene: SceneArgs,

        /// File layout of the generated code
        #[arg(long, default_value = "single")]
        variant: VariantArg,

        /// Directory to write the generated files into
        #[arg(long)]
        out_dir: PathBuf,
    },

    /// Print image and extraction statistics
    Info {
        #[command(flatten)]
        scene: SceneArgs,
    },

    /// List the built-in presets
    Presets,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    /// One self-contained component file
    Single,
    /// Component plus a separate particle data module
    Split,
}

impl From<VariantArg> for ExportVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Single => ExportVariant::SingleFile,
            VariantArg::Split => ExportVariant::ComponentWithData,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    }

    match cli.command {
        Commands::Extract { scene, out } => extract(&scene, out.as_deref()),
        Commands::Render {
            scene,
            frames,
            frame_ms,
            out_dir,
            pointer,
            every,
        } => render(&scene, frames, frame_ms, &out_dir, pointer, every),
        Commands::Export {
            scene,
            variant,
            out_dir,
        } => export(&scene, variant.into(), &out_dir),
        Commands::Info { scene } => info(&scene),
        Commands::Presets => {
            for preset in presets::PRESETS {
                println!("{:<18} {}", preset.name, preset.description);
            }
            Ok(())
        }
    }
}

fn load_project(args: &SceneArgs) -> Result<Project> {
    let config = match (&args.config, &args.preset) {
        (Some(path), _) => ParticleConfig::load(path)?,
        (None, Some(name)) => {
            let preset = presets::find(name).with_context(|| format!("unknown preset '{name}'"))?;
            (preset.config)()
        }
        (None, None) => ParticleConfig::default(),
    };

    let mut project = Project::new(config);
    project.load_options.max_dimension = (args.max_dimension > 0).then_some(args.max_dimension);
    project.open_image(&args.image)?;

    if let Some(path) = &args.mask {
        project.load_mask(path)?;
    }
    for (name, path) in &args.optional_masks {
        let slug = project.load_optional_mask(name, path)?;
        log::info!("optional mask '{name}' loaded as '{slug}'");
    }
    if let Some(path) = &args.edits {
        project.load_edits(path)?;
    }
    Ok(project)
}

fn scene_of(project: &Project) -> Result<&Scene> {
    project.scene().context("no scene was extracted")
}

fn extract(args: &SceneArgs, out: Option<&Path>) -> Result<()> {
    let project = load_project(args)?;
    let scene = scene_of(&project)?;
    let json = serde_json::to_string_pretty(&scene.particles)?;
    match out {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))?;
            println!("{} particles written to {}", scene.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn render(
    args: &SceneArgs,
    frames: u64,
    frame_ms: f64,
    out_dir: &Path,
    pointer: Option<Vec2>,
    every: u64,
) -> Result<()> {
    let mut project = load_project(args)?;
    fs::create_dir_all(out_dir).with_context(|| format!("cannot create {}", out_dir.display()))?;

    let engine = project.engine_mut().context("no scene was extracted")?;
    if let Some(position) = pointer {
        engine.set_pointer(position);
    }
    let (width, height) = (engine.scene().width, engine.scene().height);
    let mut canvas = PixelCanvas::new(width, height);
    let every = every.max(1);
    let mut save_error = None;

    let summary = FrameLoop::fixed(frame_ms)
        .with_max_frames(frames)
        .run(engine, &mut canvas, |frame, _, canvas| {
            if frame % every != 0 {
                return ControlFlow::Continue(());
            }
            let path = out_dir.join(format!("frame-{frame:04}.png"));
            match canvas.save_png(&path) {
                Ok(()) => ControlFlow::Continue(()),
                Err(e) => {
                    save_error = Some(e);
                    ControlFlow::Break(())
                }
            }
        });

    if let Some(e) = save_error {
        return Err(e.into());
    }
    if summary.stopped != StopReason::FrameLimit {
        log::warn!("render stopped early: {:?}", summary.stopped);
    }
    println!(
        "{} frames simulated ({} drawn), final quality {:?}",
        summary.frames,
        summary.rendered,
        engine.quality()
    );
    Ok(())
}

fn export(args: &SceneArgs, variant: ExportVariant, out_dir: &Path) -> Result<()> {
    let project = load_project(args)?;
    let bundle = project.export(variant);
    let written = bundle.write_to_dir(out_dir)?;
    for path in &written {
        println!("{}", path.display());
    }
    println!("{} bytes in {} files", bundle.total_bytes(), written.len());
    Ok(())
}

#[derive(Serialize)]
struct SceneInfo<'a> {
    file_name: Option<&'a str>,
    original_size: [u32; 2],
    canvas_size: [u32; 2],
    particles: usize,
    masked: usize,
    mask_groups: Vec<(&'a str, usize)>,
    edits: usize,
}

fn info(args: &SceneArgs) -> Result<()> {
    let project = load_project(args)?;
    let image = project.image().context("no image loaded")?;
    let scene = scene_of(&project)?;
    let groups = scene.mask_groups();

    let source = image.source();
    let info = SceneInfo {
        file_name: source.file_name.as_deref(),
        original_size: [source.original_width, source.original_height],
        canvas_size: [scene.width, scene.height],
        particles: scene.len(),
        masked: scene.masked_count(),
        mask_groups: groups.iter().map(|(slug, ids)| (slug.as_str(), ids.len())).collect(),
        edits: project.edits().len(),
    };
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
