use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use glam::Vec3;
use tracing_subscriber::EnvFilter;
use voxscape_assets::{MeshCatalog, default_catalog};
use voxscape_input::{Action, ControlState, Outcome, dispatch};
use voxscape_kernel::{PlaybackState, SynthesisConfig, SynthesisController};
use voxscape_render::{DebugTextRenderer, FrameSettings, LightMatrixBuilder, Renderer};
use voxscape_solver::{TileSet, TileSolver, WfcSolver};
use voxscape_tools::SceneInspector;

#[derive(Parser)]
#[command(name = "voxscape-cli", about = "Generate voxel castle scenes and replay solver states")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Generate one scene and print its batches
    Generate {
        #[command(flatten)]
        scene: SceneArgs,
        /// Write the final assignments as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// List empty batches too
        #[arg(long)]
        show_empty: bool,
    },
    /// Generate with state capture, then replay the captured states
    Playback {
        #[command(flatten)]
        scene: SceneArgs,
        /// Step this many states by hand instead of timed playback
        #[arg(long)]
        steps: Option<usize>,
        /// Simulated frame time for timed playback, in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: u64,
        /// Light the scene with moonlight
        #[arg(long)]
        night: bool,
    },
    /// Print light-space matrices for a light direction
    Light {
        #[arg(long, default_value = "12", allow_hyphen_values = true)]
        x: f32,
        #[arg(long, default_value = "6", allow_hyphen_values = true)]
        y: f32,
        #[arg(long, default_value = "10", allow_hyphen_values = true)]
        z: f32,
    },
}

#[derive(Args)]
struct SceneArgs {
    /// Grid size along X (4-16)
    #[arg(short = 'x', long)]
    grid_x: Option<u32>,
    /// Grid size along Y (4-16)
    #[arg(short = 'y', long)]
    grid_y: Option<u32>,
    /// Grid size along Z (4-16)
    #[arg(short = 'z', long)]
    grid_z: Option<u32>,
    /// Solver seed; the clock is used when omitted
    #[arg(short, long)]
    seed: Option<u64>,
    /// Wrap the grid around its X and Y edges
    #[arg(long)]
    wrap: bool,
    /// Mesh catalog JSON; the built-in castle catalog when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Synthesis config JSON
    #[arg(long)]
    config: Option<PathBuf>,
}

impl SceneArgs {
    fn load(&self) -> anyhow::Result<(SynthesisConfig, MeshCatalog)> {
        let config = match &self.config {
            Some(path) => SynthesisConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SynthesisConfig::default(),
        };
        let catalog = match &self.catalog {
            Some(path) => MeshCatalog::load(path)
                .with_context(|| format!("loading catalog {}", path.display()))?,
            None => default_catalog(),
        };

        let mut controls = ControlState::new(config, Default::default());
        if self.grid_x.is_some() || self.grid_y.is_some() || self.grid_z.is_some() {
            let grid = controls.config.grid;
            let (next, _) = controls.reduce(Action::SetGridSize {
                x: self.grid_x.unwrap_or(grid.x()),
                y: self.grid_y.unwrap_or(grid.y()),
                z: self.grid_z.unwrap_or(grid.z()),
            });
            controls = next;
        }
        let mut config = controls.config;
        if self.seed.is_some() {
            config = config.with_seed(self.seed);
        }
        if self.wrap {
            config = config.with_wrap_edges(true);
        }
        Ok((config, catalog))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("voxscape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", voxscape_common::crate_info());
            println!("solver: {}", voxscape_solver::crate_info());
            println!("assets: {}", voxscape_assets::crate_info());
            println!("kernel: {}", voxscape_kernel::crate_info());
            println!("render: {}", voxscape_render::crate_info());
            println!("input: {}", voxscape_input::crate_info());
            println!("tools: {}", voxscape_tools::crate_info());
            println!("catalog: {} meshes", default_catalog().len());
        }
        Commands::Generate {
            scene,
            out,
            show_empty,
        } => {
            let (config, catalog) = scene.load()?;
            let mut controller = SynthesisController::new(WfcSolver::new(TileSet::castle()), catalog);
            let attempts = controller.generate(&config)?;
            println!("Generated in {attempts} attempt(s)");

            let mut frame = FrameSettings::default();
            let inputs = frame.prepare(&controller)?;
            print!("{}", DebugTextRenderer { show_empty }.render(&inputs));
            println!("{}", SceneInspector::summary(&controller));

            if let (Some(path), Some(state)) = (out, controller.output()) {
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                serde_json::to_writer_pretty(file, state)?;
                println!("Wrote {} assignments to {}", state.len(), path.display());
            }
        }
        Commands::Playback {
            scene,
            steps,
            frame_ms,
            night,
        } => {
            let (config, catalog) = scene.load()?;
            let mut controller = SynthesisController::new(WfcSolver::new(TileSet::castle()), catalog);
            let mut frame = FrameSettings::default();
            let mut controls = ControlState::new(config, frame.sky);

            if !controls.config.debug_capture {
                apply(&mut controls, Action::ToggleDebugCapture, &mut controller, &mut frame)?;
            }
            if night {
                apply(&mut controls, Action::ToggleSkyColor, &mut controller, &mut frame)?;
            }
            apply(&mut controls, Action::Regenerate, &mut controller, &mut frame)?;
            println!("Recorded {} states", controller.history_len());

            match steps {
                Some(n) => {
                    for _ in 0..n {
                        let outcome = apply(&mut controls, Action::StepOnce, &mut controller, &mut frame)?;
                        if let Outcome::Displayed(shown) = outcome {
                            println!("{shown:?}: {}", SceneInspector::summary(&controller));
                        }
                    }
                }
                None => {
                    apply(&mut controls, Action::PlayTimed, &mut controller, &mut frame)?;
                    let dt = Duration::from_millis(frame_ms.max(1));
                    let mut frames = 0u64;
                    while controller.playback().state() != PlaybackState::Done {
                        controller.update(dt);
                        frames += 1;
                    }
                    println!(
                        "Played {} states over {frames} frames ({:?} simulated)",
                        controller.history_len(),
                        dt * frames as u32
                    );
                }
            }
            let inputs = frame.prepare(&controller)?;
            print!("{}", DebugTextRenderer::new().render(&inputs));
        }
        Commands::Light { x, y, z } => {
            let light = LightMatrixBuilder::default().build(Vec3::new(x, y, z))?;
            println!("Light direction: {}", light.direction);
            println!("ViewProj:\n{}", format_matrix(&light.view_projection));
            println!("Viewport:\n{}", format_matrix(&light.viewport_projection));
        }
    }

    Ok(())
}

/// Reduce `action` into the next control state and run its effect.
fn apply<S: TileSolver>(
    controls: &mut ControlState,
    action: Action,
    controller: &mut SynthesisController<S>,
    frame: &mut FrameSettings,
) -> anyhow::Result<Outcome> {
    let (next, effect) = controls.reduce(action);
    *controls = next;
    Ok(dispatch(effect, controller, frame)?)
}

/// Row-major text dump of a matrix.
fn format_matrix(m: &glam::Mat4) -> String {
    (0..4)
        .map(|r| {
            let row = m.row(r);
            format!("  [{:>10.5} {:>10.5} {:>10.5} {:>10.5}]", row.x, row.y, row.z, row.w)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
