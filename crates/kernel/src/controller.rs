use std::time::Duration;
use voxscape_assets::MeshCatalog;
use voxscape_solver::{SolverState, TileSolver};

use crate::batches::InstanceBatchSet;
use crate::config::SynthesisConfig;
use crate::driver::SolverDriver;
use crate::error::SynthError;
use crate::lights::{PointLight, collect_point_lights};
use crate::playback::{Frame, Playback, TimerHandle};
use crate::transform::{InstanceMap, VoxelTransformer};

/// Controller-level record, appended on every visible change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    PlaybackCancelled { timer: TimerHandle },
    Generated { attempts: u32, states: usize },
    GenerationFailed { attempts: u32 },
    Displayed { frame: Frame, generation: u64 },
}

/// Owns every piece of mutable synthesis state: the solver, the captured
/// run, the playback cursor, the displayed batches and their lights.
///
/// Renderers read through the accessors; nothing else writes.
pub struct SynthesisController<S: TileSolver> {
    driver: SolverDriver<S>,
    catalog: MeshCatalog,
    /// Config of the run currently on screen.
    config: SynthesisConfig,
    history: Vec<S::Snapshot>,
    output: Option<SolverState>,
    playback: Playback,
    batches: InstanceBatchSet,
    lights: Vec<PointLight>,
    events: Vec<SceneEvent>,
}

impl<S: TileSolver> SynthesisController<S> {
    pub fn new(solver: S, catalog: MeshCatalog) -> Self {
        Self {
            driver: SolverDriver::new(solver),
            catalog,
            config: SynthesisConfig::default(),
            history: Vec::new(),
            output: None,
            playback: Playback::new(0),
            batches: InstanceBatchSet::new(),
            lights: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Run the solver with `config` and display its final state.
    ///
    /// Any timed playback is cancelled first. On contradiction the displayed
    /// batches, lights and history are left as they were.
    pub fn generate(&mut self, config: &SynthesisConfig) -> Result<u32, SynthError> {
        config.validate()?;
        if let Some(timer) = self.playback.cancel() {
            self.events.push(SceneEvent::PlaybackCancelled { timer });
        }
        self.playback.restart(self.history.len());

        match self.driver.generate(&config.solver_params()) {
            Ok(run) => {
                self.events.push(SceneEvent::Generated {
                    attempts: run.attempts,
                    states: run.history.len(),
                });
                self.history = run.history;
                self.output = Some(run.output);
                self.config = config.clone();
                self.playback.restart(self.history.len());
                self.display(Frame::Final);
                Ok(run.attempts)
            }
            Err(e) => {
                if let SynthError::Contradiction { attempts } = e {
                    self.events.push(SceneEvent::GenerationFailed { attempts });
                }
                Err(e)
            }
        }
    }

    /// Instances of the final accepted state.
    pub fn latest(&self) -> Option<InstanceMap> {
        let output = self.output.as_ref()?;
        Some(self.transformer().transform(output))
    }

    /// Instances of `history[index]`; past the end, the final state.
    pub fn at(&self, index: usize) -> Option<InstanceMap> {
        match self.history.get(index) {
            Some(snapshot) => Some(self.transformer().transform(&self.driver.expand(snapshot))),
            None => self.latest(),
        }
    }

    /// Display the state under the cursor and advance it by one.
    pub fn step_once(&mut self) -> Option<Frame> {
        self.output.as_ref()?;
        let frame = self.playback.step_once();
        self.display(frame);
        Some(frame)
    }

    /// Start timed playback at the configured period.
    pub fn play_timed(&mut self) -> Option<TimerHandle> {
        self.output.as_ref()?;
        self.playback.play_timed(self.config.playback_period())
    }

    /// Deliver one timer firing. Stale handles do nothing.
    pub fn tick(&mut self, timer: TimerHandle) -> Option<Frame> {
        let frame = self.playback.tick(timer)?;
        self.display(frame);
        Some(frame)
    }

    /// Advance the frame clock; returns how many states were displayed.
    pub fn update(&mut self, dt: Duration) -> usize {
        let frames = self.playback.update(dt);
        for &frame in &frames {
            self.display(frame);
        }
        frames.len()
    }

    /// Stop timed playback. Returns whether a timer was live.
    pub fn cancel_playback(&mut self) -> bool {
        match self.playback.cancel() {
            Some(timer) => {
                self.events.push(SceneEvent::PlaybackCancelled { timer });
                true
            }
            None => false,
        }
    }

    /// Batches of the state on screen.
    pub fn batches(&self) -> &InstanceBatchSet {
        &self.batches
    }

    /// Point lights of the state on screen.
    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    /// Playback cursor and mode.
    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Config of the last successful generation.
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Mesh catalog used to resolve tiles.
    pub fn catalog(&self) -> &MeshCatalog {
        &self.catalog
    }

    /// Final state of the last successful generation.
    pub fn output(&self) -> Option<&SolverState> {
        self.output.as_ref()
    }

    /// Number of captured states; 0 without debug capture.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The wrapped solver.
    pub fn solver(&self) -> &S {
        self.driver.solver()
    }

    /// Scene events since the last drain.
    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    /// Take and clear the scene event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    fn transformer(&self) -> VoxelTransformer<'_> {
        VoxelTransformer::new(&self.catalog, self.config.cell_size)
    }

    fn display(&mut self, frame: Frame) {
        let instances = match frame {
            Frame::History(i) => self.at(i),
            Frame::Final => self.latest(),
        }
        .unwrap_or_default();
        self.lights = collect_point_lights(&self.catalog, &instances);
        self.batches.rebuild(&self.catalog, instances);
        self.events.push(SceneEvent::Displayed {
            frame,
            generation: self.batches.generation(),
        });
    }
}
