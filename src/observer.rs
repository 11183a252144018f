//! Step observer trait for monitoring simulation progress.

/// Hooks called by the solver and the episode controller.
///
/// Implement this trait to monitor progress (debugging, diagnostics,
/// profiling). All methods have default no-op implementations.
pub trait StepObserver {
    /// Called after spring and gravity forces are published for a substep.
    fn on_forces_accumulated(&mut self) {}

    /// Called after drag, contacts and the position update of a substep.
    fn on_integrate(&mut self) {}

    /// Called when a substep is complete. `substep` counts from 0 within a frame.
    fn on_substep_complete(&mut self, _substep: usize) {}

    /// Called after an episode reset, with the number of the new episode.
    fn on_episode_reset(&mut self, _episode: u64) {}

    /// Called when every substep of a frame is done.
    fn on_frame_complete(&mut self) {}
}

/// A no-op observer. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}

/// Counts every hook invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CountingObserver {
    pub force_passes: usize,
    pub integrations: usize,
    pub substeps: usize,
    pub resets: usize,
    pub frames: usize,
}

impl StepObserver for CountingObserver {
    fn on_forces_accumulated(&mut self) {
        self.force_passes += 1;
    }

    fn on_integrate(&mut self) {
        self.integrations += 1;
    }

    fn on_substep_complete(&mut self, _substep: usize) {
        self.substeps += 1;
    }

    fn on_episode_reset(&mut self, _episode: u64) {
        self.resets += 1;
    }

    fn on_frame_complete(&mut self) {
        self.frames += 1;
    }
}
