use std::sync::Arc;

use crate::{
    config::SceneConfig,
    error::Result,
    scene::{CpuDispatcher, SceneDesc, SimulationEventCallback, SimulationScene},
    utils::logging::{warn_if_frame_budget_exceeded, ScopedTimer},
};

/// Owns the scene and its worker pool. Field order releases the scene
/// before the pool.
pub struct SimulationStepper {
    scene: SimulationScene,
    dispatcher: Arc<CpuDispatcher>,
}

impl SimulationStepper {
    pub fn new(config: &SceneConfig, callback: Arc<dyn SimulationEventCallback>) -> Result<Self> {
        let dispatcher = Arc::new(CpuDispatcher::new(config.worker_count)?);
        let scene = SimulationScene::new(
            SceneDesc::from_config(config, callback),
            Arc::clone(&dispatcher),
        );
        Ok(Self { scene, dispatcher })
    }

    /// Advances the scene by exactly `dt`, blocking until every worker and
    /// callback has finished. Warns when the step took longer than `dt`.
    pub fn advance(&mut self, dt: f32) {
        let timer = ScopedTimer::new("stepper::advance");
        self.scene.advance(dt);
        warn_if_frame_budget_exceeded(timer.elapsed(), dt * 1000.0);
    }

    pub fn scene(&self) -> &SimulationScene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SimulationScene {
        &mut self.scene
    }

    pub fn worker_count(&self) -> usize {
        self.dispatcher.worker_count()
    }
}
