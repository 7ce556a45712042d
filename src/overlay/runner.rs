use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::detection::{DetectionOverlay, RenderedBox};
use super::Surface;
use crate::config::MAX_FPS;

/// Latest published frame. `sequence` counts frames drawn since startup.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionFrame {
    pub sequence: u64,
    pub boxes: Vec<RenderedBox>,
}

#[derive(Default)]
struct FrameSlot {
    generation: u64,
    frame: DetectionFrame,
}

fn lock(slot: &Mutex<FrameSlot>) -> MutexGuard<'_, FrameSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the repeating detection task. Stopping aborts the task and bumps the
/// slot generation under the lock, so a frame still in flight is discarded.
pub struct DetectionRunner {
    slot: Arc<Mutex<FrameSlot>>,
    task: Option<JoinHandle<()>>,
    frame_period: Duration,
    seed: Option<u64>,
}

impl DetectionRunner {
    pub fn new(fps: u32, seed: Option<u64>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(FrameSlot::default())),
            task: None,
            frame_period: Duration::from_secs(1) / fps.clamp(1, MAX_FPS),
            seed,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn frame(&self) -> DetectionFrame {
        lock(&self.slot).frame.clone()
    }

    pub fn start(&mut self, surface: watch::Receiver<Surface>) {
        let rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.start_with(surface, DetectionOverlay::new(rng));
    }

    pub fn start_with<R>(&mut self, surface: watch::Receiver<Surface>, mut overlay: DetectionOverlay<R>)
    where
        R: Rng + Send + 'static,
    {
        if self.is_running() {
            return;
        }

        let slot = Arc::clone(&self.slot);
        let generation = lock(&slot).generation;
        let period = self.frame_period;

        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                let bounds = *surface.borrow();
                let boxes = overlay.step(bounds);

                let mut guard = lock(&slot);
                if guard.generation != generation {
                    break;
                }
                guard.frame.sequence += 1;
                guard.frame.boxes = boxes;
            }
        }));

        tracing::debug!(period_ms = period.as_millis() as u64, "detection overlay started");
    }

    pub fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        task.abort();

        let mut guard = lock(&self.slot);
        guard.generation += 1;
        guard.frame.boxes.clear();
        drop(guard);

        tracing::debug!("detection overlay stopped");
    }
}

impl Drop for DetectionRunner {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
