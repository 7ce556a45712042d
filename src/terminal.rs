use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};

use crate::catalog::{load_catalog, CatalogSource};
use crate::config::Config;
use crate::overlay::{
    aim, Beam, DetectionFrame, DetectionRunner, LaserTrail, Point, Surface, DOT_RADIUS,
};
use crate::stream::{validate_stream_url, Availability, SelectError, StreamProbe};
use crate::view::{Action, ViewState};

/// Camera controls shown in the tools panel that have no effect yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolAction {
    Aim,
    Zoom,
    Snapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct LaserUpdate {
    pub beam: Beam,
    pub dot_radius: f64,
    pub dots: Vec<Point>,
}

/// Holds the single view-model and everything that reacts to it. Each change is a
/// pure [`ViewState::apply`] published on a watch channel; overlays are reconciled
/// against the new snapshot before the call returns.
pub struct Terminal {
    view: watch::Sender<ViewState>,
    surface: watch::Sender<Surface>,
    detection: Mutex<DetectionRunner>,
    laser: Mutex<LaserTrail>,
    probe: StreamProbe,
    /// Bumped by every selection attempt, every committed selection and every close.
    /// A probe result is only applied if nothing bumped it meanwhile.
    selection: AtomicU64,
    map_url: String,
    catalog_file: Option<PathBuf>,
}

impl Terminal {
    pub fn new(config: &Config, probe: StreamProbe) -> Self {
        let (view, _) = watch::channel(ViewState::new());
        let (surface, _) = watch::channel(Surface::default());
        let catalog_file = CatalogSource::parse(&config.catalog.source)
            .local_path()
            .cloned();

        Self {
            view,
            surface,
            detection: Mutex::new(DetectionRunner::new(config.overlay.fps, config.overlay.seed)),
            laser: Mutex::new(LaserTrail::new(config.overlay.laser_trail)),
            probe,
            selection: AtomicU64::new(0),
            map_url: config.map.embed_url.clone(),
            catalog_file,
        }
    }

    /// One-shot catalog load. Failure leaves the catalog empty with an error banner.
    pub async fn load(&self, source: &CatalogSource) -> ViewState {
        match load_catalog(source).await {
            Ok(records) => {
                tracing::info!(source = %source, count = records.len(), "loaded camera catalog");
                self.dispatch(Action::CatalogLoaded(records)).await
            }
            Err(e) => {
                tracing::error!(source = %source, error = %e, "failed to load camera catalog");
                self.dispatch(Action::CatalogFailed(e.to_string())).await
            }
        }
    }

    pub fn snapshot(&self) -> ViewState {
        self.view.borrow().clone()
    }

    pub fn map_url(&self) -> &str {
        &self.map_url
    }

    pub fn catalog_file(&self) -> Option<&PathBuf> {
        self.catalog_file.as_ref()
    }

    pub async fn dispatch(&self, action: Action) -> ViewState {
        let mut detection = self.detection.lock().await;
        self.apply(&mut detection, action).await
    }

    /// Like [`Terminal::dispatch`], but only while `ticket` is still the latest
    /// selection attempt.
    async fn dispatch_selection(&self, ticket: u64, action: Action) -> Option<ViewState> {
        let mut detection = self.detection.lock().await;
        if self.selection.load(Ordering::SeqCst) != ticket {
            return None;
        }
        Some(self.apply(&mut detection, action).await)
    }

    async fn apply(&self, detection: &mut DetectionRunner, action: Action) -> ViewState {
        if matches!(action, Action::StreamSelected(_) | Action::CloseCamera) {
            self.selection.fetch_add(1, Ordering::SeqCst);
        }

        self.view.send_modify(|state| *state = state.apply(&action));
        let snapshot = self.snapshot();

        if snapshot.detection_active() {
            if !detection.is_running() {
                detection.start(self.surface.subscribe());
            }
        } else {
            detection.stop();
        }

        if !snapshot.laser_enabled() {
            self.laser.lock().await.clear();
        }

        snapshot
    }

    /// Validates the stream, runs the advisory probe, and switches the viewer.
    /// On failure the current selection is left as it was. A result that arrives
    /// after a newer selection or a close is dropped as [`SelectError::Superseded`].
    pub async fn select_camera(&self, id: u64) -> Result<ViewState, SelectError> {
        let record = self.view.borrow().find_camera(id).cloned();
        let Some(record) = record else {
            return Err(SelectError::UnknownCamera(id));
        };
        let ticket = self.selection.fetch_add(1, Ordering::SeqCst) + 1;

        if let Err(e) = validate_stream_url(&record.stream) {
            tracing::warn!(camera = record.id, url = %record.stream, "rejected stream url");
            self.dispatch_selection(ticket, Action::SelectionFailed(e.clone()))
                .await;
            return Err(e);
        }

        let (action, result) = match self.probe.check(&record.stream).await {
            Availability::Available => (Action::StreamSelected(record.stream), Ok(())),
            Availability::Unreachable => {
                let e = SelectError::Unreachable(record.stream);
                (Action::SelectionFailed(e.clone()), Err(e))
            }
        };

        let Some(state) = self.dispatch_selection(ticket, action).await else {
            tracing::debug!(camera = record.id, "dropping stale selection result");
            return Err(SelectError::Superseded);
        };
        result?;

        tracing::info!(camera = record.id, location = %record.location, "camera selected");
        Ok(state)
    }

    pub fn tool(&self, action: ToolAction) {
        tracing::debug!(tool = ?action, "camera tool is not implemented");
    }

    pub fn set_surface(&self, surface: Surface) {
        self.surface.send_replace(surface);
    }

    pub async fn detection_frame(&self) -> DetectionFrame {
        self.detection.lock().await.frame()
    }

    /// Aims the laser at a pointer position. `None` when the laser is off.
    pub async fn laser_move(&self, surface: Surface, x: f64, y: f64) -> Option<LaserUpdate> {
        if !self.view.borrow().laser_enabled() {
            return None;
        }
        self.set_surface(surface);

        let beam = aim(surface, x, y);
        let mut trail = self.laser.lock().await;
        trail.push(beam.target);

        Some(LaserUpdate {
            beam,
            dot_radius: DOT_RADIUS,
            dots: trail.dots().copied().collect(),
        })
    }

    /// Waits until the view version differs from `since`, or `timeout` passes.
    pub async fn wait_for_change(&self, since: u64, timeout: Duration) -> ViewState {
        let mut rx = self.view.subscribe();
        let changed = async {
            loop {
                if rx.borrow_and_update().version() != since {
                    break;
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        };
        let _ = tokio::time::timeout(timeout, changed).await;
        self.snapshot()
    }
}
