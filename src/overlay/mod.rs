mod detection;
mod laser;
mod runner;

use serde::{Deserialize, Serialize};

pub use laser::{aim, Beam, LaserTrail, Point, DOT_RADIUS};
pub use runner::{DetectionFrame, DetectionRunner};

/// On-screen bounds of the embedded player, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Self {
        let sanitize = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }
}
