/// Stage classification over the normalized rotation angle
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Discrete landmark id derived from the model's heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stage(pub u8);

/// Inclusive angular window in radians mapping onto a stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageWindow {
    pub min: f32,
    pub max: f32,
    pub stage: Stage,
}

impl StageWindow {
    pub fn new(min: f32, max: f32, stage: u8) -> Self {
        Self {
            min,
            max,
            stage: Stage(stage),
        }
    }

    pub fn contains(&self, angle: f32) -> bool {
        angle >= self.min && angle <= self.max
    }
}

/// Ordered window table evaluated top to bottom, first match wins.
///
/// The windows are narrow and disjoint relative to the full circle, so most
/// headings classify to no stage at all. There is no hysteresis: an angle
/// oscillating on a window edge flickers the reported stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageMap {
    pub windows: Vec<StageWindow>,
}

impl StageMap {
    /// Classify a normalized angle, `None` when no window matches
    pub fn classify(&self, normalized: f32) -> Option<Stage> {
        self.windows
            .iter()
            .find(|window| window.contains(normalized))
            .map(|window| window.stage)
    }
}

impl Default for StageMap {
    fn default() -> Self {
        Self {
            windows: vec![
                StageWindow::new(5.45, 5.85, 4),
                StageWindow::new(0.85, 1.3, 3),
                StageWindow::new(2.4, 2.6, 2),
                StageWindow::new(4.25, 4.75, 1),
            ],
        }
    }
}

/// Reduce an unbounded angle to its canonical representative in [0, 2π).
///
/// The double modulo keeps the result in range for angles of either sign and
/// arbitrary magnitude.
pub fn normalize_angle(angle: f32) -> f32 {
    (angle % TAU + TAU) % TAU
}
