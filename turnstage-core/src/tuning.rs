/// Interaction tuning constants and the file-loadable viewer configuration
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::stage::StageMap;

/// Tuning knobs for the rotation feel.
///
/// The defaults give a slow, weighty spin: low drag gain relative to the
/// viewport, small per-press key nudges, and a geometric velocity decay that
/// pins residual spin to zero once it drops below `rest_epsilon`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Radians applied per viewport-width of horizontal drag travel
    pub drag_gain: f32,
    /// Radians applied per rotate-key press
    pub key_step: f32,
    /// Residual spin (radians/frame) imparted by a rotate-key press
    pub key_spin: f32,
    /// Per-frame multiplicative velocity decay while not dragging
    pub damping: f32,
    /// Velocity magnitude below which coasting snaps to a full stop
    pub rest_epsilon: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            drag_gain: 0.01 * PI,
            key_step: 0.005 * PI,
            key_spin: 0.007,
            damping: 0.95,
            rest_epsilon: 0.001,
        }
    }
}

/// Complete host configuration: tuning plus the stage window table.
///
/// Hosts may deserialize this from a JSON file; missing fields fall back to
/// the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub tuning: Tuning,
    pub stages: StageMap,
}
