/// Turnstage Core Library - rotation interaction and stage detection
///
/// The controller turns pointer/touch/keyboard input into a damped rotation
/// angle and classifies the normalized angle into discrete stages. The scene
/// modules carry the demo mesh, model transform and camera that the hosts
/// consume around it.

pub mod controller;
pub mod geometry;
pub mod projection;
pub mod stage;
pub mod transform;
pub mod tuning;

// Re-export commonly used types
pub use controller::{DragState, RotateKey, RotationController, StageSink};
pub use geometry::{Mesh, Triangle, Vertex};
pub use projection::{Camera, ProjectionMode};
pub use stage::{normalize_angle, Stage, StageMap, StageWindow};
pub use tuning::{Tuning, ViewerConfig};
