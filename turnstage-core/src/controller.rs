/// Drag-and-key rotation controller with inertial damping and stage reporting
use log::debug;

use crate::stage::{normalize_angle, Stage, StageMap};
use crate::tuning::Tuning;

/// Rotation keys the controller understands; hosts map their own key codes
/// onto these and ignore everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateKey {
    Left,
    Right,
}

/// Pointer-drag tracking shared by the event handlers and the frame tick
#[derive(Debug, Clone, Copy, Default)]
pub struct DragState {
    pub active: bool,
    pub last_x: f32,
}

/// Sink invoked with the freshly classified stage on every dragging frame
pub type StageSink = Box<dyn FnMut(Option<Stage>)>;

/// Owns the rotation angle of one rotatable object.
///
/// Input handlers mutate the shared drag/velocity state as events arrive;
/// the host calls [`RotationController::update`] once per rendered frame to
/// integrate motion and re-classify the stage. All state lives on one logical
/// thread, so there is no locking.
///
/// The angle accumulates without bound; classification and the coasting stop
/// condition always operate on its normalized value.
pub struct RotationController {
    angle: f32,
    velocity: f32,
    drag: DragState,
    viewport_width: f32,
    stage: Option<Stage>,
    tuning: Tuning,
    stages: StageMap,
    sink: Option<StageSink>,
}

impl RotationController {
    pub fn new(viewport_width: f32) -> Self {
        Self::with_config(viewport_width, Tuning::default(), StageMap::default())
    }

    pub fn with_config(viewport_width: f32, tuning: Tuning, stages: StageMap) -> Self {
        Self {
            angle: 0.0,
            velocity: 0.0,
            drag: DragState::default(),
            viewport_width: viewport_width.max(1.0),
            stage: None,
            tuning,
            stages,
            sink: None,
        }
    }

    /// Horizontal size used to normalize drag deltas. Non-positive widths are
    /// clamped so a delta can never divide by zero.
    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width.max(1.0);
    }

    /// Install a sink that receives the stage on every dragging-frame
    /// re-evaluation, changed or not.
    pub fn set_stage_sink(&mut self, sink: StageSink) {
        self.sink = Some(sink);
    }

    /// Pointer or first-touch contact at horizontal coordinate `x`
    pub fn drag_start(&mut self, x: f32) {
        self.drag.active = true;
        self.drag.last_x = x;
    }

    /// Pointer/touch release. Velocity is left untouched so the released drag
    /// keeps coasting.
    pub fn drag_end(&mut self) {
        self.drag.active = false;
    }

    /// Pointer or first-touch movement to horizontal coordinate `x`.
    /// Ignored while no drag is active.
    pub fn drag_move(&mut self, x: f32) {
        if !self.drag.active {
            return;
        }
        let delta = (x - self.drag.last_x) / self.viewport_width;
        self.angle += delta * self.tuning.drag_gain;
        self.velocity = delta * self.tuning.drag_gain;
        self.drag.last_x = x;
    }

    /// Rotate-key press. Keyboard rotation is modeled as a drag session: the
    /// press activates dragging, nudges the angle one step and leaves a fixed
    /// residual spin behind.
    pub fn key_down(&mut self, key: RotateKey) {
        self.drag.active = true;
        match key {
            RotateKey::Left => {
                self.angle += self.tuning.key_step;
                self.velocity = self.tuning.key_spin;
            }
            RotateKey::Right => {
                self.angle -= self.tuning.key_step;
                self.velocity = -self.tuning.key_spin;
            }
        }
    }

    /// Rotate-key release ends the keyboard drag session. Hosts only route
    /// the two rotation keys here, so any other release leaves the state
    /// alone.
    pub fn key_up(&mut self, _key: RotateKey) {
        self.drag.active = false;
    }

    /// Advance one rendered frame.
    ///
    /// Dragging frames integrate nothing (the event handlers already moved
    /// the angle) and re-classify the stage. Idle frames decay the residual
    /// velocity geometrically, snap it to zero below the rest epsilon and
    /// apply what remains to the angle; the stage is not re-evaluated while
    /// coasting.
    pub fn update(&mut self) {
        if self.drag.active {
            let stage = self.stages.classify(normalize_angle(self.angle));
            if stage != self.stage {
                debug!("stage changed: {:?} -> {:?}", self.stage, stage);
            }
            self.stage = stage;
            if let Some(sink) = &mut self.sink {
                sink(stage);
            }
        } else {
            self.velocity *= self.tuning.damping;
            if self.velocity.abs() < self.tuning.rest_epsilon {
                self.velocity = 0.0;
            }
            self.angle += self.velocity;
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn normalized_angle(&self) -> f32 {
        normalize_angle(self.angle)
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.active
    }

    /// Stage from the most recent dragging frame
    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::f32::consts::PI;
    use std::rc::Rc;

    #[test]
    fn test_drag_mapping_is_linear_in_total_travel() {
        // Many small moves and one large move covering the same travel must
        // land on the same angle.
        let mut stepped = RotationController::new(1000.0);
        stepped.drag_start(0.0);
        for x in [12.0, 40.0, 33.0, 90.0, 250.0] {
            stepped.drag_move(x);
        }

        let mut direct = RotationController::new(1000.0);
        direct.drag_start(0.0);
        direct.drag_move(250.0);

        let expected = 250.0 / 1000.0 * 0.01 * PI;
        assert!((stepped.angle() - expected).abs() < 1e-6);
        assert!((direct.angle() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_move_without_active_drag_is_a_noop() {
        let mut controller = RotationController::new(800.0);
        controller.drag_move(500.0);
        assert_eq!(controller.angle(), 0.0);
        assert_eq!(controller.velocity(), 0.0);
    }

    #[test]
    fn test_drag_start_rereads_coordinate() {
        // A second down event must re-anchor the drag, not reuse stale state.
        let mut controller = RotationController::new(100.0);
        controller.drag_start(10.0);
        controller.drag_start(30.0);
        controller.drag_move(40.0);
        let expected = 10.0 / 100.0 * 0.01 * PI;
        assert!((controller.angle() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_key_left_applies_step_and_spin() {
        let mut controller = RotationController::new(640.0);
        controller.key_down(RotateKey::Left);
        assert!((controller.angle() - 0.005 * PI).abs() < 1e-7);
        assert!((controller.velocity() - 0.007).abs() < 1e-7);
        assert!(controller.is_dragging());

        controller.key_up(RotateKey::Left);
        controller.update();
        assert!((controller.velocity() - 0.007 * 0.95).abs() < 1e-7);
    }

    #[test]
    fn test_key_right_mirrors_left() {
        let mut controller = RotationController::new(640.0);
        controller.key_down(RotateKey::Right);
        assert!((controller.angle() + 0.005 * PI).abs() < 1e-7);
        assert!((controller.velocity() + 0.007).abs() < 1e-7);
    }

    #[test]
    fn test_coasting_stops_within_the_damping_bound() {
        let mut controller = RotationController::new(640.0);
        controller.key_down(RotateKey::Left);
        controller.key_up(RotateKey::Left);

        // |v| shrinks by 0.95 each frame until it crosses 0.001
        let bound = (0.001f32 / 0.007).ln() / 0.95f32.ln();
        let bound = bound.ceil() as usize;

        let mut frames = 0;
        while controller.velocity() != 0.0 {
            controller.update();
            frames += 1;
            assert!(frames <= bound, "velocity still {} after {} frames", controller.velocity(), frames);
        }

        let resting_angle = controller.angle();
        for _ in 0..10 {
            controller.update();
        }
        assert_eq!(controller.angle(), resting_angle);
    }

    #[test]
    fn test_released_drag_keeps_coasting() {
        let mut controller = RotationController::new(100.0);
        controller.drag_start(0.0);
        controller.drag_move(50.0);
        let velocity = controller.velocity();
        assert!(velocity > 0.0);

        controller.drag_end();
        let angle = controller.angle();
        controller.update();
        assert!((controller.velocity() - velocity * 0.95).abs() < 1e-7);
        assert!(controller.angle() > angle);
    }

    #[test]
    fn test_empty_drag_leaves_angle_untouched() {
        let mut controller = RotationController::new(100.0);
        controller.drag_start(42.0);
        controller.drag_end();
        assert_eq!(controller.angle(), 0.0);
        assert!(!controller.is_dragging());

        controller.update();
        assert_eq!(controller.angle(), 0.0);
    }

    #[test]
    fn test_stage_classified_only_while_dragging() {
        let mut controller = RotationController::new(1.0);
        // Default gain: reaching norm 2.5 takes 2.5 / (0.01π) units of travel
        let travel = 2.5 / (0.01 * PI);
        controller.drag_start(0.0);
        controller.drag_move(travel);
        controller.update();
        assert_eq!(controller.stage(), Some(Stage(2)));

        // Coasting out of the window must not clear the reported stage
        controller.drag_end();
        for _ in 0..100 {
            controller.update();
        }
        assert_eq!(controller.stage(), Some(Stage(2)));
    }

    #[test]
    fn test_sink_sees_every_dragging_frame() {
        let seen: Rc<RefCell<Vec<Option<Stage>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink_seen = Rc::clone(&seen);

        let mut controller = RotationController::new(1.0);
        controller.set_stage_sink(Box::new(move |stage| sink_seen.borrow_mut().push(stage)));

        let travel = 1.0 / (0.01 * PI);
        controller.drag_start(0.0);
        controller.update();
        controller.drag_move(travel);
        controller.update();
        controller.drag_end();
        controller.update();

        // Two dragging frames reported; the idle frame stays silent
        assert_eq!(seen.borrow().as_slice(), &[None, Some(Stage(3))]);
    }

    #[test]
    fn test_viewport_width_is_clamped_positive() {
        let mut controller = RotationController::new(0.0);
        controller.drag_start(0.0);
        controller.drag_move(1.0);
        assert!(controller.angle().is_finite());

        controller.set_viewport_width(-5.0);
        controller.drag_move(2.0);
        assert!(controller.angle().is_finite());
    }
}
