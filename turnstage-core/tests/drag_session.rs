/// End-to-end controller sessions: drag into a stage window, coast to rest,
/// then drive the keyboard path.
use std::cell::RefCell;
use std::f32::consts::{PI, TAU};
use std::rc::Rc;

use turnstage_core::{RotateKey, RotationController, Stage};

#[test]
fn drag_into_stage_then_coast_to_rest() {
    let mut controller = RotationController::new(800.0);
    let reports: Rc<RefCell<Vec<Option<Stage>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink_reports = Rc::clone(&reports);
    controller.set_stage_sink(Box::new(move |stage| sink_reports.borrow_mut().push(stage)));

    // Sweep to the stage-3 window at norm 1.0: the drag mapping is linear in
    // total travel, so the target is travel = angle / gain * width.
    let travel = 1.0 / (0.01 * PI) * 800.0;
    let frames = 40;
    controller.drag_start(0.0);
    for frame in 1..=frames {
        controller.drag_move(travel * frame as f32 / frames as f32);
        controller.update();
    }

    assert_eq!(controller.stage(), Some(Stage(3)));
    assert_eq!(reports.borrow().len(), frames);
    assert_eq!(reports.borrow().last(), Some(&Some(Stage(3))));

    // Release: the drag coasts, decaying geometrically to an exact stop
    controller.drag_end();
    let velocity = controller.velocity();
    assert!(velocity > 0.0);
    let bound = ((0.001f32 / velocity).ln() / 0.95f32.ln()).ceil() as usize + 1;

    let sink_calls_before = reports.borrow().len();
    let mut coasted = 0;
    while controller.velocity() != 0.0 {
        controller.update();
        coasted += 1;
        assert!(coasted <= bound, "still coasting after {coasted} frames");
    }

    // Idle frames never re-classify or report
    assert_eq!(reports.borrow().len(), sink_calls_before);
    assert_eq!(controller.stage(), Some(Stage(3)));

    let resting = controller.angle();
    controller.update();
    assert_eq!(controller.angle(), resting);
}

#[test]
fn keyboard_session_stays_normalizable() {
    let mut controller = RotationController::new(1024.0);

    // Drive far negative with held autorepeat presses
    for _ in 0..2000 {
        controller.key_down(RotateKey::Right);
        controller.update();
    }
    controller.key_up(RotateKey::Right);

    assert!(controller.angle() < -TAU);
    let normalized = controller.normalized_angle();
    assert!((0.0..TAU).contains(&normalized));

    // A fresh left press flips the coast direction
    controller.key_down(RotateKey::Left);
    controller.key_up(RotateKey::Left);
    let angle = controller.angle();
    controller.update();
    assert!(controller.angle() > angle);
}
