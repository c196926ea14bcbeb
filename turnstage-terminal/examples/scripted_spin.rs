/// Scripted controller session - prints stage transitions without a TTY
///
/// Drives a synthetic drag across a full turn, releases it to coast, then
/// nudges with the keyboard path. Useful for eyeballing the stage windows
/// after editing a tuning file.
use turnstage_core::{RotateKey, RotationController, Stage};

fn main() {
    let mut controller = RotationController::new(800.0);
    let mut reported: Option<Stage> = None;

    // One long drag swept in pointer-move increments, one frame per move
    controller.drag_start(0.0);
    let per_frame = 500.0;
    for frame in 1..=320 {
        controller.drag_move(frame as f32 * per_frame);
        controller.update();
        if controller.stage() != reported {
            reported = controller.stage();
            println!(
                "frame {frame:3}: norm {:.3} -> stage {}",
                controller.normalized_angle(),
                label(reported),
            );
        }
    }

    // Release and coast to rest
    controller.drag_end();
    let mut coast_frames = 0;
    while controller.velocity() != 0.0 {
        controller.update();
        coast_frames += 1;
    }
    println!(
        "coasted {coast_frames} frames to norm {:.3}, stage still {}",
        controller.normalized_angle(),
        label(controller.stage()),
    );

    // Keyboard path: a few right-arrow nudges
    for _ in 0..5 {
        controller.key_down(RotateKey::Right);
        controller.update();
    }
    controller.key_up(RotateKey::Right);
    println!(
        "after key nudges: norm {:.3}, stage {}",
        controller.normalized_angle(),
        label(controller.stage()),
    );
}

fn label(stage: Option<Stage>) -> String {
    match stage {
        Some(stage) => stage.0.to_string(),
        None => "-".to_string(),
    }
}
