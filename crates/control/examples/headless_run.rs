use std::sync::Arc;
use std::thread;
use std::time::Duration;

use control::{NoRedraw, StepperController};
use simcore::{Direction, StepperConfig};

const RUN_TIME: Duration = Duration::from_millis(500);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = StepperConfig::default()
        .with_speed_range(1, 400)
        .with_speed(200)
        .with_direction(Direction::Cw);
    println!(
        "{} steps per revolution, {}..={} steps/s",
        config.steps_per_revolution(),
        config.min_speed,
        config.max_speed
    );
    let mut ctrl = StepperController::new(config);

    for direction in [Direction::Cw, Direction::Ccw] {
        ctrl.set_direction(direction);
        ctrl.start(Arc::new(NoRedraw))?;

        let mut elapsed = Duration::ZERO;
        while elapsed < RUN_TIME {
            thread::sleep(Duration::from_millis(50));
            elapsed += Duration::from_millis(50);
            ctrl.poll();
            let snap = ctrl.snapshot();
            println!(
                "{:>3}  step {:>5}  total {:>5}  angle {:>8.1}°  coil {}  temp {:>3}°C  power {:>3} W  torque {:>3}%",
                direction.label(),
                snap.current_step,
                snap.total_steps,
                snap.rotor_angle_deg,
                snap.active_coil + 1,
                snap.metrics.temperature,
                snap.metrics.power,
                snap.metrics.torque,
            );
        }

        ctrl.stop();
    }

    ctrl.reset();
    println!("after reset: {:?}", ctrl.state());
    Ok(())
}
