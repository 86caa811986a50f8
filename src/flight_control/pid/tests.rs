use super::PidController;
use crate::config::PidConfig;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rand::Rng;

const DT: f64 = 0.02;

fn t0() -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap() }

fn tick(i: i64) -> DateTime<Utc> { t0() + TimeDelta::milliseconds(20 * i) }

fn config(kp: f64, ki: f64, kd: f64) -> PidConfig {
    PidConfig {
        kp,
        kd,
        ki,
        min_output: -100.0,
        max_output: 100.0,
        integrator_min: -5.0,
        integrator_max: 5.0,
    }
}

fn value_close(expected: f64, actual: f64) -> bool { (expected - actual).abs() < 1e-9 }

#[test]
fn test_pid_proportional_only() {
    let mut pid = PidController::new("x", &config(2.0, 0.0, 0.0), DT);
    let output = pid.update(1.0, 0.25, tick(0));
    assert!(value_close(1.5, output), "Output should be kp * error, got {output}");
}

#[test]
fn test_pid_first_update_uses_nominal_period() {
    let mut pid = PidController::new("z", &config(0.0, 1.0, 1.0), DT);
    let output = pid.update(1.0, 0.0, tick(0));
    // integral = 1 * 0.02, derivative = (1 - 0) / 0.02
    assert!(value_close(0.02, pid.integral()));
    assert!(value_close(50.02, output));
}

#[test]
fn test_pid_dt_from_timestamps() {
    let mut pid = PidController::new("z", &config(0.0, 1.0, 0.0), DT);
    pid.update(1.0, 0.0, tick(0));
    pid.update(1.0, 0.0, tick(5));
    // 0.02 for the first call, then 0.1 s elapsed
    assert!(value_close(0.12, pid.integral()));
}

#[test]
fn test_pid_repeated_timestamp_does_not_divide_by_zero() {
    let mut pid = PidController::new("z", &config(1.0, 1.0, 1.0), DT);
    pid.update(1.0, 0.0, tick(0));
    let output = pid.update(2.0, 0.0, tick(0));
    assert!(output.is_finite());
}

#[test]
fn test_pid_integral_clamped() {
    let mut pid = PidController::new("x", &config(0.0, 1.0, 0.0), DT);
    for i in 0..1000 {
        pid.update(10.0, 0.0, tick(i));
    }
    assert!(value_close(5.0, pid.integral()), "Integral should be clamped to 5");
    for i in 1000..3000 {
        pid.update(-10.0, 0.0, tick(i));
    }
    assert!(value_close(-5.0, pid.integral()), "Integral should be clamped to -5");
}

#[test]
fn test_pid_output_clamped() {
    let mut pid = PidController::new("x", &config(1000.0, 0.0, 0.0), DT);
    assert!(value_close(100.0, pid.update(1.0, 0.0, tick(0))));
    assert!(value_close(-100.0, pid.update(-1.0, 0.0, tick(1))));
}

#[test]
fn test_pid_derivative_on_raw_error() {
    let mut pid = PidController::new("x", &config(0.0, 0.0, 0.1), DT);
    pid.update(1.0, 0.0, tick(0));
    let output = pid.update(1.0, 0.5, tick(1));
    // (0.5 - 1.0) / 0.02 * 0.1
    assert!(value_close(-2.5, output));
}

#[test]
fn test_pid_update_without_i_holds_integral() {
    let mut pid = PidController::new("x", &config(1.0, 10.0, 0.0), DT);
    pid.update(1.0, 0.0, tick(0));
    let held = pid.integral();
    let output = pid.update_without_i(1.0, 0.0, tick(1));
    assert!(value_close(held, pid.integral()), "Integral must not accumulate");
    assert!(value_close(1.0, output), "Only the proportional term should remain");
    pid.update(1.0, 0.0, tick(2));
    assert!(value_close(held + 0.02, pid.integral()), "Accumulation resumes from held value");
}

#[test]
fn test_pid_reset_matches_fresh_controller() {
    let cfg = config(3.0, 2.0, 0.5);
    let mut used = PidController::new("y", &cfg, DT);
    for i in 0..25 {
        #[allow(clippy::cast_precision_loss)]
        used.update(0.4, i as f64 * 0.01, tick(i));
    }
    used.reset();
    assert!(value_close(0.0, used.integral()));
    assert!(value_close(0.0, used.previous_error()));

    let mut fresh = PidController::new("y", &cfg, DT);
    let later = tick(400);
    assert!(value_close(fresh.update(0.3, -0.1, later), used.update(0.3, -0.1, later)));
    let next = tick(401);
    assert!(value_close(fresh.update(0.2, 0.0, next), used.update(0.2, 0.0, next)));
}

#[test]
fn test_pid_bounds_hold_for_random_configurations() {
    let mut rng = rand::rng();
    for _ in 0..200 {
        let max_output = rng.random_range(0.1..50_000.0);
        let min_output = -rng.random_range(0.1..50_000.0);
        let integrator_max = rng.random_range(0.0..1_000.0);
        let integrator_min = -rng.random_range(0.0..1_000.0);
        let cfg = PidConfig {
            kp: rng.random_range(-30_000.0..30_000.0),
            kd: rng.random_range(-15_000.0..15_000.0),
            ki: rng.random_range(-3_500.0..3_500.0),
            min_output,
            max_output,
            integrator_min,
            integrator_max,
        };
        let mut pid = PidController::new("rand", &cfg, DT);
        let setpoint = rng.random_range(-2.0..2.0);
        let measurement = rng.random_range(-2.0..2.0);
        for i in 0..500 {
            let output = pid.update(setpoint, measurement, tick(i));
            assert!(output <= max_output && output >= min_output, "Output {output} escaped limits");
            assert!(
                pid.integral() <= integrator_max && pid.integral() >= integrator_min,
                "Integral {} escaped limits",
                pid.integral()
            );
        }
    }
}
