use crate::config::PidConfig;
use crate::event;
use crate::flight_control::common::secs;
use chrono::{DateTime, Utc};

/// Discrete PID controller with a clamped integrator and clamped output.
///
/// One instance per controlled axis. The elapsed time between two updates is
/// taken from the timestamps passed in; the first update after construction
/// or [`PidController::reset`] uses the nominal control period instead.
#[derive(Debug, Clone)]
pub struct PidController {
    name: &'static str,
    kp: f64,
    kd: f64,
    ki: f64,
    min_output: f64,
    max_output: f64,
    integrator_min: f64,
    integrator_max: f64,
    nominal_dt: f64,
    integral: f64,
    previous_error: f64,
    previous_time: Option<DateTime<Utc>>,
}

impl PidController {
    pub fn new(name: &'static str, config: &PidConfig, nominal_dt: f64) -> Self {
        Self {
            name,
            kp: config.kp,
            kd: config.kd,
            ki: config.ki,
            min_output: config.min_output,
            max_output: config.max_output,
            integrator_min: config.integrator_min,
            integrator_max: config.integrator_max,
            nominal_dt,
            integral: 0.0,
            previous_error: 0.0,
            previous_time: None,
        }
    }

    pub fn integral(&self) -> f64 { self.integral }
    pub fn previous_error(&self) -> f64 { self.previous_error }

    pub fn reset(&mut self) {
        event!("PID {} reset (integral was {:.3})", self.name, self.integral);
        self.integral = 0.0;
        self.previous_error = 0.0;
        self.previous_time = None;
    }

    pub fn update(&mut self, setpoint: f64, measurement: f64, now: DateTime<Utc>) -> f64 {
        self.step(setpoint, measurement, now, true)
    }

    /// Same as [`PidController::update`], but neither accumulates nor applies
    /// the integral term. The held integral is kept for later updates.
    pub fn update_without_i(&mut self, setpoint: f64, measurement: f64, now: DateTime<Utc>) -> f64 {
        self.step(setpoint, measurement, now, false)
    }

    fn step(&mut self, setpoint: f64, measurement: f64, now: DateTime<Utc>, with_i: bool) -> f64 {
        let dt = self.elapsed(now);
        let error = setpoint - measurement;

        let mut output = self.kp * error;
        if with_i {
            self.integral = (self.integral + error * dt).clamp(self.integrator_min, self.integrator_max);
            output += self.ki * self.integral;
        }
        let derivative = (error - self.previous_error) / dt;
        output += self.kd * derivative;

        self.previous_error = error;
        self.previous_time = Some(now);
        output.clamp(self.min_output, self.max_output)
    }

    fn elapsed(&self, now: DateTime<Utc>) -> f64 {
        match self.previous_time {
            Some(previous) => {
                let dt = secs(now - previous);
                if dt > 0.0 { dt } else { self.nominal_dt }
            }
            None => self.nominal_dt,
        }
    }
}

#[cfg(test)]
mod tests;
