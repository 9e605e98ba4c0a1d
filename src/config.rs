use chrono::TimeDelta;
use std::env;
use std::fmt::Display as FmtDisplay;
use std::str::FromStr;
use strum_macros::Display;

/// Tuning parameters of the autopilot and its maneuver controllers.
#[derive(Debug, Clone, PartialEq)]
pub struct AutopilotConfig {
    /// How long take-off or landing may make no vertical progress before giving up.
    pub stuck_timeout: TimeDelta,
    /// Vertical speed (m/s) below which the ship counts as not moving.
    pub stuck_epsilon: f32,
    /// Outbound vertical speed requested during take-off.
    pub takeoff_target_velocity: f32,
    /// Fastest inbound vertical speed requested during landing (negative).
    pub landing_target_velocity: f32,
    /// Slowest inbound vertical speed requested during landing.
    pub landing_min_speed: f32,
    /// Divisor turning remaining altitude into a requested descent rate.
    pub landing_profile_divisor: f32,
    /// Speed error that maps to full thrust.
    pub smoothing_window: f32,
    /// Clearance above a location's inner radius after which take-off is done.
    pub arrival_buffer: f32,
    /// Arrival errors beyond this count as not having arrived at all.
    pub arrival_retry_error: f32,
    /// Arrival errors beyond this are reported as under- or overshoot.
    pub arrival_report_error: f32,
    pub spin_duration: TimeDelta,
    /// Angular rate (rad/s) of the free-spin bias.
    pub spin_rate: f32,
}

#[derive(Debug, Display)]
pub enum ConfigError {
    #[strum(to_string = "invalid value '{value}' for {var}")]
    InvalidValue { var: &'static str, value: String },
    #[strum(to_string = "value '{value}' for {var} is out of range, expected {expected}")]
    OutOfRange { var: &'static str, value: String, expected: String },
}

impl std::error::Error for ConfigError {}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            stuck_timeout: Self::STUCK_TIMEOUT,
            stuck_epsilon: 2.0,
            takeoff_target_velocity: 200.0,
            landing_target_velocity: -30.0,
            landing_min_speed: 5.0,
            landing_profile_divisor: 10.0,
            smoothing_window: 10.0,
            arrival_buffer: 100.0,
            arrival_retry_error: 100.0,
            arrival_report_error: 50.0,
            spin_duration: Self::SPIN_DURATION,
            spin_rate: 4.0,
        }
    }
}

impl AutopilotConfig {
    const STUCK_TIMEOUT: TimeDelta = TimeDelta::seconds(5);
    const SPIN_DURATION: TimeDelta = TimeDelta::seconds(3);

    const STUCK_TIMEOUT_VAR: &'static str = "AUTOPILOT_STUCK_TIMEOUT_MS";
    const STUCK_EPSILON_VAR: &'static str = "AUTOPILOT_STUCK_EPSILON";
    const TAKEOFF_VELOCITY_VAR: &'static str = "AUTOPILOT_TAKEOFF_VELOCITY";
    const LANDING_VELOCITY_VAR: &'static str = "AUTOPILOT_LANDING_VELOCITY";
    const SPIN_DURATION_VAR: &'static str = "AUTOPILOT_SPIN_DURATION_MS";

    /// Builds the default configuration and applies any environment overrides.
    ///
    /// # Returns
    /// - `Err(ConfigError)` if a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`.
    ///
    /// Values that parse but make no sense for the controllers, such as a negative
    /// duration or a landing speed below [`Self::landing_min_speed`], are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where F: Fn(&'static str) -> Option<String> {
        let mut config = Self::default();
        let positive_ms = |ms: &i64| *ms > 0;
        let positive = |v: &f32| v.is_finite() && *v > 0.0;

        if let Some(ms) = parse_checked(&lookup, Self::STUCK_TIMEOUT_VAR, positive_ms, "a positive duration")? {
            config.stuck_timeout = TimeDelta::milliseconds(ms);
        }
        if let Some(eps) = parse_checked(&lookup, Self::STUCK_EPSILON_VAR, positive, "a positive speed")? {
            config.stuck_epsilon = eps;
        }
        if let Some(vel) = parse_checked(&lookup, Self::TAKEOFF_VELOCITY_VAR, positive, "a positive speed")? {
            config.takeoff_target_velocity = vel;
        }
        let min_speed = config.landing_min_speed;
        let expected = format!("a speed of at least {min_speed} m/s");
        let landing = |v: &f32| v.is_finite() && v.abs() >= min_speed;
        if let Some(vel) = parse_checked(&lookup, Self::LANDING_VELOCITY_VAR, landing, &expected)? {
            // Landing speeds are inbound; accept either sign.
            config.landing_target_velocity = -vel.abs();
        }
        if let Some(ms) = parse_checked(&lookup, Self::SPIN_DURATION_VAR, positive_ms, "a positive duration")? {
            config.spin_duration = TimeDelta::milliseconds(ms);
        }
        Ok(config)
    }
}

fn parse_checked<T, F>(
    lookup: &F,
    var: &'static str,
    valid: impl Fn(&T) -> bool,
    expected: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr + FmtDisplay,
    F: Fn(&'static str) -> Option<String>,
{
    match parse_var::<T, F>(lookup, var)? {
        Some(value) if !valid(&value) => Err(ConfigError::OutOfRange {
            var,
            value: value.to_string(),
            expected: expected.to_string(),
        }),
        parsed => Ok(parsed),
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&'static str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}
