use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest accepted march step or precision (meters).
pub const MIN_STEP_M: f64 = 0.01;

/// Tuning for terrain resolution during a drag.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DragConfig {
    /// Terrain queries run only while the eye is below
    /// `max_elevation * near_surface_factor`.
    pub near_surface_factor: f64,
    /// Initial step of the elevation march (meters).
    pub sample_length_m: f64,
    /// Step at which the elevation march stops refining (meters).
    pub precision_m: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            near_surface_factor: 10.0,
            sample_length_m: 200.0,
            precision_m: 20.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse drag config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be at least {min} m, got {value}")]
    StepTooSmall {
        field: &'static str,
        value: f64,
        min: f64,
    },
    #[error("precision_m ({precision}) exceeds sample_length_m ({sample_length})")]
    PrecisionExceedsSample { precision: f64, sample_length: f64 },
}

impl DragConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("near_surface_factor", self.near_surface_factor),
            ("sample_length_m", self.sample_length_m),
            ("precision_m", self.precision_m),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        for (field, value) in [
            ("sample_length_m", self.sample_length_m),
            ("precision_m", self.precision_m),
        ] {
            if value < MIN_STEP_M {
                return Err(ConfigError::StepTooSmall {
                    field,
                    value,
                    min: MIN_STEP_M,
                });
            }
        }
        if self.precision_m > self.sample_length_m {
            return Err(ConfigError::PrecisionExceedsSample {
                precision: self.precision_m,
                sample_length: self.sample_length_m,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DragConfig};
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_reference_tuning() {
        let config = DragConfig::default();
        assert_eq!(config.near_surface_factor, 10.0);
        assert_eq!(config.sample_length_m, 200.0);
        assert_eq!(config.precision_m, 20.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = DragConfig::from_json_str(r#"{"precision_m": 5}"#).expect("config");
        assert_eq!(
            config,
            DragConfig {
                precision_m: 5.0,
                ..DragConfig::default()
            }
        );
    }

    #[test]
    fn rejects_unknown_fields_and_bad_values() {
        assert!(matches!(
            DragConfig::from_json_str(r#"{"samples": 3}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            DragConfig::from_json_str(r#"{"sample_length_m": 0}"#),
            Err(ConfigError::NotPositive {
                field: "sample_length_m",
                ..
            })
        ));
        assert!(matches!(
            DragConfig::from_json_str(r#"{"sample_length_m": 10, "precision_m": 50}"#),
            Err(ConfigError::PrecisionExceedsSample { .. })
        ));
    }

    #[test]
    fn micrometer_steps_are_rejected() {
        assert!(matches!(
            DragConfig::from_json_str(r#"{"sample_length_m": 1e-6, "precision_m": 1e-6}"#),
            Err(ConfigError::StepTooSmall {
                field: "sample_length_m",
                ..
            })
        ));
        assert!(matches!(
            DragConfig::from_json_str(r#"{"precision_m": 0.001}"#),
            Err(ConfigError::StepTooSmall {
                field: "precision_m",
                ..
            })
        ));
        assert!(DragConfig::from_json_str(r#"{"sample_length_m": 0.01, "precision_m": 0.01}"#).is_ok());
    }
}
