use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::params::Parameters;

/// Errors from reading, writing or validating presets.
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("preset I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed preset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parameter '{param}' out of range: {value}")]
    OutOfRange { param: &'static str, value: f64 },
}

/// A named parameter snapshot stored as JSON.
///
/// Missing parameters fall back to their defaults; values outside a
/// parameter's range are rejected rather than clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(default)]
    pub params: Parameters,
}

impl Preset {
    pub fn new(name: impl Into<String>, params: Parameters) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PresetError> {
        let preset: Preset = serde_json::from_str(json)?;
        preset.validate()?;
        Ok(preset)
    }

    pub fn to_json(&self) -> Result<String, PresetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let path = path.as_ref();
        let preset = Self::from_json(&fs::read_to_string(path)?)?;
        log::info!("loaded preset '{}' from {}", preset.name, path.display());
        Ok(preset)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PresetError> {
        self.validate()?;
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), PresetError> {
        match self.params.first_out_of_range() {
            Some((id, value)) => Err(PresetError::OutOfRange {
                param: id.id(),
                value,
            }),
            None => Ok(()),
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Init", Parameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::TremoloShape;

    #[test]
    fn test_json_uses_parameter_ids() {
        let json = Preset::default().to_json().unwrap();
        for key in ["\"tremRate\"", "\"xoverFreq\"", "\"tremZero\"", "\"gain\""] {
            assert!(json.contains(key), "missing {key} in {json}");
        }
    }

    #[test]
    fn test_partial_preset_fills_defaults() {
        let preset = Preset::from_json(
            r#"{ "name": "Slow swirl", "params": { "tremRate": 0.8, "tremShape": "Sawtooth" } }"#,
        )
        .unwrap();

        assert_eq!(preset.name, "Slow swirl");
        assert_eq!(preset.params.tremolo_rate, 0.8);
        assert_eq!(preset.params.tremolo_shape, TremoloShape::Sawtooth);
        assert_eq!(preset.params.crossover_frequency, 1_500.0);
    }

    #[test]
    fn test_out_of_range_value_is_rejected() {
        let err = Preset::from_json(r#"{ "name": "Loud", "params": { "gain": 40.0 } }"#)
            .unwrap_err();

        match err {
            PresetError::OutOfRange { param, value } => {
                assert_eq!(param, "gain");
                assert_eq!(value, 40.0);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let err = Preset::from_json("{ not json").unwrap_err();
        assert!(matches!(err, PresetError::Json(_)));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "hyper_tremolo_preset_{}.json",
            std::process::id()
        ));
        let params = Parameters {
            tremolo_ratio: 2.0,
            through_zero: true,
            ..Parameters::default()
        };
        let preset = Preset::new("Doubled", params);

        preset.save(&path).unwrap();
        let loaded = Preset::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, preset);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Preset::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, PresetError::Io(_)));
    }
}
