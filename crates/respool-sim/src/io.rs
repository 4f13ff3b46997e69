//! Scenario persistence (load/save).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SimError;
use crate::frames::FrameScenario;
use crate::stress::StressScenario;

/// A scenario file: either kind of run, tagged by `mode`.
///
/// ```json
/// { "mode": "stress", "workers": 8, "pool": { "initial": 4, "max_capacity": 16 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Scenario {
    /// Frame-driven run.
    Frames(FrameScenario),
    /// Multi-threaded stress run.
    Stress(StressScenario),
}

impl Scenario {
    /// Check that the scenario can run.
    pub fn validate(&self) -> Result<(), SimError> {
        match self {
            Self::Frames(s) => s.validate(),
            Self::Stress(s) => s.validate(),
        }
    }
}

/// Load and validate a scenario from a JSON file.
pub fn load_scenario(path: &Path) -> Result<Scenario, SimError> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_json::from_str(&content)?;
    scenario.validate()?;
    debug!(path = %path.display(), "Scenario loaded");
    Ok(scenario)
}

/// Save a scenario as pretty-printed JSON.
pub fn save_scenario(scenario: &Scenario, path: &Path) -> Result<(), SimError> {
    let content = serde_json::to_string_pretty(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use respool_core::PoolConfig;

    use super::*;
    use crate::effect::EffectKind;

    #[test]
    fn save_then_load_preserves_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.json");
        let scenario = Scenario::Frames(FrameScenario {
            kind: EffectKind::Rope,
            clear_at: Some(10),
            ..FrameScenario::default()
        });
        save_scenario(&scenario, &path).unwrap();
        assert_eq!(load_scenario(&path).unwrap(), scenario);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stress.json");
        std::fs::write(
            &path,
            r#"{ "mode": "stress", "workers": 8, "pool": { "max_capacity": 16 } }"#,
        )
        .unwrap();

        let Scenario::Stress(s) = load_scenario(&path).unwrap() else {
            panic!("expected a stress scenario");
        };
        assert_eq!(s.workers, 8);
        assert_eq!(s.iterations, StressScenario::default().iterations);
        assert_eq!(s.pool, PoolConfig::new(PoolConfig::default().initial, 16));
    }

    #[test]
    fn invalid_pool_in_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{ "mode": "frames", "pool": { "initial": 9, "max_capacity": 3 } }"#,
        )
        .unwrap();
        assert!(matches!(load_scenario(&path), Err(SimError::Pool(_))));
    }

    #[test]
    fn unknown_mode_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.json");
        std::fs::write(&path, r#"{ "mode": "chaos" }"#).unwrap();
        assert!(matches!(load_scenario(&path), Err(SimError::Json(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_scenario(Path::new("/nonexistent/respool/scenario.json")).unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
