//! Embedded sample scenario.

use mirage_core::CrimeScenario;
use mirage_error::ScenarioError;

/// The Harrowgate Manor poisoning, shipped with the binary so `mirage
/// run` works with no files on disk.
pub const HARROWGATE_TOML: &str = include_str!("../scenarios/harrowgate.toml");

/// Parses and validates the embedded sample scenario.
///
/// # Errors
///
/// Only if the shipped TOML is broken, which the test suite pins against.
pub fn harrowgate() -> Result<CrimeScenario, ScenarioError> {
    let scenario = CrimeScenario::from_toml_str(HARROWGATE_TOML)?;
    if let Some(first) = scenario.validate().errors.into_iter().next() {
        return Err(ScenarioError::new(first));
    }
    Ok(scenario)
}
