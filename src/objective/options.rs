//! Evaluation options for the space-time objective.
use crate::spacetime::errors::SpaceTimeError;
use std::str::FromStr;

/// Choice of GMRF evaluator used for the objective value.
///
/// Variants:
/// - `Factored`: network factorisation, `log|Q| = -sum ln v_n`.
/// - `Cholesky`: sparse Cholesky of the assembled `Q`.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"factored"`, `"cholesky"`). Unknown names return
/// `SpaceTimeError::UnknownBackend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GmrfBackend {
    #[default]
    Factored,
    Cholesky,
}

impl FromStr for GmrfBackend {
    type Err = SpaceTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "factored" => Ok(GmrfBackend::Factored),
            "cholesky" => Ok(GmrfBackend::Cholesky),
            _ => Err(SpaceTimeError::UnknownBackend { name: s.to_string() }),
        }
    }
}

/// Objective-level configuration.
///
/// Fields:
/// - `backend: GmrfBackend`: evaluator for the GMRF terms of the value.
/// - `validate_effects: bool`: if `true`, reject non-finite random effects
///   with `SpaceTimeError::NonFiniteEffect` before evaluating.
///
/// Default:
/// - `backend`: `Factored`
/// - `validate_effects`: `true`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    pub backend: GmrfBackend,
    pub validate_effects: bool,
}

impl EvalOptions {
    pub fn new(backend: GmrfBackend, validate_effects: bool) -> Self {
        EvalOptions { backend, validate_effects }
    }
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions { backend: GmrfBackend::Factored, validate_effects: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify case-insensitive backend parsing and the defaults.
    //
    // Expect
    // ------
    // - "Cholesky" and "FACTORED" parse; "dense" is `UnknownBackend`.
    fn backend_parses_case_insensitively() {
        assert_eq!("Cholesky".parse::<GmrfBackend>().unwrap(), GmrfBackend::Cholesky);
        assert_eq!("FACTORED".parse::<GmrfBackend>().unwrap(), GmrfBackend::Factored);
        assert_eq!(
            "dense".parse::<GmrfBackend>().unwrap_err(),
            SpaceTimeError::UnknownBackend { name: "dense".to_string() }
        );
        let opts = EvalOptions::default();
        assert_eq!(opts.backend, GmrfBackend::Factored);
        assert!(opts.validate_effects);
    }
}
