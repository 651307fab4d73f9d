use thiserror::Error;

/// Errors raised by the scoring layer.
///
/// `score()` itself cannot fail: once a `Scorer` exists its tables have been
/// validated. Everything here is either a model/table mismatch or a caller
/// naming a feature the model does not know.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScoringError {
    /// The statistics and coefficient tables are inconsistent. Carries every
    /// problem found, not just the first.
    #[error("invalid model configuration:\n  - {}", .0.join("\n  - "))]
    Configuration(Vec<String>),

    #[error("unknown feature '{0}'")]
    UnknownFeature(String),

    #[error("invalid assignment '{0}': expected NAME=VALUE")]
    InvalidAssignment(String),
}
