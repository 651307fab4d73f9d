pub mod config;
pub mod engine;
pub mod error;
pub mod explain;
pub mod features;
pub mod validation;

pub use config::*;
pub use engine::{sigmoid, ScoreResult, Scorer};
pub use error::ScoringError;
pub use explain::{rank_contributions, RankedContribution, RiskBand};
pub use features::{label_for, parse_assignment, Feature, FeatureGroup};
pub use validation::{validate_model, validate_tables};
