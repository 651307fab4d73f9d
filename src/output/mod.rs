pub mod formatter;

pub use formatter::{
    format_breakdown, format_contribution, format_feature_catalogue, format_json,
    format_probability, format_summary, format_tsv, should_use_colors,
};
