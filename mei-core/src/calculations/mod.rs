//! Pure calculators for the simulation pipeline.
//!
//! Each stage takes a snapshot of its inputs plus the [`TaxRules`] in force
//! and returns a fresh value. None of them mutate stored records.
//!
//! [`TaxRules`]: crate::TaxRules

pub mod bracket_engine;
pub mod common;
pub mod deductions;
pub mod documents;
pub mod other_income;
pub mod pipeline;
pub mod validation;
pub mod what_if;

pub use bracket_engine::BracketEngine;
pub use deductions::DeductionCalculator;
pub use documents::{BrazilianDocuments, DocumentKind, DocumentValidator};
pub use other_income::summarize_other_income;
pub use pipeline::{recalculate, run_pipeline, PipelineOutput};
pub use validation::{
    completion_progress, CheckKind, CheckResult, Severity, ValidationProjector, ValidationReport,
};
pub use what_if::{apply_overlay, Overlaid};
