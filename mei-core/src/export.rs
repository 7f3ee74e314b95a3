//! Read-only exports. Neither format is ever read back in.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::PipelineOutput;
use crate::models::{FilingStatus, Identification, OrganizerState, SimulationResult};

pub const SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize export: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Flattened headline figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub revenue_total: Decimal,
    pub expense_total: Decimal,
    pub mei_profit: Decimal,
    pub other_income_total: Decimal,
    pub total_deductions: Decimal,
    pub taxable_base: Decimal,
    pub tax_due: Decimal,
    pub effective_rate: Decimal,
    pub filing_status: FilingStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub identification: Identification,
    pub simulation: SimulationResult,
    pub summary: ExportSummary,
}

impl SimulationSnapshot {
    pub fn new(
        state: &OrganizerState,
        output: &PipelineOutput,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let simulation = &output.simulation;
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at,
            identification: state.identification.clone(),
            simulation: simulation.clone(),
            summary: ExportSummary {
                revenue_total: output.revenue_total,
                expense_total: output.expense_total,
                mei_profit: output.mei_profit,
                other_income_total: output.other_income.total,
                total_deductions: simulation.total_deductions,
                taxable_base: simulation.taxable_base,
                tax_due: simulation.tax_due,
                effective_rate: simulation.effective_rate,
                filing_status: simulation.filing_status,
            },
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The entire state tree, unfiltered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullBackup {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub state: OrganizerState,
}

impl FullBackup {
    pub fn new(state: &OrganizerState, generated_at: DateTime<Utc>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at,
            state: state.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
