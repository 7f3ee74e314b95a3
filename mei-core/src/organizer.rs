//! The orchestrator that owns the state tree.
//!
//! Every mutating call re-runs the whole pipeline before returning, so
//! [`Organizer::simulation`] is always current. Persistence is explicit:
//! callers decide when to [`Organizer::persist`].

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::calculations::{
    run_pipeline, BrazilianDocuments, DocumentValidator, PipelineOutput, ValidationProjector,
    ValidationReport,
};
use crate::export::{FullBackup, SimulationSnapshot};
use crate::ledger::EntryError;
use crate::models::{
    Activity, AddressBook, AssetSummary, DeductionInputs, EntryId, EntryKind, Identification,
    NewAssetEntry, NewExpenseEntry, NewRevenueEntry, OrganizerState, OtherIncomeInputs,
    SimulationResult, TaxRules, TaxRulesError, WhatIfScenario,
};
use crate::store::{RepositoryError, StateRepository};

pub struct Organizer {
    rules: TaxRules,
    state: OrganizerState,
    output: PipelineOutput,
    documents: Box<dyn DocumentValidator>,
}

impl Organizer {
    /// Starts from an empty state.
    ///
    /// # Errors
    ///
    /// Returns the first problem [`TaxRules::validate`] finds.
    pub fn new(rules: TaxRules) -> Result<Self, TaxRulesError> {
        Self::with_state(rules, OrganizerState::default())
    }

    /// Adopts an existing state, discarding its cached simulation.
    pub fn with_state(rules: TaxRules, state: OrganizerState) -> Result<Self, TaxRulesError> {
        rules.validate()?;
        let mut organizer = Self {
            rules,
            state,
            output: PipelineOutput::default(),
            documents: Box::new(BrazilianDocuments),
        };
        organizer.recalculate();
        Ok(organizer)
    }

    pub fn with_document_validator(mut self, documents: Box<dyn DocumentValidator>) -> Self {
        self.documents = documents;
        self
    }

    /// Loads the last snapshot from `repo` and recomputes it.
    ///
    /// A missing or unreadable snapshot yields a fresh state; read errors
    /// are logged, never returned.
    pub async fn restore(
        rules: TaxRules,
        repo: &dyn StateRepository,
    ) -> Result<Self, TaxRulesError> {
        let state = match repo.load().await {
            Ok(Some(state)) => {
                info!("state restored");
                state
            }
            Ok(None) => {
                debug!("no saved state; starting fresh");
                OrganizerState::default()
            }
            Err(e) => {
                error!(error = %e, "failed to load state; starting fresh");
                OrganizerState::default()
            }
        };
        Self::with_state(rules, state)
    }

    /// Saves the whole state. Failures are logged and reported as `false`;
    /// the in-memory state stays authoritative either way.
    pub async fn persist(&self, repo: &dyn StateRepository) -> bool {
        match repo.save(&self.state).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "failed to save state");
                false
            }
        }
    }

    /// Resets to an empty state and clears the store.
    pub async fn clear(&mut self, repo: &dyn StateRepository) -> Result<(), RepositoryError> {
        self.state = OrganizerState::default();
        self.recalculate();
        repo.clear().await?;
        info!("all data cleared");
        Ok(())
    }

    pub fn rules(&self) -> &TaxRules {
        &self.rules
    }

    pub fn state(&self) -> &OrganizerState {
        &self.state
    }

    pub fn output(&self) -> &PipelineOutput {
        &self.output
    }

    pub fn simulation(&self) -> &SimulationResult {
        &self.output.simulation
    }

    // ── ledger ───────────────────────────────────────────────────────────

    pub fn add_revenue(&mut self, entry: NewRevenueEntry) -> Result<EntryId, EntryError> {
        let id = self.state.ledger.add_revenue(entry)?;
        self.recalculate();
        Ok(id)
    }

    pub fn add_expense(&mut self, entry: NewExpenseEntry) -> Result<EntryId, EntryError> {
        let id = self.state.ledger.add_expense(entry, &self.rules)?;
        self.recalculate();
        Ok(id)
    }

    pub fn add_asset(&mut self, entry: NewAssetEntry) -> Result<EntryId, EntryError> {
        let id = self.state.ledger.add_asset(entry)?;
        self.recalculate();
        Ok(id)
    }

    pub fn delete_entry(&mut self, id: EntryId, kind: EntryKind) -> bool {
        let removed = self.state.ledger.delete_entry(id, kind);
        if removed {
            self.recalculate();
        }
        removed
    }

    pub fn asset_summary(&self) -> AssetSummary {
        self.state
            .ledger
            .asset_summary(self.rules.mixed_use_half_weight)
    }

    // ── profile and inputs ───────────────────────────────────────────────

    pub fn set_identification(&mut self, identification: Identification) {
        self.state.identification = identification;
        self.recalculate();
    }

    pub fn set_address(&mut self, address: AddressBook) {
        self.state.address = address;
        self.recalculate();
    }

    pub fn set_same_address(&mut self, same: bool) {
        self.state.address.set_same_address(same);
        self.recalculate();
    }

    pub fn set_activity(&mut self, activity: Activity) {
        self.state.activity = activity;
        self.recalculate();
    }

    pub fn set_other_income(&mut self, other_income: OtherIncomeInputs) {
        self.state.other_income = other_income;
        self.recalculate();
    }

    pub fn set_deductions(&mut self, deductions: DeductionInputs) {
        self.state.deductions = deductions;
        self.recalculate();
    }

    /// Stored verbatim; the organizer attaches no meaning to it.
    pub fn set_current_section(&mut self, section: impl Into<String>) {
        self.state.current_section = section.into();
    }

    // ── what-if ──────────────────────────────────────────────────────────

    pub fn apply_what_if(&mut self, scenario: WhatIfScenario) {
        if !scenario.active {
            warn!("inactive what-if scenario applied; it has no effect");
        }
        self.state.what_if = scenario;
        self.recalculate();
    }

    /// Turns the overlay off and zeroes its deltas.
    pub fn deactivate_what_if(&mut self) {
        self.state.what_if.deactivate();
        self.recalculate();
    }

    // ── projections ──────────────────────────────────────────────────────

    pub fn validations(&self) -> ValidationReport {
        ValidationProjector::new(&self.rules, self.documents.as_ref())
            .project(&self.state, &self.output)
    }

    pub fn simulation_snapshot(&self, generated_at: DateTime<Utc>) -> SimulationSnapshot {
        SimulationSnapshot::new(&self.state, &self.output, generated_at)
    }

    pub fn full_backup(&self, generated_at: DateTime<Utc>) -> FullBackup {
        FullBackup::new(&self.state, generated_at)
    }

    fn recalculate(&mut self) {
        self.output = run_pipeline(&self.state, &self.rules);
        self.state.simulation = Some(self.output.simulation.clone());
    }
}
