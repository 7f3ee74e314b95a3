//! Revenue, expense and asset collections.
//!
//! The ledger owns every entry. Entries are immutable once created; the only
//! mutation besides appending is deletion by id. Insertion order is kept for
//! display and has no effect on totals.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{clamp_non_negative, round_half_up};
use crate::models::{
    AssetEntry, AssetSummary, AssetUse, DepreciationSchedule, EntryId, EntryKind,
    ExpenseCategory, ExpenseEntry, NewAssetEntry, NewExpenseEntry, NewRevenueEntry,
    RevenueCategory, RevenueEntry, TaxRules,
};

/// Reasons a submitted entry is rejected. No entry is created on error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("revenue source is required")]
    MissingSource,

    #[error("expense description is required")]
    MissingDescription,

    #[error("asset name is required")]
    MissingName,

    #[error("amount must be a positive number, got {0}")]
    InvalidAmount(Decimal),

    #[error("date is required")]
    MissingDate,

    #[error("asset use is required")]
    MissingUse,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ledger {
    revenues: Vec<RevenueEntry>,
    expenses: Vec<ExpenseEntry>,
    depreciation: Vec<DepreciationSchedule>,
    assets: Vec<AssetEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revenues(&self) -> &[RevenueEntry] {
        &self.revenues
    }

    pub fn expenses(&self) -> &[ExpenseEntry] {
        &self.expenses
    }

    pub fn depreciation(&self) -> &[DepreciationSchedule] {
        &self.depreciation
    }

    pub fn assets(&self) -> &[AssetEntry] {
        &self.assets
    }

    /// Validates and appends a revenue entry.
    ///
    /// # Errors
    ///
    /// [`EntryError::MissingSource`], [`EntryError::InvalidAmount`] or
    /// [`EntryError::MissingDate`].
    pub fn add_revenue(&mut self, entry: NewRevenueEntry) -> Result<EntryId, EntryError> {
        let source = entry.source.trim();
        if source.is_empty() {
            return Err(EntryError::MissingSource);
        }
        check_amount(entry.amount)?;
        let date = entry.date.ok_or(EntryError::MissingDate)?;

        let id = self.next_id();
        self.revenues.push(RevenueEntry {
            id,
            source: source.to_string(),
            amount: entry.amount,
            category: entry.category,
            date,
            invoice_note: non_blank(entry.invoice_note),
        });
        debug!(id, "revenue added");
        Ok(id)
    }

    /// Validates and appends an expense entry, deriving a depreciation
    /// schedule when `depreciation_life_years > 0`.
    ///
    /// A life missing from the rules' rate table yields a schedule with zero
    /// annual depreciation rather than an error.
    ///
    /// # Errors
    ///
    /// [`EntryError::MissingDescription`], [`EntryError::InvalidAmount`] or
    /// [`EntryError::MissingDate`].
    pub fn add_expense(
        &mut self,
        entry: NewExpenseEntry,
        rules: &TaxRules,
    ) -> Result<EntryId, EntryError> {
        let description = entry.description.trim();
        if description.is_empty() {
            return Err(EntryError::MissingDescription);
        }
        check_amount(entry.amount)?;
        let date = entry.date.ok_or(EntryError::MissingDate)?;

        let id = self.next_id();
        let expense = ExpenseEntry {
            id,
            description: description.to_string(),
            amount: entry.amount,
            category: entry.category,
            date,
            note: non_blank(entry.note),
            depreciation_life_years: entry.depreciation_life_years,
        };

        if expense.depreciation_life_years > 0 {
            self.depreciation.push(schedule_for(&expense, rules));
        }
        self.expenses.push(expense);
        debug!(id, "expense added");
        Ok(id)
    }

    /// Validates and appends an asset entry.
    ///
    /// # Errors
    ///
    /// [`EntryError::MissingName`], [`EntryError::InvalidAmount`],
    /// [`EntryError::MissingDate`] or [`EntryError::MissingUse`].
    pub fn add_asset(&mut self, entry: NewAssetEntry) -> Result<EntryId, EntryError> {
        let name = entry.name.trim();
        if name.is_empty() {
            return Err(EntryError::MissingName);
        }
        check_amount(entry.amount)?;
        let acquisition_date = entry.acquisition_date.ok_or(EntryError::MissingDate)?;
        let asset_use = entry.asset_use.ok_or(EntryError::MissingUse)?;

        let id = self.next_id();
        self.assets.push(AssetEntry {
            id,
            name: name.to_string(),
            amount: entry.amount,
            acquisition_date,
            asset_use,
        });
        debug!(id, "asset added");
        Ok(id)
    }

    /// Removes an entry by id. Deleting an expense also drops its
    /// depreciation schedule. Returns `false` when nothing matched.
    pub fn delete_entry(&mut self, id: EntryId, kind: EntryKind) -> bool {
        let removed = match kind {
            EntryKind::Revenue => remove_by(&mut self.revenues, |r| r.id == id),
            EntryKind::Expense => {
                self.depreciation.retain(|d| d.source_expense_id != id);
                remove_by(&mut self.expenses, |e| e.id == id)
            }
            EntryKind::Asset => remove_by(&mut self.assets, |a| a.id == id),
        };

        if !removed {
            debug!(id, kind = kind.as_str(), "delete ignored; no such entry");
        }
        removed
    }

    // Totals floor each stored amount at zero. Entries restored from a
    // snapshot never went through `check_amount`.

    pub fn total_revenue(&self) -> Decimal {
        self.revenues
            .iter()
            .map(|r| clamp_non_negative("revenue.amount", r.amount))
            .sum()
    }

    pub fn total_expenses(&self) -> Decimal {
        self.expenses
            .iter()
            .map(|e| clamp_non_negative("expense.amount", e.amount))
            .sum()
    }

    pub fn total_assets(&self) -> Decimal {
        self.assets
            .iter()
            .map(|a| clamp_non_negative("asset.amount", a.amount))
            .sum()
    }

    pub fn total_annual_depreciation(&self) -> Decimal {
        self.depreciation
            .iter()
            .map(|d| clamp_non_negative("depreciation.annual", d.annual_depreciation))
            .sum()
    }

    /// Expense totals per category, in order of first occurrence.
    pub fn expenses_by_category(&self) -> Vec<(ExpenseCategory, Decimal)> {
        group_totals(
            self.expenses
                .iter()
                .map(|e| (&e.category, clamp_non_negative("expense.amount", e.amount))),
        )
    }

    /// Revenue totals per category, in order of first occurrence.
    pub fn revenues_by_category(&self) -> Vec<(RevenueCategory, Decimal)> {
        group_totals(
            self.revenues
                .iter()
                .map(|r| (&r.category, clamp_non_negative("revenue.amount", r.amount))),
        )
    }

    /// Counts and totals the asset list.
    ///
    /// With `mixed_use_half_weight` a mixed-use asset adds one half to each of
    /// the professional and personal counts. Without it a mixed-use asset
    /// counts fully as professional.
    pub fn asset_summary(&self, mixed_use_half_weight: bool) -> AssetSummary {
        let half = Decimal::new(5, 1);
        let mut summary = AssetSummary {
            count: self.assets.len(),
            total_value: self.total_assets(),
            ..AssetSummary::default()
        };

        for asset in &self.assets {
            match &asset.asset_use {
                AssetUse::Professional => summary.professional_count += Decimal::ONE,
                AssetUse::Personal => summary.personal_count += Decimal::ONE,
                AssetUse::Mixed if mixed_use_half_weight => {
                    summary.professional_count += half;
                    summary.personal_count += half;
                }
                AssetUse::Mixed => summary.professional_count += Decimal::ONE,
                AssetUse::Unrecognized(raw) => {
                    warn!(id = asset.id, asset_use = %raw, "unrecognised asset use; not counted");
                }
            }
        }

        summary
    }

    /// Next creation-time id, bumped past any id already in use.
    fn next_id(&self) -> EntryId {
        let highest = self
            .revenues
            .iter()
            .map(|r| r.id)
            .chain(self.expenses.iter().map(|e| e.id))
            .chain(self.assets.iter().map(|a| a.id))
            .max()
            .unwrap_or(0);

        Utc::now().timestamp_millis().max(highest + 1)
    }
}

fn check_amount(amount: Decimal) -> Result<(), EntryError> {
    if amount <= Decimal::ZERO {
        return Err(EntryError::InvalidAmount(amount));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn remove_by<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !matches(item));
    items.len() != before
}

fn group_totals<'a, K>(items: impl Iterator<Item = (&'a K, Decimal)>) -> Vec<(K, Decimal)>
where
    K: Clone + PartialEq + 'a,
{
    let mut totals: Vec<(K, Decimal)> = Vec::new();
    for (key, amount) in items {
        match totals.iter_mut().find(|(k, _)| k == key) {
            Some((_, total)) => *total += amount,
            None => totals.push((key.clone(), amount)),
        }
    }
    totals
}

fn schedule_for(expense: &ExpenseEntry, rules: &TaxRules) -> DepreciationSchedule {
    let life_years = expense.depreciation_life_years;
    let rate = rules.depreciation_rate(life_years).unwrap_or_else(|| {
        warn!(
            id = expense.id,
            life_years, "unsupported depreciation life; no depreciation applied"
        );
        Decimal::ZERO
    });

    DepreciationSchedule {
        source_expense_id: expense.id,
        life_years,
        rate,
        annual_depreciation: round_half_up(expense.amount * rate),
        remaining_years: life_years.saturating_sub(1),
    }
}
