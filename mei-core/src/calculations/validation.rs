//! Named checks over the current state and the latest pipeline output.
//!
//! Every check yields a [`CheckResult`] with a severity and a short
//! Portuguese message. Amounts are left as plain decimals; currency
//! formatting belongs to the renderer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::common::round_half_up;
use super::documents::{clean_digits, DocumentKind, DocumentValidator};
use super::pipeline::PipelineOutput;
use crate::models::{Address, FilingStatus, OrganizerState, TaxRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    RevenueLimit,
    FilingStatus,
    Documents,
    DeductionLimits,
    RequiredFields,
    Address,
    Transactions,
}

impl CheckKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::RevenueLimit => "Limite de Faturamento",
            Self::FilingStatus => "Obrigatoriedade da Declaração",
            Self::Documents => "Documentos",
            Self::DeductionLimits => "Limites de Dedução",
            Self::RequiredFields => "Campos Obrigatórios",
            Self::Address => "Endereços",
            Self::Transactions => "Movimentações",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub kind: CheckKind,
    pub severity: Severity,
    pub message: String,
}

impl CheckResult {
    fn new(kind: CheckKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub checks: Vec<CheckResult>,
    /// Share of required profile fields filled, 0 to 100.
    pub progress: u32,
}

impl ValidationReport {
    pub fn check(&self, kind: CheckKind) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.kind == kind)
    }

    pub fn worst(&self) -> Severity {
        self.checks
            .iter()
            .map(|c| c.severity)
            .max()
            .unwrap_or(Severity::Success)
    }

    pub fn has_errors(&self) -> bool {
        self.worst() == Severity::Error
    }
}

pub struct ValidationProjector<'a> {
    rules: &'a TaxRules,
    documents: &'a dyn DocumentValidator,
}

impl<'a> ValidationProjector<'a> {
    pub fn new(rules: &'a TaxRules, documents: &'a dyn DocumentValidator) -> Self {
        Self { rules, documents }
    }

    pub fn project(
        &self,
        state: &OrganizerState,
        output: &PipelineOutput,
    ) -> ValidationReport {
        ValidationReport {
            checks: vec![
                self.revenue_limit(output.revenue_total),
                self.filing_status(output),
                self.documents(state),
                self.deduction_limits(state, output),
                self.required_fields(state),
                self.address(state),
                self.transactions(state),
            ],
            progress: completion_progress(state),
        }
    }

    /// Over the ceiling is an error; from the near-limit share up it is a warning.
    pub fn revenue_limit(
        &self,
        revenue_total: Decimal,
    ) -> CheckResult {
        let ceiling = self.rules.mei_revenue_ceiling;
        let near = round_half_up(ceiling * self.rules.near_limit_ratio);

        if revenue_total > ceiling {
            warn!(%revenue_total, %ceiling, "revenue exceeds the MEI ceiling");
            CheckResult::new(
                CheckKind::RevenueLimit,
                Severity::Error,
                format!("Limite ultrapassado: {revenue_total} de {ceiling}"),
            )
        } else if revenue_total >= near && !ceiling.is_zero() {
            CheckResult::new(
                CheckKind::RevenueLimit,
                Severity::Warning,
                format!("Próximo do limite: {revenue_total} de {ceiling}"),
            )
        } else {
            CheckResult::new(
                CheckKind::RevenueLimit,
                Severity::Success,
                format!("Dentro do limite: {revenue_total} de {ceiling}"),
            )
        }
    }

    fn filing_status(
        &self,
        output: &PipelineOutput,
    ) -> CheckResult {
        let simulation = &output.simulation;
        let severity = match simulation.filing_status {
            FilingStatus::NotTaxable => Severity::Success,
            FilingStatus::Exempt | FilingStatus::Taxable => Severity::Warning,
        };
        let message = match simulation.filing_status {
            FilingStatus::Taxable => format!(
                "{}: {}",
                simulation.filing_status.to_long_str(),
                simulation.tax_due
            ),
            status => status.to_long_str().to_string(),
        };

        CheckResult::new(CheckKind::FilingStatus, severity, message)
    }

    fn documents(
        &self,
        state: &OrganizerState,
    ) -> CheckResult {
        let mut missing = Vec::new();
        let mut invalid = Vec::new();

        for (kind, raw) in [
            (DocumentKind::Cpf, &state.identification.cpf),
            (DocumentKind::Cnpj, &state.identification.cnpj),
        ] {
            let digits = clean_digits(raw);
            if digits.is_empty() {
                missing.push(kind.label());
            } else if !self.documents.is_valid(kind, &digits) {
                invalid.push(kind.label());
            }
        }

        if !invalid.is_empty() {
            CheckResult::new(
                CheckKind::Documents,
                Severity::Error,
                format!("Inválido: {}", invalid.join(", ")),
            )
        } else if !missing.is_empty() {
            CheckResult::new(
                CheckKind::Documents,
                Severity::Warning,
                format!("Não informado: {}", missing.join(", ")),
            )
        } else {
            CheckResult::new(CheckKind::Documents, Severity::Success, "CPF e CNPJ válidos")
        }
    }

    /// The private-pension ceiling is only enforced here, never in the
    /// deduction total.
    fn deduction_limits(
        &self,
        state: &OrganizerState,
        output: &PipelineOutput,
    ) -> CheckResult {
        let mut issues = Vec::new();

        let private = state.deductions.pension.private;
        let pension_cap =
            round_half_up(output.simulation.taxable_base * self.rules.private_pension_cap_ratio);
        if private > pension_cap {
            issues.push(format!("Previdência privada {private} acima do limite de {pension_cap}"));
        }

        let deductions = &output.deductions;
        if deductions.education_uncapped > deductions.education {
            issues.push(format!(
                "Educação {} limitada a {}",
                deductions.education_uncapped, deductions.education
            ));
        }

        if issues.is_empty() {
            CheckResult::new(
                CheckKind::DeductionLimits,
                Severity::Success,
                "Deduções dentro dos limites",
            )
        } else {
            CheckResult::new(CheckKind::DeductionLimits, Severity::Warning, issues.join("; "))
        }
    }

    fn required_fields(
        &self,
        state: &OrganizerState,
    ) -> CheckResult {
        let id = &state.identification;
        let missing: Vec<&str> = [
            ("Nome", &id.name),
            ("CPF", &id.cpf),
            ("CNPJ", &id.cnpj),
            ("Ano Fiscal", &id.fiscal_year),
            ("Data de Abertura", &id.opening_date),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect();

        if missing.is_empty() {
            CheckResult::new(
                CheckKind::RequiredFields,
                Severity::Success,
                "Todos os campos obrigatórios preenchidos",
            )
        } else {
            CheckResult::new(
                CheckKind::RequiredFields,
                Severity::Error,
                format!("{} campo(s) faltando: {}", missing.len(), missing.join(", ")),
            )
        }
    }

    fn address(
        &self,
        state: &OrganizerState,
    ) -> CheckResult {
        let book = &state.address;
        let mut incomplete = Vec::new();

        if !book.residential.is_complete() {
            incomplete.push("residencial");
        }
        if !book.same_address && !book.fiscal.as_ref().is_some_and(Address::is_complete) {
            incomplete.push("fiscal");
        }

        match (incomplete.is_empty(), book.same_address) {
            (true, true) => CheckResult::new(
                CheckKind::Address,
                Severity::Success,
                "Endereço fiscal coincide com residencial",
            ),
            (true, false) => CheckResult::new(
                CheckKind::Address,
                Severity::Success,
                "Endereços residencial e fiscal completos",
            ),
            (false, _) => CheckResult::new(
                CheckKind::Address,
                Severity::Warning,
                format!("Endereço incompleto: {}", incomplete.join(", ")),
            ),
        }
    }

    fn transactions(
        &self,
        state: &OrganizerState,
    ) -> CheckResult {
        let revenues = state.ledger.revenues().len();
        let expenses = state.ledger.expenses().len();

        let (severity, message) = match (revenues, expenses) {
            (0, 0) => (
                Severity::Warning,
                "Nenhuma receita ou despesa informada".to_string(),
            ),
            (r, 0) => (Severity::Warning, format!("{r} receitas, mas nenhuma despesa")),
            (0, e) => (Severity::Warning, format!("{e} despesas, mas nenhuma receita")),
            (r, e) => (Severity::Success, format!("{r} receitas e {e} despesas")),
        };

        CheckResult::new(CheckKind::Transactions, severity, message)
    }
}

/// Percentage of required profile fields filled, rounded to a whole number.
///
/// Fiscal address fields only count when the fiscal address is separate.
pub fn completion_progress(state: &OrganizerState) -> u32 {
    let id = &state.identification;
    let residential = &state.address.residential;
    let mut fields: Vec<&str> = vec![
        id.name.as_str(),
        id.cpf.as_str(),
        id.cnpj.as_str(),
        id.fiscal_year.as_str(),
        id.activity_label.as_str(),
        id.opening_date.as_str(),
        residential.street.as_str(),
        residential.number.as_str(),
        residential.district.as_str(),
        residential.city.as_str(),
        residential.state.as_str(),
        state.activity.description.as_str(),
    ];

    let empty = Address::default();
    if !state.address.same_address {
        let fiscal = state.address.fiscal.as_ref().unwrap_or(&empty);
        fields.extend([
            fiscal.street.as_str(),
            fiscal.number.as_str(),
            fiscal.district.as_str(),
            fiscal.city.as_str(),
            fiscal.state.as_str(),
        ]);
    }

    let total = fields.len() as u32;
    if total == 0 {
        return 0;
    }
    let filled = fields.iter().filter(|f| !f.trim().is_empty()).count() as u32;

    (filled * 200 + total) / (total * 2)
}
