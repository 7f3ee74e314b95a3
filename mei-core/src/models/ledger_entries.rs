use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque entry identifier, derived from the creation timestamp in milliseconds.
pub type EntryId = i64;

/// Revenue classification as captured on the revenue form.
///
/// Codes that are not recognised are kept verbatim in
/// [`RevenueCategory::Unrecognized`] so they can still be displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RevenueCategory {
    #[default]
    Service,
    Commerce,
    Mixed,
    Other,
    Unrecognized(String),
}

impl RevenueCategory {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Service => "servico",
            Self::Commerce => "comercio",
            Self::Mixed => "misto",
            Self::Other => "outro",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "servico" | "serviço" | "service" => Self::Service,
            "comercio" | "comércio" | "commerce" => Self::Commerce,
            "misto" | "mixed" => Self::Mixed,
            "outro" | "other" => Self::Other,
            _ => Self::Unrecognized(code.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Service => "Serviço",
            Self::Commerce => "Comércio",
            Self::Mixed => "Misto",
            Self::Other => "Outro",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for RevenueCategory {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<RevenueCategory> for String {
    fn from(category: RevenueCategory) -> Self {
        category.as_str().to_string()
    }
}

/// Expense classification as captured on the expense form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExpenseCategory {
    #[default]
    Operational,
    Transport,
    Equipment,
    Taxes,
    Other,
    Unrecognized(String),
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Operational => "operacional",
            Self::Transport => "transporte",
            Self::Equipment => "equipamento",
            Self::Taxes => "impostos",
            Self::Other => "outro",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "operacional" | "operational" => Self::Operational,
            "transporte" | "transport" => Self::Transport,
            "equipamento" | "equipment" => Self::Equipment,
            "impostos" | "taxes" => Self::Taxes,
            "outro" | "other" => Self::Other,
            _ => Self::Unrecognized(code.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Operational => "Operacional",
            Self::Transport => "Transporte",
            Self::Equipment => "Equipamento",
            Self::Taxes => "Impostos",
            Self::Other => "Outro",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for ExpenseCategory {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<ExpenseCategory> for String {
    fn from(category: ExpenseCategory) -> Self {
        category.as_str().to_string()
    }
}

/// Which ledger collection an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Revenue,
    Expense,
    Asset,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Expense => "expense",
            Self::Asset => "asset",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "revenue" => Some(Self::Revenue),
            "expense" => Some(Self::Expense),
            "asset" => Some(Self::Asset),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueEntry {
    pub id: EntryId,
    pub source: String,
    pub amount: Decimal,
    pub category: RevenueCategory,
    pub date: NaiveDate,
    #[serde(default)]
    pub invoice_note: Option<String>,
}

/// For submitting new revenue (no id yet, fields unchecked)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRevenueEntry {
    pub source: String,
    pub amount: Decimal,
    pub category: RevenueCategory,
    pub date: Option<NaiveDate>,
    pub invoice_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub id: EntryId,
    pub description: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
    /// Useful life in years; 0 means the expense is not depreciable.
    #[serde(default)]
    pub depreciation_life_years: u32,
}

/// For submitting new expenses (no id yet, fields unchecked)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpenseEntry {
    pub description: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
    pub depreciation_life_years: u32,
}

/// Derived record for a depreciable expense.
///
/// Holds a non-owning back-reference to the expense it was derived from and
/// is removed together with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    pub source_expense_id: EntryId,
    pub life_years: u32,
    /// Annual rate looked up for `life_years`; zero for unsupported lives.
    pub rate: Decimal,
    pub annual_depreciation: Decimal,
    pub remaining_years: u32,
}
