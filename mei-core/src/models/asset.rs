use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EntryId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetUse {
    Professional,
    Personal,
    Mixed,
    Unrecognized(String),
}

impl AssetUse {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Professional => "profissional",
            Self::Personal => "pessoal",
            Self::Mixed => "misto",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "profissional" | "professional" => Self::Professional,
            "pessoal" | "personal" => Self::Personal,
            "misto" | "mixed" => Self::Mixed,
            _ => Self::Unrecognized(code.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Professional => "Profissional",
            Self::Personal => "Pessoal",
            Self::Mixed => "Misto",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for AssetUse {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<AssetUse> for String {
    fn from(asset_use: AssetUse) -> Self {
        asset_use.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub id: EntryId,
    pub name: String,
    pub amount: Decimal,
    pub acquisition_date: NaiveDate,
    pub asset_use: AssetUse,
}

/// For submitting new assets (no id yet, fields unchecked)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssetEntry {
    pub name: String,
    pub amount: Decimal,
    pub acquisition_date: Option<NaiveDate>,
    pub asset_use: Option<AssetUse>,
}

/// Aggregate view over the asset list.
///
/// The weighted counts are decimals because mixed-use assets may count as
/// half toward each side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSummary {
    pub count: usize,
    pub total_value: Decimal,
    pub professional_count: Decimal,
    pub personal_count: Decimal,
}
