use serde::{Deserialize, Serialize};

/// Outcome of the filing-obligation determination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilingStatus {
    /// Taxable base at or below the exemption threshold; no return is required.
    #[default]
    NotTaxable,
    /// A return is required but no tax is due.
    Exempt,
    /// A return is required and tax is due.
    Taxable,
}

impl FilingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotTaxable => "NOT_TAXABLE",
            Self::Exempt => "EXEMPT",
            Self::Taxable => "TAXABLE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NOT_TAXABLE" => Some(Self::NotTaxable),
            "EXEMPT" => Some(Self::Exempt),
            "TAXABLE" => Some(Self::Taxable),
            _ => None,
        }
    }

    pub fn to_long_str(&self) -> &'static str {
        match self {
            Self::NotTaxable => "Não obrigado a declarar",
            Self::Exempt => "Obrigado a declarar, sem imposto devido",
            Self::Taxable => "Obrigado a declarar, com imposto devido",
        }
    }
}
