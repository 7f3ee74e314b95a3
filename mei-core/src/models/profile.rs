use serde::{Deserialize, Serialize};

/// Taxpayer and business identification.
///
/// Fields hold whatever the user typed; documents may still carry punctuation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identification {
    pub name: String,
    pub cpf: String,
    pub cnpj: String,
    pub fiscal_year: String,
    pub activity_label: String,
    pub opening_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub postal_code: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
}

impl Address {
    /// Street, number, city and state are all present.
    pub fn is_complete(&self) -> bool {
        [&self.street, &self.number, &self.city, &self.state]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// Residential and fiscal addresses.
///
/// With `same_address` set the fiscal address mirrors the residential one
/// and `fiscal` is not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressBook {
    pub same_address: bool,
    pub residential: Address,
    pub fiscal: Option<Address>,
}

impl AddressBook {
    pub fn fiscal_address(&self) -> Option<&Address> {
        if self.same_address {
            Some(&self.residential)
        } else {
            self.fiscal.as_ref()
        }
    }

    /// Sets the same-address flag, copying the residential address into the
    /// fiscal slot when the flag is cleared.
    pub fn set_same_address(&mut self, same: bool) {
        if same {
            self.fiscal = None;
        } else if self.same_address {
            self.fiscal = Some(self.residential.clone());
        }
        self.same_address = same;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    pub cnae: String,
    pub description: String,
}
