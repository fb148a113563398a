use crate::{Error, Principal, Result};
use serde::{Deserialize, Serialize};

/// Maximum length, in characters, of each descriptive text field
pub const MAX_TEXT_LEN: usize = 100;

/// Descriptive fields submitted when registering equipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEquipment {
    pub name: String,
    pub category: String,
    pub manufacturer: String,
    pub serial_number: String,
    /// Epoch-like manufacture date, not checked against registration time
    pub manufacture_date: u64,
}

impl NewEquipment {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        manufacturer: impl Into<String>,
        serial_number: impl Into<String>,
        manufacture_date: u64,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            manufacturer: manufacturer.into(),
            serial_number: serial_number.into(),
            manufacture_date,
        }
    }

    /// Check the text bounds the host enforces before calling the registry
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("category", &self.category),
            ("manufacturer", &self.manufacturer),
            ("serial_number", &self.serial_number),
        ] {
            if value.is_empty() {
                return Err(Error::InvalidInput(format!("{} must not be empty", field)));
            }
            if value.chars().count() > MAX_TEXT_LEN {
                return Err(Error::InvalidInput(format!(
                    "{} exceeds {} characters",
                    field, MAX_TEXT_LEN
                )));
            }
        }
        Ok(())
    }
}

/// A registered piece of equipment
///
/// Only `owner` changes after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub manufacturer: String,
    pub serial_number: String,
    pub manufacture_date: u64,
    pub owner: Principal,
    pub registered_at: u64,
}

impl EquipmentRecord {
    /// Build the record for a fresh registration
    pub fn new(id: u64, equipment: NewEquipment, owner: Principal, registered_at: u64) -> Self {
        Self {
            id,
            name: equipment.name,
            category: equipment.category,
            manufacturer: equipment.manufacturer,
            serial_number: equipment.serial_number,
            manufacture_date: equipment.manufacture_date,
            owner,
            registered_at,
        }
    }
}
