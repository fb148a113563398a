//! Request and response bodies for the Equipment Registry API

use equipment_common::{EquipmentRecord, NewEquipment};
use serde::{Deserialize, Serialize};

/// Request to register equipment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterEquipmentRequest {
    pub name: String,
    pub category: String,
    pub manufacturer: String,
    pub serial_number: String,
    pub manufacture_date: u64,
}

impl From<RegisterEquipmentRequest> for NewEquipment {
    fn from(req: RegisterEquipmentRequest) -> Self {
        NewEquipment::new(
            req.name,
            req.category,
            req.manufacturer,
            req.serial_number,
            req.manufacture_date,
        )
    }
}

/// Response from registration
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterEquipmentResponse {
    pub id: u64,
}

/// Request to transfer equipment to a new owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferEquipmentRequest {
    pub new_owner: String,
}

/// Response from a successful transfer
#[derive(Debug, Serialize, Deserialize)]
pub struct TransferEquipmentResponse {
    pub success: bool,
}

/// Equipment lookup result; `equipment` is null when the id is unknown
#[derive(Debug, Serialize, Deserialize)]
pub struct EquipmentResponse {
    pub equipment: Option<EquipmentRecord>,
}

/// Current value of the id counter
#[derive(Debug, Serialize, Deserialize)]
pub struct LastIdResponse {
    pub last_id: u64,
}
