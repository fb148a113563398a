pub mod context;
pub mod equipment;
pub mod error;
pub mod principal;

pub use context::CallerContext;
pub use equipment::{EquipmentRecord, NewEquipment, MAX_TEXT_LEN};
pub use error::{Error, Result};
pub use principal::Principal;
