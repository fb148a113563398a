//! Record storage behind the registry
//!
//! The store owns the counter and the record map. It offers no way to
//! delete a record or to change any field other than `owner`.

use equipment_common::{EquipmentRecord, Error, Principal, Result};
use std::collections::BTreeMap;

/// State holder injected into the registry
pub trait RecordStore {
    /// Highest id handed out so far, 0 when empty
    fn last_id(&self) -> u64;

    /// Insert a freshly registered record and advance `last_id` to its id.
    ///
    /// `record.id` must be `last_id() + 1`.
    fn append(&mut self, record: EquipmentRecord);

    fn get(&self, id: u64) -> Option<&EquipmentRecord>;

    /// Replace the owner of an existing record. Returns false if `id` is unknown.
    fn set_owner(&mut self, id: u64, owner: Principal) -> bool;
}

/// In-memory store used by the service and by tests
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    last_id: u64,
    records: BTreeMap<u64, EquipmentRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a persisted snapshot
    ///
    /// Fails if the records do not cover exactly the ids `1..=last_id`.
    pub fn restore(last_id: u64, records: Vec<EquipmentRecord>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for record in records {
            if record.id == 0 || record.id > last_id {
                return Err(Error::CorruptSnapshot(format!(
                    "record id {} outside 1..={}",
                    record.id, last_id
                )));
            }
            let id = record.id;
            if map.insert(id, record).is_some() {
                return Err(Error::CorruptSnapshot(format!("duplicate record id {}", id)));
            }
        }

        // Every id is in range and unique, so a full count means no gaps.
        if map.len() as u64 != last_id {
            return Err(Error::CorruptSnapshot(format!(
                "expected {} records, found {}",
                last_id,
                map.len()
            )));
        }

        Ok(Self {
            last_id,
            records: map,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in id order
    pub fn records(&self) -> impl Iterator<Item = &EquipmentRecord> {
        self.records.values()
    }
}

impl RecordStore for MemoryStore {
    fn last_id(&self) -> u64 {
        self.last_id
    }

    fn append(&mut self, record: EquipmentRecord) {
        debug_assert_eq!(record.id, self.last_id + 1, "ids must be allocated sequentially");
        self.last_id = record.id;
        self.records.insert(record.id, record);
    }

    fn get(&self, id: u64) -> Option<&EquipmentRecord> {
        self.records.get(&id)
    }

    fn set_owner(&mut self, id: u64, owner: Principal) -> bool {
        match self.records.get_mut(&id) {
            Some(record) => {
                record.owner = owner;
                true
            }
            None => false,
        }
    }
}
