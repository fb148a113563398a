//! Equipment registry state machine
//!
//! Allocates sequential ids, stores records and gates ownership transfer on
//! the current owner. Every call runs to completion synchronously; ordering
//! between calls is the host's job.

use equipment_common::{CallerContext, EquipmentRecord, Error, NewEquipment, Principal, Result};
use tracing::{debug, info};

use crate::store::{MemoryStore, RecordStore};

/// Registry over an injected record store
#[derive(Debug, Default)]
pub struct Registry<S = MemoryStore> {
    store: S,
}

impl<S: RecordStore> Registry<S> {
    /// Create a registry that owns `store` for its whole lifetime
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Register equipment owned by the caller and return its new id
    pub fn register(&mut self, ctx: &CallerContext, equipment: NewEquipment) -> u64 {
        let record = self.next_record(ctx, equipment);
        self.commit_registration(record)
    }

    /// Build the record the next registration would create, without storing it
    pub fn next_record(&self, ctx: &CallerContext, equipment: NewEquipment) -> EquipmentRecord {
        // A u64 counter advancing once per registration cannot wrap in practice.
        let id = self.store.last_id() + 1;
        EquipmentRecord::new(id, equipment, ctx.caller.clone(), ctx.now)
    }

    /// Store a record produced by [`Registry::next_record`]
    ///
    /// No other registration may happen between the two calls.
    pub fn commit_registration(&mut self, record: EquipmentRecord) -> u64 {
        let id = record.id;
        let owner = record.owner.clone();
        self.store.append(record);

        info!("Registered equipment {} for owner {}", id, owner);
        id
    }

    /// Hand equipment `id` over to `new_owner`
    ///
    /// Fails with `NotFound` if no such record exists, then with
    /// `NotAuthorized` if the caller is not the current owner. A failed
    /// transfer changes nothing.
    pub fn transfer(&mut self, ctx: &CallerContext, id: u64, new_owner: Principal) -> Result<()> {
        self.check_transfer(ctx, id, &new_owner)?;

        info!("Transferring equipment {} from {} to {}", id, ctx.caller, new_owner);
        self.store.set_owner(id, new_owner);
        Ok(())
    }

    /// Run the transfer checks and return the record as it would look afterwards
    pub fn check_transfer(
        &self,
        ctx: &CallerContext,
        id: u64,
        new_owner: &Principal,
    ) -> Result<EquipmentRecord> {
        let record = self.store.get(id).ok_or(Error::NotFound { id })?;

        if record.owner != ctx.caller {
            debug!(
                "Rejected transfer of equipment {}: caller {} is not owner {}",
                id, ctx.caller, record.owner
            );
            return Err(Error::NotAuthorized {
                id,
                caller: ctx.caller.clone(),
            });
        }

        Ok(EquipmentRecord {
            owner: new_owner.clone(),
            ..record.clone()
        })
    }

    pub fn get(&self, id: u64) -> Option<&EquipmentRecord> {
        self.store.get(id)
    }

    pub fn get_last_id(&self) -> u64 {
        self.store.last_id()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
