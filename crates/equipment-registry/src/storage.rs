//! Redis mirror of the registry state
//!
//! Every mutation reaches Redis before it is applied in memory, so the
//! mirror never misses a record the service has handed out and the service
//! can restore its records after a restart.

use anyhow::{Context, Result};
use async_trait::async_trait;
use equipment_common::EquipmentRecord;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info};

use crate::store::MemoryStore;

const LAST_ID_KEY: &str = "equipment:last_id";
const IDS_KEY: &str = "equipment:ids";

fn record_key(id: u64) -> String {
    format!("equipment:record:{}", id)
}

/// Durable copy of registry mutations
///
/// The host writes here before applying a mutation in memory, so a failed
/// write leaves the registry untouched.
#[async_trait]
pub trait Mirror: Send {
    /// Persist a record about to be registered, together with the counter
    async fn save_registration(&mut self, record: &EquipmentRecord) -> Result<()>;

    /// Persist a record whose owner is about to change
    async fn save_owner(&mut self, record: &EquipmentRecord) -> Result<()>;
}

/// Storage backend mirroring equipment records
pub struct Storage {
    conn: ConnectionManager,
}

impl Storage {
    /// Create a new storage instance
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .context("Failed to create Redis client")?;

        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        info!("Connected to Redis at {}", redis_url);

        Ok(Self { conn })
    }

    /// Load every mirrored record and rebuild the store from them
    pub async fn load(&mut self) -> Result<MemoryStore> {
        let last_id: Option<u64> = self.conn.get(LAST_ID_KEY).await?;
        let ids: Vec<u64> = self.conn.smembers(IDS_KEY).await?;

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            let json: Option<String> = self.conn.get(record_key(id)).await?;
            let data = json.with_context(|| format!("Missing record for equipment {}", id))?;
            let record: EquipmentRecord = serde_json::from_str(&data)
                .with_context(|| format!("Failed to deserialize equipment {}", id))?;
            records.push(record);
        }

        let store = MemoryStore::restore(last_id.unwrap_or(0), records)
            .context("Stored registry snapshot is inconsistent")?;

        info!("Loaded {} equipment records from Redis", store.len());
        Ok(store)
    }

    /// Remove every mirrored key
    pub async fn clear(&mut self) -> Result<()> {
        let ids: Vec<u64> = self.conn.smembers(IDS_KEY).await?;
        for id in ids {
            let _: () = self.conn.del(record_key(id)).await?;
        }
        let _: () = self.conn.del(vec![IDS_KEY, LAST_ID_KEY]).await?;
        Ok(())
    }
}

#[async_trait]
impl Mirror for Storage {
    async fn save_registration(&mut self, record: &EquipmentRecord) -> Result<()> {
        let json = serde_json::to_string(record)
            .context("Failed to serialize equipment record")?;

        let _: () = redis::pipe()
            .atomic()
            .set(record_key(record.id), json)
            .ignore()
            .sadd(IDS_KEY, record.id)
            .ignore()
            .set(LAST_ID_KEY, record.id)
            .ignore()
            .query_async(&mut self.conn)
            .await
            .context("Failed to persist registration")?;

        debug!("Persisted equipment {}", record.id);
        Ok(())
    }

    async fn save_owner(&mut self, record: &EquipmentRecord) -> Result<()> {
        let json = serde_json::to_string(record)
            .context("Failed to serialize equipment record")?;

        let _: () = self
            .conn
            .set(record_key(record.id), json)
            .await
            .context("Failed to persist ownership change")?;

        debug!("Persisted owner {} for equipment {}", record.owner, record.id);
        Ok(())
    }
}
