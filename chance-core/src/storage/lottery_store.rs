use crate::error::Result;
use crate::storage::KeyValueStore;
use crate::types::{storage_key, LotteryRecord, STORAGE_PREFIX};
use std::sync::Arc;

/// Typed access to lottery records kept in a [`KeyValueStore`]
#[derive(Clone)]
pub struct LotteryStore {
    storage: Arc<dyn KeyValueStore>,
}

impl LotteryStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub async fn save_lottery(&self, record: &LotteryRecord) -> Result<()> {
        let json = serde_json::to_string(record)?;
        self.storage.put(&record.storage_key(), &json).await?;

        tracing::debug!("Saved lottery {}", record.id);
        Ok(())
    }

    /// `Ok(None)` when nothing is stored, a serialization error when the
    /// stored value is not a lottery.
    pub async fn load_lottery(&self, id: &str) -> Result<Option<LotteryRecord>> {
        let Some(json) = self.storage.get(&storage_key(id)).await? else {
            return Ok(None);
        };

        let record: LotteryRecord = serde_json::from_str(&json)?;
        Ok(Some(record))
    }

    /// All readable lotteries, newest first. Malformed entries are skipped.
    pub async fn list_lotteries(&self) -> Result<Vec<LotteryRecord>> {
        let keys = self.storage.keys_with_prefix(STORAGE_PREFIX).await?;

        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(json) = self.storage.get(&key).await? else {
                continue;
            };

            match serde_json::from_str::<LotteryRecord>(&json) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping malformed lottery entry {}: {}", key, e),
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    pub async fn lottery_exists(&self, id: &str) -> Result<bool> {
        Ok(self.storage.get(&storage_key(id)).await?.is_some())
    }

    pub async fn delete_lottery(&self, id: &str) -> Result<()> {
        self.storage.remove(&storage_key(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChanceError;
    use crate::storage::{MemoryStorage, SqliteStorage};
    use crate::types::LotteryMode;

    fn sample(tasks: &[&str]) -> LotteryRecord {
        LotteryRecord::new(
            vec!["Alice".to_string(), "Bob".to_string()],
            tasks.iter().map(|t| t.to_string()).collect(),
            LotteryMode::SingleTask,
        )
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let storage = Arc::new(MemoryStorage::new());
        let store = LotteryStore::new(storage.clone());

        let mut record = sample(&["Dishes"]);
        store.save_lottery(&record).await.unwrap();
        assert!(store.lottery_exists(&record.id).await.unwrap());
        assert!(storage
            .get(&format!("lottery_{}", record.id))
            .await
            .unwrap()
            .is_some());

        record.winner = Some("Alice".to_string());
        record.rotation_degree = Some(1999.25);
        store.save_lottery(&record).await.unwrap();

        let loaded = store.load_lottery(&record.id).await.unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_missing_and_malformed() {
        let storage = Arc::new(MemoryStorage::new());
        let store = LotteryStore::new(storage.clone());

        assert!(store.load_lottery("nope").await.unwrap().is_none());

        storage.put("lottery_broken", "{not json").await.unwrap();
        assert!(matches!(
            store.load_lottery("broken").await,
            Err(ChanceError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_list_skips_malformed_entries() {
        let storage = Arc::new(SqliteStorage::in_memory().await.unwrap());
        let store = LotteryStore::new(storage.clone());

        let mut older = sample(&["Dishes"]);
        older.created_at = 1;
        let mut newer = sample(&["Laundry"]);
        newer.created_at = 2;
        store.save_lottery(&older).await.unwrap();
        store.save_lottery(&newer).await.unwrap();
        storage.put("lottery_garbage", "[]").await.unwrap();
        storage.put("unrelated", "{}").await.unwrap();

        let records = store.list_lotteries().await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![newer.id.as_str(), older.id.as_str()]);

        store.delete_lottery(&older.id).await.unwrap();
        assert!(!store.lottery_exists(&older.id).await.unwrap());
    }
}
