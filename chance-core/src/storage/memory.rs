use crate::error::Result;
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// In-process key-value store
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = self.entries.read();
        Ok(entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_last_write_wins() {
        let storage = MemoryStorage::new();
        storage.put("lottery_a", "first").await.unwrap();
        storage.put("lottery_a", "second").await.unwrap();
        storage.put("other", "x").await.unwrap();

        assert_eq!(storage.get("lottery_a").await.unwrap().as_deref(), Some("second"));
        assert_eq!(storage.len(), 2);
        assert_eq!(
            storage.keys_with_prefix("lottery_").await.unwrap(),
            vec!["lottery_a".to_string()]
        );

        storage.remove("lottery_a").await.unwrap();
        assert_eq!(storage.get("lottery_a").await.unwrap(), None);
    }
}
