use crate::store::ExpenseStorage;
use anyhow::{Context, Result};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION_NAME: &str = "expenses";

/// Storage backed by a fjall keyspace on the local disk.
pub struct DiskStorage {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStorage {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open data store at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION_NAME, PartitionCreateOptions::default())
            .context("Failed to open expenses partition")?;
        debug!("Opened data store at {}", path.display());

        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl ExpenseStorage for DiskStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .partition
            .get(key)
            .with_context(|| format!("Failed to read key: {key}"))?;
        debug!(%key, hit = value.is_some(), "Disk storage READ");
        Ok(value.map(|v| v.to_vec()))
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        self.partition
            .insert(key, value)
            .with_context(|| format!("Failed to write key: {key}"))?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to flush data store")?;
        debug!(%key, bytes = value.len(), "Disk storage WRITE");
        Ok(())
    }
}
