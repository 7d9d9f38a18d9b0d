use crate::store::{
    DocumentStore, ProvenanceStore, SaveConfig, StoreError, StoredConfig, TransactionManager,
};
use models::{ConfigurationHash, OrgId, Provenance, ResourceKind};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// MemoryStore is an in-process DocumentStore, ProvenanceStore, and
/// TransactionManager. Clones share the same underlying state.
///
/// Transactions stage their writes and apply them together on commit.
/// A compare-and-swap is checked when it's issued, and every staged swap is
/// checked again at commit, so that of two transactions which swap from the
/// same configuration hash, at most one commits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Committed>>,
}

#[derive(Debug, Default)]
struct Committed {
    configs: BTreeMap<OrgId, StoredConfig>,
    provenances: BTreeMap<(ResourceKind, OrgId), Provenance>,
}

#[derive(Debug, Default)]
pub struct MemoryTxn {
    configs: BTreeMap<OrgId, Staged>,
    provenances: BTreeMap<(ResourceKind, OrgId), Provenance>,
}

#[derive(Debug)]
struct Staged {
    // Committed hash observed before this transaction first swapped the configuration.
    base: Option<ConfigurationHash>,
    config: StoredConfig,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a configuration of `org_id` outside of any transaction,
    /// as another writer of the configuration would.
    pub fn put_config(&self, org_id: OrgId, raw: impl Into<String>) -> ConfigurationHash {
        let config = StoredConfig::new(raw.into());
        let hash = config.hash.clone();
        self.inner.lock().unwrap().configs.insert(org_id, config);
        hash
    }

    /// Fetch the committed configuration of `org_id`.
    pub fn config(&self, org_id: OrgId) -> Option<StoredConfig> {
        self.inner.lock().unwrap().configs.get(&org_id).cloned()
    }

    /// Fetch the committed Provenance of a resource.
    pub fn provenance(&self, kind: ResourceKind, org_id: OrgId) -> Provenance {
        self.inner
            .lock()
            .unwrap()
            .provenances
            .get(&(kind, org_id))
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl TransactionManager for MemoryStore {
    type Txn = MemoryTxn;

    async fn begin(&self) -> Result<MemoryTxn, StoreError> {
        Ok(MemoryTxn::default())
    }

    async fn commit(&self, txn: MemoryTxn) -> Result<(), StoreError> {
        let MemoryTxn {
            configs,
            provenances,
        } = txn;
        let mut committed = self.inner.lock().unwrap();

        // Verify all preconditions before applying any write.
        for (org_id, staged) in &configs {
            let actual = committed.configs.get(org_id).map(|c| &c.hash);

            if actual != staged.base.as_ref() {
                return Err(StoreError::HashMismatch {
                    expected: staged.base.clone(),
                    actual: actual.cloned(),
                });
            }
        }

        for (org_id, staged) in configs {
            committed.configs.insert(org_id, staged.config);
        }
        committed.provenances.extend(provenances);

        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore<MemoryTxn> for MemoryStore {
    async fn get_latest(
        &self,
        txn: &mut MemoryTxn,
        org_id: OrgId,
    ) -> Result<Option<StoredConfig>, StoreError> {
        if let Some(staged) = txn.configs.get(&org_id) {
            return Ok(Some(staged.config.clone()));
        }
        Ok(self.config(org_id))
    }

    async fn compare_and_swap(
        &self,
        txn: &mut MemoryTxn,
        org_id: OrgId,
        save: SaveConfig<'_>,
    ) -> Result<ConfigurationHash, StoreError> {
        let committed = self.config(org_id).map(|c| c.hash);

        let (base, current) = match txn.configs.get(&org_id) {
            Some(staged) => (staged.base.clone(), Some(staged.config.hash.clone())),
            None => (committed.clone(), committed),
        };

        if current.as_ref() != save.fetched_hash {
            return Err(StoreError::HashMismatch {
                expected: save.fetched_hash.cloned(),
                actual: current,
            });
        }

        let config = StoredConfig::new(save.raw.to_string());
        let hash = config.hash.clone();
        txn.configs.insert(org_id, Staged { base, config });

        Ok(hash)
    }
}

#[async_trait::async_trait]
impl ProvenanceStore<MemoryTxn> for MemoryStore {
    async fn get_provenance(
        &self,
        txn: &mut MemoryTxn,
        kind: ResourceKind,
        org_id: OrgId,
    ) -> Result<Provenance, StoreError> {
        if let Some(provenance) = txn.provenances.get(&(kind, org_id)) {
            return Ok(*provenance);
        }
        Ok(self.provenance(kind, org_id))
    }

    async fn set_provenance(
        &self,
        txn: &mut MemoryTxn,
        kind: ResourceKind,
        org_id: OrgId,
        provenance: Provenance,
    ) -> Result<(), StoreError> {
        txn.provenances.insert((kind, org_id), provenance);
        Ok(())
    }
}
