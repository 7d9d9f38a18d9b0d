use models::{ConfigurationHash, OrgId, Provenance, ResourceKind};

/// StoredConfig is the latest persisted alerting configuration of an organization.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredConfig {
    /// Raw, encoded configuration document.
    pub raw: String,
    /// Hash of `raw`, as computed when it was saved.
    pub hash: ConfigurationHash,
}

impl StoredConfig {
    pub fn new(raw: String) -> Self {
        let hash = ConfigurationHash::of(&raw);
        Self { raw, hash }
    }
}

/// SaveConfig is a conditional write of an organization's configuration.
#[derive(Debug, Clone, Copy)]
pub struct SaveConfig<'a> {
    /// Raw, encoded configuration document to store.
    pub raw: &'a str,
    /// Hash of the configuration which was read prior to this write,
    /// or None if the organization had no stored configuration.
    /// The write is applied only if the stored configuration still matches.
    pub fetched_hash: Option<&'a ConfigurationHash>,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("stored configuration hash {actual:?} doesn't match the fetched hash {expected:?}")]
    HashMismatch {
        expected: Option<ConfigurationHash>,
        actual: Option<ConfigurationHash>,
    },
    #[error("store operation timed out")]
    Timeout,
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// TransactionManager begins and commits the transactions within which
/// DocumentStore and ProvenanceStore operations are performed.
///
/// A Txn which is dropped without being committed is rolled back,
/// discarding every write made through it.
#[async_trait::async_trait]
pub trait TransactionManager: Send + Sync {
    type Txn: Send;

    async fn begin(&self) -> Result<Self::Txn, StoreError>;
    async fn commit(&self, txn: Self::Txn) -> Result<(), StoreError>;
}

/// DocumentStore persists one alerting configuration per organization.
#[async_trait::async_trait]
pub trait DocumentStore<Txn: Send>: Send + Sync {
    /// Fetch the latest configuration of `org_id`, or None if it has none.
    async fn get_latest(
        &self,
        txn: &mut Txn,
        org_id: OrgId,
    ) -> Result<Option<StoredConfig>, StoreError>;

    /// Store a configuration of `org_id` if and only if its currently stored
    /// hash matches `save.fetched_hash`, returning the hash of the new configuration.
    /// A mismatch fails with StoreError::HashMismatch.
    async fn compare_and_swap(
        &self,
        txn: &mut Txn,
        org_id: OrgId,
        save: SaveConfig<'_>,
    ) -> Result<ConfigurationHash, StoreError>;
}

/// ProvenanceStore persists the Provenance of provisioned resources.
#[async_trait::async_trait]
pub trait ProvenanceStore<Txn: Send>: Send + Sync {
    /// Fetch the Provenance of a resource, which is Provenance::None if not recorded.
    async fn get_provenance(
        &self,
        txn: &mut Txn,
        kind: ResourceKind,
        org_id: OrgId,
    ) -> Result<Provenance, StoreError>;

    async fn set_provenance(
        &self,
        txn: &mut Txn,
        kind: ResourceKind,
        org_id: OrgId,
        provenance: Provenance,
    ) -> Result<(), StoreError>;
}
