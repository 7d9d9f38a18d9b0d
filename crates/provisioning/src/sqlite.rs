use crate::store::{
    DocumentStore, ProvenanceStore, SaveConfig, StoreError, StoredConfig, TransactionManager,
};
use anyhow::Context;
use models::{ConfigurationHash, OrgId, Provenance, ResourceKind};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS alert_configuration (
    org_id                    INTEGER PRIMARY KEY NOT NULL,
    alertmanager_configuration TEXT NOT NULL,
    configuration_hash        TEXT NOT NULL,
    updated_at                INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS provenance_type (
    org_id      INTEGER NOT NULL,
    record_type TEXT NOT NULL,
    provenance  TEXT NOT NULL,
    PRIMARY KEY (org_id, record_type)
);
"#;

/// SqliteStore is a durable DocumentStore, ProvenanceStore, and
/// TransactionManager backed by a single SQLite connection.
/// Transactions are serialized: each holds the connection until it's
/// committed or dropped.
///
/// Statements run synchronously on the calling task's tokio worker thread,
/// which is blocked for their duration. A transaction also holds the
/// connection across its awaits, so a slow statement stalls every other
/// caller of this store until the transaction finishes.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

pub struct SqliteTxn {
    conn: OwnedMutexGuard<Connection>,
    finished: bool,
}

impl Drop for SqliteTxn {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(err) = self.conn.execute_batch("ROLLBACK") {
            tracing::warn!(%err, "failed to roll back sqlite transaction");
        }
    }
}

impl SqliteStore {
    /// Open (or create) a store at the given database path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)
            .with_context(|| format!("opening database {}", path.display()))?;
        Self::from_connection(conn)
    }

    /// Open a store which lives only as long as this SqliteStore.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn current_hash(conn: &Connection, org_id: OrgId) -> rusqlite::Result<Option<ConfigurationHash>> {
    conn.query_row(
        "SELECT configuration_hash FROM alert_configuration WHERE org_id = ?1",
        [org_id.get()],
        |row| row.get(0).map(ConfigurationHash::from_stored),
    )
    .optional()
}

#[async_trait::async_trait]
impl TransactionManager for SqliteStore {
    type Txn = SqliteTxn;

    async fn begin(&self) -> Result<SqliteTxn, StoreError> {
        let conn = self.conn.clone().lock_owned().await;
        conn.execute_batch("BEGIN IMMEDIATE")?;

        Ok(SqliteTxn {
            conn,
            finished: false,
        })
    }

    async fn commit(&self, mut txn: SqliteTxn) -> Result<(), StoreError> {
        txn.conn.execute_batch("COMMIT")?;
        txn.finished = true;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore<SqliteTxn> for SqliteStore {
    async fn get_latest(
        &self,
        txn: &mut SqliteTxn,
        org_id: OrgId,
    ) -> Result<Option<StoredConfig>, StoreError> {
        let config = txn
            .conn
            .query_row(
                r#"SELECT alertmanager_configuration, configuration_hash
                FROM alert_configuration WHERE org_id = ?1"#,
                [org_id.get()],
                |row| {
                    Ok(StoredConfig {
                        raw: row.get(0)?,
                        hash: ConfigurationHash::from_stored(row.get(1)?),
                    })
                },
            )
            .optional()?;

        Ok(config)
    }

    async fn compare_and_swap(
        &self,
        txn: &mut SqliteTxn,
        org_id: OrgId,
        save: SaveConfig<'_>,
    ) -> Result<ConfigurationHash, StoreError> {
        let hash = ConfigurationHash::of(save.raw);

        let affected = match save.fetched_hash {
            Some(fetched) => txn.conn.execute(
                r#"UPDATE alert_configuration SET
                    alertmanager_configuration = ?2,
                    configuration_hash = ?3,
                    updated_at = strftime('%s', 'now')
                WHERE org_id = ?1 AND configuration_hash = ?4"#,
                params![org_id.get(), save.raw, hash.as_str(), fetched.as_str()],
            )?,
            None => txn.conn.execute(
                r#"INSERT OR IGNORE INTO alert_configuration
                    (org_id, alertmanager_configuration, configuration_hash, updated_at)
                VALUES (?1, ?2, ?3, strftime('%s', 'now'))"#,
                params![org_id.get(), save.raw, hash.as_str()],
            )?,
        };

        if affected == 0 {
            return Err(StoreError::HashMismatch {
                expected: save.fetched_hash.cloned(),
                actual: current_hash(&txn.conn, org_id)?,
            });
        }
        Ok(hash)
    }
}

#[async_trait::async_trait]
impl ProvenanceStore<SqliteTxn> for SqliteStore {
    async fn get_provenance(
        &self,
        txn: &mut SqliteTxn,
        kind: ResourceKind,
        org_id: OrgId,
    ) -> Result<Provenance, StoreError> {
        let stored: Option<String> = txn
            .conn
            .query_row(
                "SELECT provenance FROM provenance_type WHERE org_id = ?1 AND record_type = ?2",
                params![org_id.get(), kind.name()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(stored) = stored else {
            return Ok(Provenance::None);
        };
        let provenance = stored
            .parse::<Provenance>()
            .with_context(|| format!("reading {kind} provenance of organization {org_id}"))?;

        Ok(provenance)
    }

    async fn set_provenance(
        &self,
        txn: &mut SqliteTxn,
        kind: ResourceKind,
        org_id: OrgId,
        provenance: Provenance,
    ) -> Result<(), StoreError> {
        txn.conn.execute(
            r#"INSERT INTO provenance_type (org_id, record_type, provenance)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (org_id, record_type) DO UPDATE SET provenance = excluded.provenance"#,
            params![org_id.get(), kind.name(), provenance.name()],
        )?;
        Ok(())
    }
}
