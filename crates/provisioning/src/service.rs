use crate::store::{
    DocumentStore, ProvenanceStore, SaveConfig, StoreError, StoredConfig, TransactionManager,
};
use crate::{Error, Settings};
use models::{ConfigDocument, ConfigurationHash, OrgId, Provenance, ResourceKind, Route};
use std::future::Future;

/// NotificationPolicyService reads, validates, and writes the notification
/// policy tree of an organization's alerting configuration.
///
/// Each operation runs within a single transaction. Updates are conditioned
/// on the configuration being unchanged since it was read, and a concurrent
/// change surfaces as Error::ConcurrentModification rather than being retried
/// or overwritten.
pub struct NotificationPolicyService<X, D, P> {
    xact: X,
    config_store: D,
    provenance_store: P,
    settings: Settings,
}

// An organization's configuration as read at the start of a transaction.
struct Loaded {
    doc: ConfigDocument,
    // Hash of the stored configuration, or None if it's defaulted.
    token: Option<ConfigurationHash>,
}

impl<S> NotificationPolicyService<S, S, S>
where
    S: Clone + TransactionManager + DocumentStore<S::Txn> + ProvenanceStore<S::Txn>,
{
    /// Build a service over a store which is also its own transaction manager.
    pub fn from_store(store: S, settings: Settings) -> Self {
        Self::new(store.clone(), store.clone(), store, settings)
    }
}

impl<X, D, P> NotificationPolicyService<X, D, P>
where
    X: TransactionManager,
    D: DocumentStore<X::Txn>,
    P: ProvenanceStore<X::Txn>,
{
    pub fn new(xact: X, config_store: D, provenance_store: P, settings: Settings) -> Self {
        Self {
            xact,
            config_store,
            provenance_store,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Fetch the policy tree of `org_id` and its Provenance.
    /// An organization without a stored configuration has the policy tree
    /// of the default configuration, with Provenance::None.
    #[tracing::instrument(skip_all, fields(org_id = %org_id), err)]
    pub async fn get_policy_tree(&self, org_id: OrgId) -> Result<(Route, Provenance), Error> {
        let mut txn = self.bounded(org_id, self.xact.begin()).await?;
        let Loaded { doc, token } = self.load(&mut txn, org_id).await?;

        let provenance = match token {
            Some(_) => {
                self.bounded(
                    org_id,
                    self.provenance_store.get_provenance(
                        &mut txn,
                        ResourceKind::PolicyTree,
                        org_id,
                    ),
                )
                .await?
            }
            None => Provenance::None,
        };

        // Nothing was written, and `txn` is released by being dropped.
        Ok((doc.alertmanager_config.route, provenance))
    }

    /// Replace the policy tree of `org_id` with `route`, recording `provenance`
    /// as the origin of the change.
    #[tracing::instrument(skip_all, fields(org_id = %org_id, %provenance), err)]
    pub async fn update_policy_tree(
        &self,
        org_id: OrgId,
        route: Route,
        provenance: Provenance,
    ) -> Result<(), Error> {
        let mut txn = self.bounded(org_id, self.xact.begin()).await?;
        let Loaded { mut doc, token } = self.load(&mut txn, org_id).await?;

        if let Err(errors) = validation::validate_policy_tree(&route, &doc) {
            tracing::debug!(%errors, "rejected invalid policy tree");
            return Err(Error::Validation(errors));
        }
        doc.set_route(route);
        let raw = models::encode(&doc);

        let result = self
            .bounded(
                org_id,
                self.config_store.compare_and_swap(
                    &mut txn,
                    org_id,
                    SaveConfig {
                        raw: &raw,
                        fetched_hash: token.as_ref(),
                    },
                ),
            )
            .await;
        let hash = match result {
            Err(err) if err.is_retryable() => {
                tracing::warn!(fetched_hash = ?token, "configuration changed since it was read");
                return Err(err);
            }
            result => result?,
        };

        self.bounded(
            org_id,
            self.provenance_store.set_provenance(
                &mut txn,
                ResourceKind::PolicyTree,
                org_id,
                provenance,
            ),
        )
        .await?;

        self.bounded(org_id, self.xact.commit(txn)).await?;

        tracing::info!(%hash, "updated notification policy tree");
        Ok(())
    }

    /// Restore the policy tree of `org_id` to that of the default configuration,
    /// clearing its Provenance. Returns the restored policy tree.
    #[tracing::instrument(skip_all, fields(org_id = %org_id), err)]
    pub async fn reset_policy_tree(&self, org_id: OrgId) -> Result<Route, Error> {
        let route = self.settings.default_route().clone();
        self.update_policy_tree(org_id, route.clone(), Provenance::None)
            .await?;
        Ok(route)
    }

    async fn load(&self, txn: &mut X::Txn, org_id: OrgId) -> Result<Loaded, Error> {
        let stored = self
            .bounded(org_id, self.config_store.get_latest(txn, org_id))
            .await?;

        let Some(StoredConfig { raw, hash }) = stored else {
            tracing::debug!("organization has no stored configuration; using the default");
            return Ok(Loaded {
                doc: self.settings.default_configuration.clone(),
                token: None,
            });
        };

        let doc = models::decode(&raw).map_err(|source| Error::CorruptConfig { org_id, source })?;

        Ok(Loaded {
            doc,
            token: Some(hash),
        })
    }

    // Await a store operation, bounded by the configured store timeout.
    async fn bounded<T, F>(&self, org_id: OrgId, fut: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let result = match self.settings.store_timeout {
            Some(timeout) => tokio::time::timeout(timeout, fut)
                .await
                .unwrap_or_else(|_elapsed| Err(StoreError::Timeout)),
            None => fut.await,
        };
        result.map_err(|err| Error::from_store(org_id, err))
    }
}
