// ── Probe-then-act reconciliation ──
//
// Sites and WLANs follow the same pattern: list everything in the owning
// scope, match by natural key, adopt the remote record if found, otherwise
// stay pending until `create()`. The per-kind pieces live behind
// `RemoteEntity`; `probe`, `create` and `delete` implement the flow once.
//
// Probes are never cached. Between a probe and the call that follows it
// another actor can change the remote entity; handles must not be driven
// concurrently.

use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{debug, error, info};

use crate::error::CoreError;

/// Where a handle stands relative to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HandleState {
    /// Not found on the controller (yet).
    #[default]
    Pending,
    /// Matched or created; carries the controller-assigned id.
    Live(String),
    /// Deleted through this handle. Mutating calls are refused.
    Retired,
}

impl HandleState {
    pub fn remote_id(&self) -> Option<&str> {
        match self {
            Self::Live(id) => Some(id),
            Self::Pending | Self::Retired => None,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    pub fn is_retired(&self) -> bool {
        matches!(self, Self::Retired)
    }
}

/// Result of an idempotent create.
#[derive(Debug, Clone)]
pub enum CreateOutcome<R> {
    /// The controller created the entity and returned this record.
    Created(R),
    /// An entity with the same natural key already existed; nothing was sent.
    AlreadyExists { id: String },
    /// The controller refused the creation (already logged).
    Rejected,
}

impl<R> CreateOutcome<R> {
    /// The remote id of an entity that was already there.
    pub fn existing_id(&self) -> Option<&str> {
        match self {
            Self::AlreadyExists { id } => Some(id),
            Self::Created(_) | Self::Rejected => None,
        }
    }

    /// Whether the entity exists on the controller after the call.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Per-kind plumbing for the shared reconcile flow.
pub(crate) trait RemoteEntity {
    type Record;

    /// Human-readable kind for log records ("Site", "WLAN").
    const KIND: &'static str;

    fn key(&self) -> &str;
    fn record_key(record: &Self::Record) -> &str;
    fn record_id(record: &Self::Record) -> &str;
    fn state(&self) -> &HandleState;
    fn set_state(&mut self, state: HandleState);

    /// Copy every remote-observable field of `record` onto the handle.
    fn adopt(&mut self, record: Self::Record);

    /// Creation payload from locally held fields. Unset fields are omitted.
    fn creation_body(&self) -> Value;

    async fn list_remote(&self) -> Result<Option<Vec<Self::Record>>, mistly_api::Error>;
    async fn create_remote(&self, body: &Value) -> Result<Option<Self::Record>, mistly_api::Error>;
    async fn delete_remote(&self, id: &str) -> Result<bool, mistly_api::Error>;
}

/// Insert `key` into a payload only when the value is set.
pub(crate) fn insert_opt<T: Serialize>(
    body: &mut Map<String, Value>,
    key: &str,
    value: Option<&T>,
) {
    if let Some(value) = value {
        body.insert(key.to_owned(), json!(value));
    }
}

pub(crate) fn ensure_usable<E: RemoteEntity>(entity: &E) -> Result<(), CoreError> {
    if entity.state().is_retired() {
        return Err(CoreError::HandleRetired {
            kind: E::KIND.into(),
            key: entity.key().into(),
        });
    }
    Ok(())
}

/// Look the entity up by natural key and adopt it when found.
///
/// A listing refused by the controller fails with `ListingRefused` and
/// leaves the handle state untouched: existence is unknown, so nothing may
/// be created or deleted on the strength of it. A successful listing
/// without a match moves a live handle back to pending.
pub(crate) async fn probe<E: RemoteEntity>(entity: &mut E) -> Result<bool, CoreError> {
    ensure_usable(entity)?;

    let Some(records) = entity.list_remote().await? else {
        error!(
            kind = E::KIND,
            key = entity.key(),
            "{} {} could not be looked up: listing refused",
            E::KIND,
            entity.key()
        );
        return Err(CoreError::ListingRefused {
            kind: E::KIND.into(),
            key: entity.key().into(),
        });
    };

    let key = entity.key().to_owned();
    match records.into_iter().find(|r| E::record_key(r) == key) {
        Some(record) => {
            let id = E::record_id(&record).to_owned();
            debug!(kind = E::KIND, key = %key, id = %id, "found on the Mist cloud");
            entity.adopt(record);
            entity.set_state(HandleState::Live(id));
            Ok(true)
        }
        None => {
            debug!(kind = E::KIND, key = %key, "not found on the Mist cloud");
            entity.set_state(HandleState::Pending);
            Ok(false)
        }
    }
}

/// Re-probe, then create when absent.
pub(crate) async fn create<E: RemoteEntity>(
    entity: &mut E,
) -> Result<CreateOutcome<E::Record>, CoreError> {
    ensure_usable(entity)?;
    info!(kind = E::KIND, key = entity.key(), "Creating {} {}", E::KIND, entity.key());

    if probe(entity).await? {
        let id = entity.state().remote_id().unwrap_or_default().to_owned();
        info!(
            kind = E::KIND,
            key = entity.key(),
            id = %id,
            "{} {} already exists, nothing to create",
            E::KIND,
            entity.key()
        );
        return Ok(CreateOutcome::AlreadyExists { id });
    }

    let body = entity.creation_body();
    match entity.create_remote(&body).await? {
        Some(record) => {
            let id = E::record_id(&record).to_owned();
            info!(
                kind = E::KIND,
                key = entity.key(),
                id = %id,
                "{} {} created",
                E::KIND,
                entity.key()
            );
            entity.set_state(HandleState::Live(id));
            Ok(CreateOutcome::Created(record))
        }
        None => {
            error!(
                kind = E::KIND,
                key = entity.key(),
                "{} {} was NOT created",
                E::KIND,
                entity.key()
            );
            Ok(CreateOutcome::Rejected)
        }
    }
}

/// Re-probe, then delete when present.
///
/// Deleting an absent entity is an error record and `false`. Once the
/// delete call has been issued the handle is retired whatever the outcome.
pub(crate) async fn delete<E: RemoteEntity>(entity: &mut E) -> Result<bool, CoreError> {
    ensure_usable(entity)?;
    info!(kind = E::KIND, key = entity.key(), "Deleting {} {}", E::KIND, entity.key());

    if !probe(entity).await? {
        error!(
            kind = E::KIND,
            key = entity.key(),
            "{} {} was NOT deleted: it does not exist on the Mist cloud",
            E::KIND,
            entity.key()
        );
        return Ok(false);
    }

    let id = entity.state().remote_id().unwrap_or_default().to_owned();
    let outcome = entity.delete_remote(&id).await;
    entity.set_state(HandleState::Retired);
    let deleted = outcome?;

    if deleted {
        info!(kind = E::KIND, key = entity.key(), id = %id, "{} {} deleted", E::KIND, entity.key());
    } else {
        error!(
            kind = E::KIND,
            key = entity.key(),
            id = %id,
            "{} {} was NOT deleted",
            E::KIND,
            entity.key()
        );
    }
    Ok(deleted)
}

/// Re-probe and return the remote id, or fail when the entity is absent.
pub(crate) async fn require_live<E: RemoteEntity>(entity: &mut E) -> Result<String, CoreError> {
    if probe(entity).await? {
        if let Some(id) = entity.state().remote_id() {
            return Ok(id.to_owned());
        }
    }
    error!(
        kind = E::KIND,
        key = entity.key(),
        "{} {} does not exist on the Mist cloud",
        E::KIND,
        entity.key()
    );
    Err(CoreError::NotFound {
        kind: E::KIND.into(),
        key: entity.key().into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_state_exposes_id_only_when_live() {
        assert_eq!(HandleState::Live("s1".into()).remote_id(), Some("s1"));
        assert_eq!(HandleState::Pending.remote_id(), None);
        assert_eq!(HandleState::Retired.remote_id(), None);
        assert!(HandleState::Retired.is_retired());
    }

    #[test]
    fn create_outcome_success() {
        let created: CreateOutcome<()> = CreateOutcome::Created(());
        let existing: CreateOutcome<()> = CreateOutcome::AlreadyExists { id: "s1".into() };
        assert!(created.is_success());
        assert!(existing.is_success());
        assert_eq!(existing.existing_id(), Some("s1"));
        assert!(!CreateOutcome::<()>::Rejected.is_success());
    }
}
