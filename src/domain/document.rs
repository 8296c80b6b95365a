//! The document contract and its optional expiry capability.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Contract implemented by every record schema stored through a
/// [`DocumentRepository`](crate::repository::DocumentRepository).
///
/// A schema declares its configured name, the wire name of its partition-key
/// field, and whether it supports the expiry capability. The capability is
/// resolved once at repository construction, not per call.
///
/// # Expiry capability
///
/// Schemas that opt in to soft delete set [`SUPPORTS_EXPIRY`] to `true`, carry
/// `ttl` (seconds until store-side expiry) and `_deleted` (tombstone flag)
/// wire fields, and override [`is_tombstoned`] and [`tombstone`]. A tombstoned
/// record stays physically present until the store's own TTL mechanism purges
/// it, but is invisible to every repository read path.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use strata::domain::DocumentModel;
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Tenant {
///     id: String,
///     region: String,
///     value: String,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     ttl: Option<i64>,
///     #[serde(rename = "_deleted", skip_serializing_if = "Option::is_none")]
///     deleted: Option<bool>,
/// }
///
/// impl DocumentModel for Tenant {
///     const SCHEMA_NAME: &'static str = "tenant";
///     const PARTITION_KEY_FIELD: &'static str = "region";
///     const SUPPORTS_EXPIRY: bool = true;
///
///     fn id(&self) -> &str {
///         &self.id
///     }
///
///     fn is_tombstoned(&self) -> bool {
///         self.deleted == Some(true)
///     }
///
///     fn tombstone(&mut self, expiry_seconds: i64) {
///         self.deleted = Some(true);
///         self.ttl = Some(expiry_seconds);
///     }
/// }
/// ```
///
/// [`SUPPORTS_EXPIRY`]: DocumentModel::SUPPORTS_EXPIRY
/// [`is_tombstoned`]: DocumentModel::is_tombstoned
/// [`tombstone`]: DocumentModel::tombstone
pub trait DocumentModel: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Schema name referenced by the `document_schema` configuration field.
    const SCHEMA_NAME: &'static str;

    /// Wire name of the partition-key ("group") field on this schema.
    ///
    /// Repository construction fails with a configuration error when this
    /// does not match the collection's configured `partition_key_name`.
    const PARTITION_KEY_FIELD: &'static str;

    /// Whether this schema carries the expiry capability (`ttl` + `_deleted`).
    const SUPPORTS_EXPIRY: bool = false;

    /// Identifier, unique within a group. Never empty for a stored record.
    fn id(&self) -> &str;

    /// Whether this record has been logically deleted.
    fn is_tombstoned(&self) -> bool {
        false
    }

    /// Mark this record as logically deleted, expiring after
    /// `expiry_seconds`. No-op for schemas without the expiry capability.
    fn tombstone(&mut self, expiry_seconds: i64) {
        let _ = expiry_seconds;
    }
}
