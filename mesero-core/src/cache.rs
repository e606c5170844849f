//! Last-used customer details kept on disk to pre-fill the checkout form.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::checkout::{CustomerDraft, FulfillmentKind};
use crate::model::PaymentMethod;

/// How long cached details stay valid after their last use.
pub const CACHE_TTL_DAYS: i64 = 30;

#[derive(thiserror::Error, Debug)]
/// Errors raised while writing or removing the cache file.
pub enum CacheError {
    /// Filesystem access failed.
    #[error("Cache I/O error: {0}")]
    Io(#[from] io::Error),
    /// Details could not be serialized.
    #[error("Cache encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Cached form fields.
pub struct CachedCustomer {
    /// Customer name.
    #[serde(default)]
    pub name: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Delivery city.
    #[serde(default)]
    pub city: String,
    /// Delivery neighborhood.
    #[serde(default)]
    pub neighborhood: String,
    /// Preferred payment method.
    #[serde(default)]
    pub payment: PaymentMethod,
    /// Preferred fulfillment.
    #[serde(default)]
    pub fulfillment: FulfillmentKind,
    /// Last time the details were used for an order.
    pub last_used: DateTime<Utc>,
}

impl CachedCustomer {
    /// Whether the details are worth offering.
    #[must_use]
    pub fn is_useful(&self) -> bool {
        !self.name.trim().is_empty() || !self.phone.trim().is_empty()
    }

    /// Form draft pre-filled with the cached values.
    #[must_use]
    pub fn to_draft(&self) -> CustomerDraft {
        CustomerDraft {
            name: self.name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            neighborhood: self.neighborhood.clone(),
            payment: self.payment,
            fulfillment: self.fulfillment,
        }
    }
}

/// JSON file holding the last-used customer details.
pub struct CustomerCache {
    path: PathBuf,
    ttl: Duration,
}

impl CustomerCache {
    /// Cache stored at `path` with the default 30-day expiry.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: Duration::days(CACHE_TTL_DAYS),
        }
    }

    /// Location of the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store the draft, stamped with `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] when the file cannot be written.
    pub fn save(&self, draft: &CustomerDraft, now: DateTime<Utc>) -> Result<(), CacheError> {
        let cached = CachedCustomer {
            name: draft.name.trim().to_owned(),
            phone: draft.phone.trim().to_owned(),
            address: draft.address.trim().to_owned(),
            city: draft.city.clone(),
            neighborhood: draft.neighborhood.clone(),
            payment: draft.payment,
            fulfillment: draft.fulfillment,
            last_used: now,
        };
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&cached)?)?;
        debug!(path = %self.path.display(), "saved customer details");
        Ok(())
    }

    /// Load cached details valid at `now`.
    ///
    /// Expired entries are deleted. A missing or unreadable file yields `None`.
    #[must_use]
    pub fn load(&self, now: DateTime<Utc>) -> Option<CachedCustomer> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not read customer cache");
                return None;
            }
        };

        let cached: CachedCustomer = match serde_json::from_slice(&bytes) {
            Ok(cached) => cached,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring corrupt customer cache");
                return None;
            }
        };

        if now - cached.last_used > self.ttl {
            debug!(path = %self.path.display(), "customer cache expired");
            if let Err(err) = self.clear() {
                warn!(error = %err, "could not remove expired customer cache");
            }
            return None;
        }
        Some(cached)
    }

    /// Remove the cache file if it exists.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] when the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), CacheError> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    /// Whether usable details are cached at `now`.
    #[must_use]
    pub fn has_customer(&self, now: DateTime<Utc>) -> bool {
        self.load(now).is_some_and(|cached| cached.is_useful())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft() -> CustomerDraft {
        CustomerDraft {
            name: " Ana ".to_owned(),
            phone: "3005550101".to_owned(),
            address: "Cra 27 #45-10".to_owned(),
            city: "Floridablanca".to_owned(),
            neighborhood: "Lagos".to_owned(),
            payment: PaymentMethod::Transfer,
            fulfillment: FulfillmentKind::Delivery,
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 17, 0, 0)
            .single()
            .expect("valid instant")
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = CustomerCache::new(dir.path().join("nested").join("customer.json"));

        cache.save(&draft(), noon()).expect("save");
        let cached = cache.load(noon() + Duration::days(29)).expect("still valid");

        assert_eq!(cached.name, "Ana");
        assert_eq!(cached.payment, PaymentMethod::Transfer);
        assert_eq!(cached.to_draft().neighborhood, "Lagos");
        assert!(cache.has_customer(noon()));
    }

    #[test]
    fn expired_entries_are_removed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = CustomerCache::new(dir.path().join("customer.json"));
        cache.save(&draft(), noon()).expect("save");

        assert!(cache.load(noon() + Duration::days(31)).is_none());
        assert!(!cache.path().exists(), "expired file is deleted");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("customer.json");
        fs::write(&path, r#"{"name":"Luis","last_used":"2025-03-01T12:00:00Z"}"#).expect("write");

        let cached = CustomerCache::new(&path).load(noon()).expect("valid");
        assert_eq!(cached.payment, PaymentMethod::Cash);
        assert_eq!(cached.fulfillment, FulfillmentKind::Delivery);
        assert!(cached.phone.is_empty());
    }

    #[test]
    fn corrupt_or_missing_files_load_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("customer.json");
        let cache = CustomerCache::new(&path);

        assert!(cache.load(noon()).is_none());
        cache.clear().expect("clearing a missing file is fine");

        fs::write(&path, "{not json").expect("write");
        assert!(cache.load(noon()).is_none());
        assert!(!cache.has_customer(noon()));
    }
}
