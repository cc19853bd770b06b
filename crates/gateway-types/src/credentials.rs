//! Credential store: device identifier to shared secret resolution.
//!
//! The store is built once at startup from the persistent device table and
//! is immutable afterwards, so lookups take no lock. Refreshing credentials
//! requires a process restart.

use crate::entities::DeviceRecord;
use std::collections::HashMap;
use thiserror::Error;

/// Minimum accepted shared-secret length in bytes.
pub const MIN_SECRET_LEN: usize = 16;

/// Errors raised while building the store from loaded records.
///
/// All of these are fatal at startup; a store is never partially built.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with an empty device identifier.
    #[error("device record with empty device_id")]
    EmptyDeviceId,

    /// Two records share a device identifier.
    #[error("duplicate device_id {0:?} in credential source")]
    DuplicateDevice(String),

    /// A shared secret below the minimum length.
    #[error("secret for device {device_id:?} is {len} bytes, minimum is {MIN_SECRET_LEN}")]
    WeakSecret {
        /// The offending device.
        device_id: String,
        /// Actual secret length in bytes.
        len: usize,
    },
}

/// Immutable device-to-secret resolution.
#[derive(Debug, Default)]
pub struct CredentialStore {
    devices: HashMap<String, DeviceRecord>,
}

impl CredentialStore {
    /// Build a store from loaded records, validating every invariant the
    /// persistent table is supposed to guarantee.
    pub fn from_records(
        records: impl IntoIterator<Item = DeviceRecord>,
    ) -> Result<Self, StoreError> {
        let mut devices = HashMap::new();
        for record in records {
            if record.device_id.is_empty() {
                return Err(StoreError::EmptyDeviceId);
            }
            if record.shared_secret.len() < MIN_SECRET_LEN {
                return Err(StoreError::WeakSecret {
                    device_id: record.device_id,
                    len: record.shared_secret.len(),
                });
            }
            if let Some(previous) = devices.insert(record.device_id.clone(), record) {
                return Err(StoreError::DuplicateDevice(previous.device_id));
            }
        }
        Ok(Self { devices })
    }

    /// Resolve a device identifier to its record.
    pub fn lookup(&self, device_id: &str) -> Option<&DeviceRecord> {
        self.devices.get(device_id)
    }

    /// Number of provisioned devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether the store holds no devices.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
