//! Inbound port: the validation API the ingress pipeline drives.

use crate::domain::entities::AcceptedMessage;
use crate::domain::errors::RejectReason;

/// Per-message validation entry point.
///
/// Implementations must be thread-safe; publications from distinct devices
/// are validated concurrently.
pub trait MessageValidatorApi: Send + Sync {
    /// Run the five checks against a raw publication.
    ///
    /// `transport_identity` is the identity the transport session vouched
    /// for; `raw` is the publication body with no transformation applied.
    /// On success the returned message carries the payload bytes exactly as
    /// they appeared on the wire.
    fn validate(
        &self,
        transport_identity: &str,
        raw: &[u8],
    ) -> Result<AcceptedMessage, RejectReason>;
}
