//! Outbound ports: dependencies the validator needs from its host.

/// Time source trait for testability.
///
/// Wall clock, not monotonic: large backward jumps are tolerated and only
/// cause fresh messages to be rejected until the clock realigns.
pub trait TimeSource: Send + Sync {
    /// Current wall-clock seconds since the Unix epoch.
    fn now(&self) -> i64;
}

/// System time implementation.
#[derive(Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            // Clock before the Unix epoch - freshness will reject everything
            // until it realigns, which is the documented behavior for a
            // misaligned clock.
            .unwrap_or(0)
    }
}
