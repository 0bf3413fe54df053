/// Classification for retry policy.
///
/// Used by the adapter registry to decide whether a failed fetch is attempted
/// again.
///
/// | Class | Retried? |
/// |-------|----------|
/// | `Never` | No |
/// | `WithBackoff` | Yes, after an exponentially growing delay |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - unexpected page shape, missing field, invalid value.
    /// The same request would fail the same way.
    Never,

    /// Transient network failure (timeout, connection reset, 429, 5xx).
    WithBackoff,
}
