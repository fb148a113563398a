use crate::Principal;

/// Per-call values supplied by the hosting environment
///
/// The registry never derives these itself: the host authenticates the
/// caller and reads its clock, then threads the context into each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    /// Principal invoking the operation
    pub caller: Principal,
    /// Timestamp of the call in seconds, non-decreasing across calls
    pub now: u64,
}

impl CallerContext {
    pub fn new(caller: Principal, now: u64) -> Self {
        Self { caller, now }
    }
}
