use thiserror::Error;

/// Errors a [`Transport`] can report back to the dispatcher.
///
/// Never propagated into the `Queue`: a failed send is logged by the
/// dispatcher and the queue proceeds to its next iteration, matching the
/// source's fire-and-forget `send_msg` semantics.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport's underlying channel or connection is unavailable.
    #[error("transport unavailable: {0}")]
    Unavailable(String),
    /// The send itself failed (I/O error, remote rejection, etc).
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// The dispatcher's opaque handoff point for a popped message's payload or
/// a control-plane notification.
///
/// Corresponds to the source's `send_msg` call — the wire protocol to a
/// remote manager is explicitly out of scope here; this crate only defines
/// the seam and ships a couple of reference implementations in the agent
/// crate.
pub trait Transport: Send + Sync {
    /// Sends `payload`, best-effort. A returned `Err` is logged by the
    /// caller; it does not affect queue state.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the send could not be completed.
    fn send(&self, payload: &[u8]) -> Result<(), TransportError>;
}
