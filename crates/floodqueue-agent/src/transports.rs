use std::io::Write;
use std::sync::Mutex;

use floodqueue::{Transport, TransportError};

/// Writes every payload to stdout, one line per message.
///
/// Useful as the demo transport and as a starting point for a real
/// transport that frames and forwards over a socket — the wire protocol
/// itself is out of scope for this crate.
#[derive(Debug, Default)]
pub struct StdoutTransport;

impl Transport for StdoutTransport {
    fn send(&self, payload: &[u8]) -> Result<(), TransportError> {
        let mut stdout = std::io::stdout();
        stdout
            .write_all(payload)
            .and_then(|()| stdout.write_all(b"\n"))
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }
}

/// Discards every payload. Useful for load-testing the queue and
/// dispatcher without any downstream I/O.
#[derive(Debug, Default)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn send(&self, _payload: &[u8]) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Buffers every payload in memory, for tests that need to assert on what
/// the dispatcher actually sent.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Vec<u8>>>,
}

impl RecordingTransport {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, payload: &[u8]) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(payload.to_vec());
        Ok(())
    }
}
