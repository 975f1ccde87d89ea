//! Mock transport for deterministic testing of the display controller.
//!
//! [`MockTransport`] implements the [`Transport`] trait by recording every
//! write. Clones share the same recording, so a test can hand one clone to
//! the controller and keep another to inspect what went over the "wire".
//!
//! # Example
//!
//! ```
//! use samvfd_test_harness::MockTransport;
//!
//! let mock = MockTransport::new();
//! let observer = mock.clone();
//! // ... move `mock` into a controller, drive it, then:
//! assert!(observer.sent_bytes().is_empty());
//! ```

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

use samvfd_core::error::{Error, Result};
use samvfd_core::transport::Transport;

#[derive(Debug)]
struct MockState {
    /// Whether the transport is "connected".
    connected: bool,
    /// Log of all bytes accepted by this transport, one entry per `write()`.
    sent_log: Vec<Vec<u8>>,
    /// Maximum number of bytes a single `write()` accepts.
    write_limit: Option<usize>,
    /// When set, `reopen()` fails with [`Error::Connection`].
    fail_reopen: bool,
    reopen_count: usize,
}

/// A mock [`Transport`] for testing without hardware.
#[derive(Debug, Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create a new mock transport in the connected state.
    pub fn new() -> Self {
        MockTransport {
            state: Arc::new(Mutex::new(MockState {
                connected: true,
                sent_log: Vec::new(),
                write_limit: None,
                fail_reopen: false,
                reopen_count: 0,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the data accepted by each `write()` call, in order.
    pub fn sent_data(&self) -> Vec<Vec<u8>> {
        self.state().sent_log.clone()
    }

    /// Return every accepted byte as one flat stream, as the display saw it.
    pub fn sent_bytes(&self) -> Vec<u8> {
        self.state().sent_log.concat()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.state().sent_log.clear();
    }

    /// Cap the number of bytes a single `write()` accepts, simulating a
    /// short write. `None` removes the cap.
    pub fn set_write_limit(&self, limit: Option<usize>) {
        self.state().write_limit = limit;
    }

    /// Make subsequent `reopen()` calls fail.
    pub fn set_fail_reopen(&self, fail: bool) {
        self.state().fail_reopen = fail;
    }

    /// Number of successful `reopen()` calls.
    pub fn reopen_count(&self) -> usize {
        self.state().reopen_count
    }

    /// Set the connected state of the mock transport.
    ///
    /// When set to `false`, subsequent `write()` calls return
    /// [`Error::NotConnected`].
    pub fn set_connected(&self, connected: bool) {
        self.state().connected = connected;
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn write(&mut self, data: &[u8]) -> Result<usize> {
        let mut state = self.state();
        if !state.connected {
            return Err(Error::NotConnected);
        }

        let accepted = state
            .write_limit
            .map_or(data.len(), |limit| data.len().min(limit));
        state.sent_log.push(data[..accepted].to_vec());
        Ok(accepted)
    }

    async fn reopen(&mut self) -> Result<()> {
        let mut state = self.state();
        if state.fail_reopen {
            state.connected = false;
            return Err(Error::Connection("mock port refused to open".into()));
        }
        state.connected = true;
        state.reopen_count += 1;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.state().connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state().connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_transport_records_writes() {
        let mut mock = MockTransport::new();
        let observer = mock.clone();

        assert_eq!(mock.write(&[0x04, 0x40]).await.unwrap(), 2);
        assert_eq!(mock.write(&[0x1F]).await.unwrap(), 1);

        assert_eq!(observer.sent_data(), vec![vec![0x04, 0x40], vec![0x1F]]);
        assert_eq!(observer.sent_bytes(), vec![0x04, 0x40, 0x1F]);
    }

    #[tokio::test]
    async fn mock_transport_write_limit_truncates() {
        let mut mock = MockTransport::new();
        mock.set_write_limit(Some(3));

        let n = mock.write(&[1, 2, 3, 4, 5]).await.unwrap();
        assert_eq!(n, 3);
        assert_eq!(mock.sent_bytes(), vec![1, 2, 3]);

        mock.set_write_limit(Some(0));
        assert_eq!(mock.write(&[9]).await.unwrap(), 0);

        mock.set_write_limit(None);
        assert_eq!(mock.write(&[6, 7]).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn mock_transport_disconnect() {
        let mut mock = MockTransport::new();
        assert!(mock.is_connected());

        mock.close().await.unwrap();
        assert!(!mock.is_connected());

        let result = mock.write(&[0x01]).await;
        assert!(matches!(result.unwrap_err(), Error::NotConnected));
        assert!(mock.sent_bytes().is_empty());
    }

    #[tokio::test]
    async fn mock_transport_reopen() {
        let mut mock = MockTransport::new();
        mock.close().await.unwrap();

        mock.reopen().await.unwrap();
        assert!(mock.is_connected());
        assert_eq!(mock.reopen_count(), 1);

        mock.set_fail_reopen(true);
        let result = mock.reopen().await;
        assert!(matches!(result.unwrap_err(), Error::Connection(_)));
        assert!(!mock.is_connected());
    }

    #[tokio::test]
    async fn mock_transport_clear() {
        let mut mock = MockTransport::new();
        mock.write(&[0x13]).await.unwrap();
        mock.clear();
        assert!(mock.sent_data().is_empty());
    }
}
