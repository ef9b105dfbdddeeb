use bounty_types::WalletAddress;
use tokio::sync::watch;
use tracing::info;

/// Active wallet session: at most one connected address at a time.
///
/// State lives in a watch channel, so `current()` reads are atomic with
/// respect to connect/disconnect and every change notifies subscribers.
pub struct WalletSession {
    state: watch::Sender<Option<WalletAddress>>,
}

impl WalletSession {
    /// Create a disconnected session.
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self { state }
    }

    /// Connect a wallet, replacing any previously active address.
    pub fn connect(&self, address: WalletAddress) {
        info!(address = %address, "🔗 Wallet connected");
        self.state.send_replace(Some(address));
    }

    /// Disconnect the active wallet, if any.
    pub fn disconnect(&self) {
        if let Some(previous) = self.state.send_replace(None) {
            info!(address = %previous, "🔌 Wallet disconnected");
        }
    }

    /// The currently active wallet address, or `None` when disconnected.
    ///
    /// Side-effect free and safe to call repeatedly.
    pub fn current(&self) -> Option<WalletAddress> {
        self.state.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Observe connect/disconnect changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<WalletAddress>> {
        self.state.subscribe()
    }
}

impl Default for WalletSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_disconnected() {
        let session = WalletSession::new();
        assert!(session.current().is_none());
        assert!(!session.is_connected());
    }

    #[test]
    fn test_connect_and_disconnect() {
        let session = WalletSession::new();

        session.connect(WalletAddress::from("0xAA"));
        assert_eq!(session.current(), Some(WalletAddress::from("0xAA")));
        assert!(session.is_connected());

        session.disconnect();
        assert!(session.current().is_none());
    }

    #[test]
    fn test_connect_replaces_active_address() {
        let session = WalletSession::new();

        session.connect(WalletAddress::from("0xAA"));
        session.connect(WalletAddress::from("0xBB"));

        assert_eq!(session.current(), Some(WalletAddress::from("0xBB")));
    }

    #[tokio::test]
    async fn test_subscribers_notified_on_change() {
        let session = WalletSession::new();
        let mut rx = session.subscribe();

        session.connect(WalletAddress::from("0xAA"));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Some(WalletAddress::from("0xAA")));

        session.disconnect();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), None);
    }
}
