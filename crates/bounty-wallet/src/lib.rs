//! Wallet session management for the bounty board.
//!
//! Supplies the currently active wallet address to consumers and notifies
//! them when the connection state changes.

pub mod session;

pub use session::WalletSession;
