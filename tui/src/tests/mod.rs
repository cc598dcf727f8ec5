//! Test modules for the LedgerWatch TUI.
//!
//! - `app_test` - load states, toasts and network-message handling
//! - `market_test` - synthesized market data invariants
//! - `pages_test` - per-page state machines and form validation

mod market_test;
mod pages_test;
