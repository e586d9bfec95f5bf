//! Bridge E2E test suite.
//!
//! Drives the history client against an in-process host function table.
//!
//! Run with: cargo test --test bridge_e2e

mod test_helpers;

mod test_bridge_contract;
mod test_history_flow;
