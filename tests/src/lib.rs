//! # Hub Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # TestHub: in-memory hub driven through the dispatcher
//! └── integration/      # Cross-crate flows
//!     ├── accounts.rs   # sessions, actions, audit trail
//!     ├── feed.rs       # broadcast/private feeds and marks
//!     └── gate.rs       # access gate and envelope handling
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hub-tests
//! cargo bench -p hub-tests
//! ```

pub mod fixtures;
pub mod integration;
