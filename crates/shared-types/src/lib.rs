//! # Shared Types Crate
//!
//! Vocabulary shared by every Hub component.
//!
//! ## Contents
//!
//! - **Identity**: `AccountId`, assigned upstream and never generated here.
//! - **Time**: `Timestamp` and the injectable `TimeSource` port.
//! - **Failures**: the caller-facing `ErrorKind` and the store-level `StoreError`.
//! - **Security**: the shared-secret `AccessGate` and the deterministic
//!   `CredentialGenerator` used by credential rotation and session creation.
//!
//! Component-specific entities (accounts, notifications) live in the
//! component crates; only what crosses a crate boundary is defined here.

pub mod errors;
pub mod security;
pub mod time;

pub use errors::*;
pub use security::*;
pub use time::*;

/// Opaque account identity supplied by the upstream identity collaborator.
pub type AccountId = String;

/// Executor recorded when a caller does not name one.
pub const SYSTEM_EXECUTOR: &str = "system";
