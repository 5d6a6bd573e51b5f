//! # Account Action State Machine (hub-01)
//!
//! Applies one of a fixed set of mutually exclusive account actions
//! atomically against an account record and appends an immutable,
//! sequentially numbered audit entry describing the mutation.
//!
//! ## Actions
//!
//! | action | precondition | audit value |
//! |--------|--------------|-------------|
//! | credit | `amount > 0` | `+amount` |
//! | debit | `amount > 0`, `balance >= amount` | `-amount` |
//! | suspend | justification | optional expiry |
//! | reinstate | justification | optional expiry |
//! | rotate-credential | justification | new credential |
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement | Location |
//! |-----------|-------------|----------|
//! | Balance never negative | unsigned balance, checked debit | domain/actions.rs |
//! | Audit sequence is `1..=len` | append-only log, numbered on append | domain/entities.rs |
//! | No interleaved read-modify-write | versioned compare-and-swap with bounded retry | service/mod.rs |
//! | Rejected actions persist nothing | validate before mutate, write only on success | domain/actions.rs |
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): account entities and pure transitions
//! - **Ports Layer** (`ports/`): `AccountActionApi`, `SessionApi`, `AccountStore`
//! - **Service Layer** (`service/`): optimistic write loop wiring ports to domain
//! - **Adapters Layer** (`adapters/`): in-memory store

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryAccountStore;
pub use domain::{
    Account, AccountAction, AccountConfig, AccountError, ActionParams, ActionRequest,
    AuditDetail, AuditEntry, AuditKind, Precondition, DEFAULT_MAX_CONFLICT_RETRIES,
    DEFAULT_QUOTA,
};
pub use ports::{
    AccountActionApi, AccountStore, CasOutcome, SessionApi, SessionOutcome, SessionRequest,
};
pub use service::AccountService;
