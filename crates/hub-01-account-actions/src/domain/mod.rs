//! # Domain Layer
//!
//! Pure domain logic for the Account Action State Machine.
//!
//! - `entities`: Account and its append-only audit trail
//! - `actions`: the closed set of account actions and their transitions
//! - `errors`: precondition and service failures
//! - `value_objects`: tunables
//!
//! This module contains NO I/O dependencies. Persistence is reached only
//! through the ports in the `ports` module.

pub mod actions;
pub mod entities;
pub mod errors;
pub mod value_objects;

pub use actions::*;
pub use entities::*;
pub use errors::*;
pub use value_objects::*;
