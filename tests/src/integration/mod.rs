//! # Integration Flows
//!
//! End-to-end flows through the runtime dispatcher: access gate, request
//! decoding, component services, in-memory stores and status mapping.

pub mod accounts;
pub mod feed;
pub mod gate;
