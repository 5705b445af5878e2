//! Core types shared by the hookflow crates.
//!
//! This crate provides the strongly-typed identifiers and the `Result`
//! alias used throughout the flow engine and its transports.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{FlowId, IngestionId};
