//! Wire types for the DevTools page protocol.
//!
//! This crate contains the serde-serializable types exchanged with a browser
//! over its remote-debugging connection. These types represent the
//! "protocol layer": the shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization
//! * 1:1 with protocol: Field names match the protocol's JSON schema
//! * Stable: Changes only when the wire protocol changes
//!
//! The barrier and navigation APIs are built on top of these types in `cdpnav`.

pub mod command;
pub mod event;
pub mod types;

pub use command::*;
pub use event::*;
pub use types::*;
