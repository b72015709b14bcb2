//! Connection plumbing shared by the cdpnav crates.
//!
//! * [`Connection`]: id-correlated request/response over a [`transport`],
//!   with events routed to the [`EventSink`] registered for their session.
//! * [`Context`]: the caller's cancellable scope bounding how long any
//!   command or wait may take.
//! * [`Error`]: the error type every layer returns.

pub mod connection;
pub mod context;
pub mod error;
pub mod session;
pub mod transport;

pub use connection::{Connection, EventSink};
pub use context::Context;
pub use error::{Error, Result};
pub use session::{Executor, Session};
pub use transport::{Transport, TransportParts, TransportReceiver};
