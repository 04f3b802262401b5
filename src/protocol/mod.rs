/// Wire protocol module: request/reply envelopes and their binary encoding.
///
/// The protocol is strictly request/reply over one persistent stream:
/// the client sends a `Request`, the server answers with exactly one
/// `Reply`. There is no pipelining and the server never pushes.

pub mod constants;
pub mod message;
pub mod codec;
pub mod error;

pub use constants::{Command, Role, Status};
pub use error::ProtocolError;
pub use message::{AdditionalInfo, Reply, Request};
