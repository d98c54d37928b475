//! Dynamic front-end core for arbitrary contract ABIs.
//!
//! Loads a JSON interface description, renders one form panel per function, converts the
//! user's text into typed arguments and drives the call: read-only functions are called
//! and their result formatted, state-changing functions go through a two-phase
//! confirmation before they are submitted.
//!
//! Chain access (signing, gas estimation, encoding, transport) lives behind
//! [`abi_console_types::ContractCapability`]; nothing here talks to a node directly.

pub mod access;
pub mod catalog;
pub mod confirm;
pub mod constants;
pub mod controller;
pub mod convert;
pub mod errors;
pub mod format;
pub mod loader;
pub mod mock;
pub mod render;
pub mod session;
pub mod units;

#[cfg(test)]
mod tests;

pub use abi_console_types as types;
pub use access::{AccessFilter, CallerIdentity};
pub use catalog::Catalog;
pub use confirm::{ConfirmationRequest, ConfirmationState, ConfirmationToken};
pub use controller::{Invocation, InvocationController, Resolution};
pub use convert::TypeConverter;
pub use errors::{ConsoleError, ConversionError};
pub use format::{format_fee, ResultFormatter};
pub use loader::{connect, load, parse_target};
pub use render::{FeeReadout, Filter, FunctionPanel};
pub use session::{Session, Status};
