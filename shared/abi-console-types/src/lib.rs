//! Shared types for interface descriptions, typed arguments, return values and the contract
//! capability boundary.

pub mod abi;
pub mod capability;
pub mod values;

pub use abi::{FunctionDescriptor, ParameterSpec, StateMutability, PARAM_PLACEHOLDER};
pub use capability::{CapabilityError, ContractCapability};
pub use values::{ReturnValue, TypedValue};
