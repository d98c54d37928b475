use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::{abi::FunctionDescriptor, values::ReturnValue, values::TypedValue};

/// Errors raised on the far side of the capability boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    /// Used by mocks or partially implemented capabilities.
    #[error("operation not supported by this capability")]
    NotImplemented,
    /// No contract has been attached yet.
    #[error("no contract loaded")]
    NotAttached,
    /// No signer is available for the requested operation.
    #[error("wallet not connected")]
    NoSigner,
    /// The loaded interface has no function with this signature.
    #[error("function `{0}` is not part of the loaded interface")]
    UnknownFunction(String),
    /// Arguments or return data could not be encoded/decoded.
    #[error("encoding failed: {0}")]
    Encoding(String),
    /// The node or wallet rejected the request.
    #[error("{0}")]
    Provider(String),
    /// The transaction disappeared before a receipt was produced.
    #[error("transaction {0} dropped before confirmation")]
    Dropped(TxHash),
    /// The transaction was mined but reverted.
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
}

/// Contract-interaction capability, implemented by a chain client in the front-end and by
/// mocks in tests.
///
/// Every operation is bound to a [`FunctionDescriptor`] rather than a bare name, so overloads
/// resolve to the exact signature that was rendered.
#[async_trait(?Send)]
pub trait ContractCapability {
    /// Request the active account from the wallet.
    async fn connect(&self) -> Result<Address, CapabilityError> {
        Err(CapabilityError::NotImplemented)
    }

    /// Bind the capability to a target contract and its interface description.
    async fn attach(&mut self, _target: Address, _interface: &str) -> Result<(), CapabilityError> {
        Ok(())
    }

    /// Query `decimals()` on the attached contract.
    async fn query_scale_factor(&self) -> Result<u8, CapabilityError> {
        Err(CapabilityError::NotImplemented)
    }

    /// Query `owner()` on the attached contract.
    async fn query_owner(&self) -> Result<Address, CapabilityError> {
        Err(CapabilityError::NotImplemented)
    }

    /// Read-only call.
    async fn call(
        &self,
        _function: &FunctionDescriptor,
        _args: &[TypedValue],
    ) -> Result<ReturnValue, CapabilityError> {
        Err(CapabilityError::NotImplemented)
    }

    /// Fee estimate (gas units) for a state-changing call.
    async fn estimate_cost(
        &self,
        _function: &FunctionDescriptor,
        _args: &[TypedValue],
    ) -> Result<U256, CapabilityError> {
        Err(CapabilityError::NotImplemented)
    }

    /// Sign and broadcast a state-changing call.
    async fn submit(
        &self,
        _function: &FunctionDescriptor,
        _args: &[TypedValue],
    ) -> Result<TxHash, CapabilityError> {
        Err(CapabilityError::NotImplemented)
    }

    /// Suspend until the submitted transaction is final.
    async fn await_finality(&self, _tx: TxHash) -> Result<(), CapabilityError> {
        Err(CapabilityError::NotImplemented)
    }
}
