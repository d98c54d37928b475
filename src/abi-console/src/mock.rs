//! Mock contract capability for testing.

use std::{cell::RefCell, collections::HashMap};

use abi_console_types::{
    CapabilityError, ContractCapability, FunctionDescriptor, ReturnValue, TypedValue,
};
use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

/// Mock capability for off-chain testing.
///
/// Answers are configured up front; every operation that reaches it is recorded so tests can
/// assert what was (or was not) sent.
#[derive(Debug, Default)]
pub struct MockContract {
    pub caller: Option<Address>,
    pub decimals: Option<u8>,
    pub owner: Option<Address>,
    pub estimate: Option<U256>,
    pub returns: HashMap<String, ReturnValue>,
    pub fail_submit: bool,
    pub fail_finality: bool,
    /// Refuse every interface on attach, as a chain library with a stricter ABI parser would.
    pub reject_interface: bool,
    pub attached: Option<Address>,
    log: RefCell<Vec<String>>,
}

impl MockContract {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_caller(mut self, caller: Address) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn with_owner(mut self, owner: Address) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_estimate(mut self, gas: u64) -> Self {
        self.estimate = Some(U256::from(gas));
        self
    }

    /// Answer read calls to `signature` with `value`.
    pub fn returning(mut self, signature: &str, value: ReturnValue) -> Self {
        self.returns.insert(signature.to_string(), value);
        self
    }

    /// Operations seen so far, eg `call:balanceOf(address)` or `submit:burn(uint256)`.
    pub fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.log.borrow().iter().filter(|e| e.starts_with(prefix)).count()
    }

    fn record(&self, entry: String) {
        self.log.borrow_mut().push(entry);
    }
}

#[async_trait(?Send)]
impl ContractCapability for MockContract {
    async fn connect(&self) -> Result<Address, CapabilityError> {
        self.caller.ok_or(CapabilityError::NoSigner)
    }

    async fn attach(&mut self, target: Address, _interface: &str) -> Result<(), CapabilityError> {
        if self.reject_interface {
            return Err(CapabilityError::Encoding("unsupported ABI entry".into()));
        }
        self.attached = Some(target);
        Ok(())
    }

    async fn query_scale_factor(&self) -> Result<u8, CapabilityError> {
        self.decimals
            .ok_or_else(|| CapabilityError::UnknownFunction("decimals()".into()))
    }

    async fn query_owner(&self) -> Result<Address, CapabilityError> {
        self.record("call:owner()".into());
        self.owner
            .ok_or_else(|| CapabilityError::UnknownFunction("owner()".into()))
    }

    async fn call(
        &self,
        function: &FunctionDescriptor,
        _args: &[TypedValue],
    ) -> Result<ReturnValue, CapabilityError> {
        self.record(format!("call:{}", function.signature()));
        self.returns
            .get(function.signature())
            .cloned()
            .ok_or_else(|| CapabilityError::Provider("execution reverted".into()))
    }

    async fn estimate_cost(
        &self,
        function: &FunctionDescriptor,
        _args: &[TypedValue],
    ) -> Result<U256, CapabilityError> {
        self.record(format!("estimate:{}", function.signature()));
        self.estimate
            .ok_or_else(|| CapabilityError::Provider("cannot estimate gas".into()))
    }

    async fn submit(
        &self,
        function: &FunctionDescriptor,
        _args: &[TypedValue],
    ) -> Result<TxHash, CapabilityError> {
        self.record(format!("submit:{}", function.signature()));
        if self.fail_submit {
            return Err(CapabilityError::Provider("user rejected transaction".into()));
        }
        Ok(TxHash::repeat_byte(0x11))
    }

    async fn await_finality(&self, tx: TxHash) -> Result<(), CapabilityError> {
        self.record("finality".into());
        if self.fail_finality {
            return Err(CapabilityError::Dropped(tx));
        }
        Ok(())
    }
}
