//! `ContractCapability` backed by an ethers middleware stack.
//!
//! Functions are bound by selector when a contract is attached, so overloaded names always
//! resolve to the exact signature the panel was rendered from.

use std::{cell::Cell, collections::HashMap, sync::Arc};

use abi_console::types::{
    CapabilityError, ContractCapability, FunctionDescriptor, ParameterSpec, ReturnValue,
    TypedValue,
};
use alloy_primitives::{Address, TxHash, I256, U256};
use async_trait::async_trait;
use ethers::{
    abi::{
        token::{LenientTokenizer, Tokenizer},
        Abi, Function, ParamType, Token,
    },
    providers::{Middleware, PendingTransaction},
    types::{transaction::eip2718::TypedTransaction, TransactionRequest, H160, H256},
    utils::id,
};
use tracing::debug;

pub struct EthersContract<M> {
    client: Arc<M>,
    /// Account learned on connect when the middleware has no signer of its own.
    account: Cell<Option<H160>>,
    target: Option<H160>,
    functions: HashMap<[u8; 4], Function>,
}

impl<M: Middleware> EthersContract<M> {
    pub fn new(client: Arc<M>) -> Self {
        Self {
            client,
            account: Cell::new(None),
            target: None,
            functions: HashMap::new(),
        }
    }

    fn sender(&self) -> Option<H160> {
        self.client.default_sender().or(self.account.get())
    }

    fn target(&self) -> Result<H160, CapabilityError> {
        self.target.ok_or(CapabilityError::NotAttached)
    }

    fn function(&self, selector: [u8; 4], signature: &str) -> Result<&Function, CapabilityError> {
        self.functions
            .get(&selector)
            .ok_or_else(|| CapabilityError::UnknownFunction(signature.to_string()))
    }

    fn request(
        &self,
        function: &Function,
        args: &[TypedValue],
    ) -> Result<TypedTransaction, CapabilityError> {
        if function.inputs.len() != args.len() {
            return Err(CapabilityError::Encoding(format!(
                "{} expects {} arguments, got {}",
                function.signature(),
                function.inputs.len(),
                args.len()
            )));
        }
        let tokens = function
            .inputs
            .iter()
            .zip(args)
            .map(|(param, arg)| to_token(&param.kind, arg))
            .collect::<Result<Vec<_>, _>>()?;
        let data = function
            .encode_input(&tokens)
            .map_err(|e| CapabilityError::Encoding(e.to_string()))?;

        let mut tx = TransactionRequest::new().to(self.target()?).data(data);
        if let Some(from) = self.sender() {
            tx = tx.from(from);
        }
        Ok(tx.into())
    }

    async fn read(
        &self,
        function: &Function,
        args: &[TypedValue],
    ) -> Result<Vec<Token>, CapabilityError> {
        let tx = self.request(function, args)?;
        let raw = self.client.call(&tx, None).await.map_err(provider_error)?;
        function
            .decode_output(&raw)
            .map_err(|e| CapabilityError::Encoding(e.to_string()))
    }

    /// Call a zero-argument helper such as `decimals()` and return its only output.
    async fn read_helper(&self, signature: &str) -> Result<Token, CapabilityError> {
        let function = self.function(id(signature), signature)?;
        self.read(function, &[])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CapabilityError::Encoding(format!("{signature} returned nothing")))
    }
}

#[async_trait(?Send)]
impl<M: Middleware> ContractCapability for EthersContract<M> {
    async fn connect(&self) -> Result<Address, CapabilityError> {
        let account = match self.client.default_sender() {
            Some(from) => from,
            None => self
                .client
                .get_accounts()
                .await
                .map_err(provider_error)?
                .into_iter()
                .next()
                .ok_or(CapabilityError::NoSigner)?,
        };
        self.account.set(Some(account));
        Ok(Address::from(account.0))
    }

    async fn attach(&mut self, target: Address, interface: &str) -> Result<(), CapabilityError> {
        let abi: Abi = serde_json_abi(interface)?;
        self.functions = abi
            .functions()
            .map(|f| (f.short_signature(), f.clone()))
            .collect();
        self.target = Some(H160::from_slice(target.as_slice()));
        debug!(%target, functions = self.functions.len(), "attached");
        Ok(())
    }

    async fn query_scale_factor(&self) -> Result<u8, CapabilityError> {
        match self.read_helper("decimals()").await? {
            Token::Uint(value) if value <= ethers::types::U256::from(u8::MAX) => {
                Ok(value.low_u32() as u8)
            }
            other => Err(CapabilityError::Encoding(format!(
                "decimals() returned {other}"
            ))),
        }
    }

    async fn query_owner(&self) -> Result<Address, CapabilityError> {
        match self.read_helper("owner()").await? {
            Token::Address(owner) => Ok(Address::from(owner.0)),
            other => Err(CapabilityError::Encoding(format!("owner() returned {other}"))),
        }
    }

    async fn call(
        &self,
        descriptor: &FunctionDescriptor,
        args: &[TypedValue],
    ) -> Result<ReturnValue, CapabilityError> {
        let function = self.function(descriptor.selector(), descriptor.signature())?;
        let tokens = self.read(function, args).await?;
        Ok(to_return_value(tokens, &descriptor.outputs))
    }

    async fn estimate_cost(
        &self,
        descriptor: &FunctionDescriptor,
        args: &[TypedValue],
    ) -> Result<U256, CapabilityError> {
        let function = self.function(descriptor.selector(), descriptor.signature())?;
        let tx = self.request(function, args)?;
        let gas = self
            .client
            .estimate_gas(&tx, None)
            .await
            .map_err(provider_error)?;
        Ok(from_ethers_u256(gas))
    }

    async fn submit(
        &self,
        descriptor: &FunctionDescriptor,
        args: &[TypedValue],
    ) -> Result<TxHash, CapabilityError> {
        if self.sender().is_none() {
            return Err(CapabilityError::NoSigner);
        }
        let function = self.function(descriptor.selector(), descriptor.signature())?;
        let tx = self.request(function, args)?;
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(provider_error)?;
        Ok(TxHash::from(pending.tx_hash().0))
    }

    async fn await_finality(&self, tx: TxHash) -> Result<(), CapabilityError> {
        let receipt = PendingTransaction::new(H256::from(tx.0), self.client.provider())
            .await
            .map_err(|e| CapabilityError::Provider(e.to_string()))?
            .ok_or(CapabilityError::Dropped(tx))?;
        if receipt.status.map(|s| s.as_u64()) == Some(0) {
            return Err(CapabilityError::Reverted(tx));
        }
        Ok(())
    }
}

fn serde_json_abi(interface: &str) -> Result<Abi, CapabilityError> {
    // Only functions are bound. A missing `type` means function, missing params mean none.
    let entries: Vec<serde_json::Value> = serde_json::from_str(interface)
        .map_err(|e| CapabilityError::Encoding(e.to_string()))?;
    let functions: Vec<serde_json::Value> = entries
        .into_iter()
        .filter_map(|mut entry| {
            let object = entry.as_object_mut()?;
            let is_function = object
                .entry("type")
                .or_insert_with(|| serde_json::Value::from("function"))
                .as_str()
                == Some("function");
            for key in ["inputs", "outputs"] {
                object
                    .entry(key)
                    .or_insert_with(|| serde_json::Value::Array(Vec::new()));
            }
            is_function.then_some(entry)
        })
        .collect();
    serde_json::from_value(serde_json::Value::Array(functions))
        .map_err(|e| CapabilityError::Encoding(e.to_string()))
}

fn provider_error(err: impl std::fmt::Display) -> CapabilityError {
    CapabilityError::Provider(err.to_string())
}

fn to_ethers_u256(value: U256) -> ethers::types::U256 {
    ethers::types::U256::from_big_endian(&value.to_be_bytes::<32>())
}

fn from_ethers_u256(value: ethers::types::U256) -> U256 {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    U256::from_be_bytes(buf)
}

fn to_token(kind: &ParamType, arg: &TypedValue) -> Result<Token, CapabilityError> {
    let token = match (kind, arg) {
        (ParamType::Uint(_), TypedValue::Uint(v)) => Token::Uint(to_ethers_u256(*v)),
        (ParamType::Int(_), TypedValue::Int(v)) => Token::Int(to_ethers_u256(v.into_raw())),
        (ParamType::Bool, TypedValue::Bool(b)) => Token::Bool(*b),
        (ParamType::Address, TypedValue::Address(text)) => Token::Address(
            text.parse::<H160>()
                .map_err(|_| CapabilityError::Encoding(format!("invalid address `{text}`")))?,
        ),
        (kind, TypedValue::Text(text)) => LenientTokenizer::tokenize(kind, text)
            .map_err(|e| CapabilityError::Encoding(format!("{kind}: {e}")))?,
        (kind, other) => {
            return Err(CapabilityError::Encoding(format!(
                "cannot encode `{other}` as {kind}"
            )))
        }
    };
    Ok(token)
}

/// A single output is returned as is; several outputs become a list, like a multi-value
/// call result.
fn to_return_value(tokens: Vec<Token>, outputs: &[ParameterSpec]) -> ReturnValue {
    if tokens.len() == 1 {
        let token = tokens.into_iter().next().unwrap_or(Token::Tuple(Vec::new()));
        return from_token(token, outputs.first());
    }
    ReturnValue::List(
        tokens
            .into_iter()
            .enumerate()
            .map(|(i, token)| from_token(token, outputs.get(i)))
            .collect(),
    )
}

fn from_token(token: Token, spec: Option<&ParameterSpec>) -> ReturnValue {
    match token {
        Token::Address(a) => ReturnValue::Address(Address::from(a.0)),
        Token::Uint(v) => ReturnValue::Uint(from_ethers_u256(v)),
        Token::Int(v) => ReturnValue::Int(I256::from_raw(from_ethers_u256(v))),
        Token::Bool(b) => ReturnValue::Bool(b),
        Token::String(s) => ReturnValue::Text(s),
        Token::Bytes(b) | Token::FixedBytes(b) => ReturnValue::Bytes(b),
        // Array elements share the array's component layout.
        Token::Array(items) | Token::FixedArray(items) => {
            ReturnValue::List(items.into_iter().map(|t| from_token(t, spec)).collect())
        }
        Token::Tuple(items) => {
            let components = spec.map(|s| s.components.as_slice()).unwrap_or_default();
            let named = components.len() == items.len()
                && components.iter().all(|c| c.name.is_some());
            if named {
                ReturnValue::Record(
                    items
                        .into_iter()
                        .zip(components)
                        .map(|(t, c)| (c.display_name().to_string(), from_token(t, Some(c))))
                        .collect(),
                )
            } else {
                ReturnValue::List(
                    items
                        .into_iter()
                        .enumerate()
                        .map(|(i, t)| from_token(t, components.get(i)))
                        .collect(),
                )
            }
        }
    }
}
