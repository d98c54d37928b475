use core::fmt;

use alloy_primitives::keccak256;
use serde::{Deserialize, Serialize};

/// Label used for parameters the interface description leaves unnamed.
pub const PARAM_PLACEHOLDER: &str = "param";

/// Mutability class of a contract function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

impl StateMutability {
    /// `view` and `pure` functions are served by a read call; everything else is a transaction.
    pub fn is_read_only(self) -> bool {
        matches!(self, StateMutability::Pure | StateMutability::View)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StateMutability::Pure => "pure",
            StateMutability::View => "view",
            StateMutability::NonPayable => "nonpayable",
            StateMutability::Payable => "payable",
        }
    }
}

impl fmt::Display for StateMutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single input or output slot of a function entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Declared Solidity type, eg `uint256`, `address[]`, `tuple`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Members of a `tuple` (or `tuple[]`) parameter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ParameterSpec>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name: if name.is_empty() { None } else { Some(name) },
            kind: kind.into(),
            components: Vec::new(),
        }
    }

    /// Name as declared, or `""` when absent.
    pub fn name_hint(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Name shown next to an input slot (`param` when the declaration is anonymous).
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => PARAM_PLACEHOLDER,
        }
    }

    /// Type as it appears in a canonical signature: tuples expand to `(a,b)` and keep their
    /// array suffix.
    pub fn canonical_type(&self) -> String {
        match self.kind.strip_prefix("tuple") {
            Some(suffix) => {
                let members: Vec<String> =
                    self.components.iter().map(ParameterSpec::canonical_type).collect();
                format!("({}){}", members.join(","), suffix)
            }
            None => self.kind.clone(),
        }
    }
}

/// A callable entry of a loaded interface description.
///
/// Built once per load and never mutated. The signature and selector bind every later
/// invocation to this exact overload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub name: String,
    pub state_mutability: StateMutability,
    pub inputs: Vec<ParameterSpec>,
    pub outputs: Vec<ParameterSpec>,
    signature: String,
    selector: [u8; 4],
}

impl FunctionDescriptor {
    pub fn new(
        name: impl Into<String>,
        state_mutability: StateMutability,
        inputs: Vec<ParameterSpec>,
        outputs: Vec<ParameterSpec>,
    ) -> Self {
        let name = name.into();
        let types: Vec<String> = inputs.iter().map(ParameterSpec::canonical_type).collect();
        let signature = format!("{}({})", name, types.join(","));

        let hash = keccak256(signature.as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&hash[0..4]);

        Self {
            name,
            state_mutability,
            inputs,
            outputs,
            signature,
            selector,
        }
    }

    /// Canonical signature, eg `transfer(address,uint256)`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// First four bytes of `keccak256(signature)`.
    pub fn selector(&self) -> [u8; 4] {
        self.selector
    }

    pub fn is_read_only(&self) -> bool {
        self.state_mutability.is_read_only()
    }
}

impl fmt::Display for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.state_mutability)
    }
}
