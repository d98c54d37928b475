//! Function catalog derived from a JSON interface description.

use abi_console_types::{FunctionDescriptor, ParameterSpec, StateMutability};
use serde::Deserialize;
use tracing::debug;

use crate::errors::ConsoleError;

/// One raw entry of a JSON ABI. Unknown fields (`indexed`, `anonymous`, `internalType`) are
/// ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AbiEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    state_mutability: Option<StateMutability>,
    // Pre-0.4.16 ABIs only carry these flags.
    #[serde(default)]
    constant: Option<bool>,
    #[serde(default)]
    payable: Option<bool>,
    #[serde(default)]
    inputs: Vec<ParameterSpec>,
    #[serde(default)]
    outputs: Vec<ParameterSpec>,
}

fn default_entry_type() -> String {
    "function".to_string()
}

impl AbiEntry {
    fn mutability(&self) -> StateMutability {
        if let Some(m) = self.state_mutability {
            return m;
        }
        match (self.constant, self.payable) {
            (Some(true), _) => StateMutability::View,
            (_, Some(true)) => StateMutability::Payable,
            _ => StateMutability::NonPayable,
        }
    }
}

/// Ordered function descriptors of the loaded interface.
///
/// Overloads are kept as separate entries; each is addressed by its signature.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    functions: Vec<FunctionDescriptor>,
}

impl Catalog {
    /// Parse an interface description and keep its `function` entries in source order.
    pub fn parse(interface: &str) -> Result<Self, ConsoleError> {
        let entries: Vec<AbiEntry> = serde_json::from_str(interface)
            .map_err(|e| ConsoleError::input(format!("invalid interface description: {e}")))?;

        let mut functions = Vec::new();
        for (index, entry) in entries.into_iter().enumerate() {
            if entry.kind != "function" {
                continue;
            }
            let mutability = entry.mutability();
            let name = match entry.name {
                Some(name) if !name.is_empty() => name,
                _ => {
                    return Err(ConsoleError::input(format!(
                        "function entry #{index} has no name"
                    )))
                }
            };
            functions.push(FunctionDescriptor::new(
                name,
                mutability,
                entry.inputs,
                entry.outputs,
            ));
        }

        debug!(functions = functions.len(), "built function catalog");
        Ok(Self { functions })
    }

    pub fn from_functions(functions: Vec<FunctionDescriptor>) -> Self {
        Self { functions }
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.functions.iter()
    }

    pub fn get(&self, index: usize) -> Option<&FunctionDescriptor> {
        self.functions.get(index)
    }

    pub fn by_signature(&self, signature: &str) -> Option<&FunctionDescriptor> {
        self.functions.iter().find(|f| f.signature() == signature)
    }

    /// Every overload sharing `name`.
    pub fn overloads<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FunctionDescriptor> {
        self.functions.iter().filter(move |f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = r#"[
        {"type":"constructor","inputs":[{"name":"supply","type":"uint256"}],"stateMutability":"nonpayable"},
        {"type":"function","name":"balanceOf","inputs":[{"name":"owner","type":"address"}],
         "outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"},
        {"type":"event","name":"Transfer","anonymous":false,"inputs":[
            {"indexed":true,"name":"from","type":"address"},
            {"indexed":true,"name":"to","type":"address"},
            {"indexed":false,"name":"value","type":"uint256"}]},
        {"type":"fallback","stateMutability":"payable"},
        {"type":"function","name":"transfer","inputs":[
            {"name":"to","type":"address"},{"name":"amount","type":"uint256"}],
         "outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"}
    ]"#;

    #[test]
    fn test_only_functions_are_cataloged() {
        let catalog = Catalog::parse(MIXED).unwrap();
        assert_eq!(catalog.len(), 2);
        let names: Vec<&str> = catalog.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["balanceOf", "transfer"]);
        assert_eq!(catalog.get(0).unwrap().state_mutability, StateMutability::View);
    }

    #[test]
    fn test_overloads_kept_separately() {
        let abi = r#"[
            {"type":"function","name":"safeTransferFrom","stateMutability":"nonpayable","inputs":[
                {"name":"from","type":"address"},{"name":"to","type":"address"},{"name":"id","type":"uint256"}]},
            {"type":"function","name":"safeTransferFrom","stateMutability":"nonpayable","inputs":[
                {"name":"from","type":"address"},{"name":"to","type":"address"},{"name":"id","type":"uint256"},
                {"name":"data","type":"bytes"}]}
        ]"#;
        let catalog = Catalog::parse(abi).unwrap();
        assert_eq!(catalog.overloads("safeTransferFrom").count(), 2);
        assert!(catalog
            .by_signature("safeTransferFrom(address,address,uint256,bytes)")
            .is_some());
    }

    #[test]
    fn test_legacy_flags() {
        let abi = r#"[
            {"name":"totalSupply","constant":true,"payable":false,"inputs":[],"outputs":[{"name":"","type":"uint256"}]},
            {"name":"deposit","constant":false,"payable":true,"inputs":[]},
            {"name":"approve","constant":false,"inputs":[{"name":"spender","type":"address"}]}
        ]"#;
        let catalog = Catalog::parse(abi).unwrap();
        let kinds: Vec<StateMutability> = catalog.iter().map(|f| f.state_mutability).collect();
        assert_eq!(
            kinds,
            [StateMutability::View, StateMutability::Payable, StateMutability::NonPayable]
        );
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(Catalog::parse("not json"), Err(ConsoleError::Input(_))));
        assert!(matches!(Catalog::parse("{\"abi\":[]}"), Err(ConsoleError::Input(_))));
        assert!(matches!(
            Catalog::parse(r#"[{"type":"function","inputs":[]}]"#),
            Err(ConsoleError::Input(_))
        ));
        assert!(Catalog::parse("[]").unwrap().is_empty());
    }
}
