//! Function panels: the form state rendered for each visible catalog entry.

use core::fmt;

use abi_console_types::FunctionDescriptor;
use alloy_primitives::U256;

use crate::{
    access::{AccessFilter, CallerIdentity},
    catalog::Catalog,
    constants::FILTER_TABS,
    errors::ConsoleError,
    format::format_fee,
};

/// Which catalog entries are shown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    /// Lower-cased substring matched against function names.
    Contains(String),
}

impl Filter {
    /// `all` (any case) selects everything; any other text becomes a substring filter.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("all") {
            Filter::All
        } else {
            Filter::Contains(text.to_lowercase())
        }
    }

    /// Preset tabs shown above the panels.
    pub fn tabs() -> Vec<Filter> {
        FILTER_TABS.iter().map(|t| Filter::parse(t)).collect()
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Contains(needle) => name.to_lowercase().contains(needle.as_str()),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("ALL"),
            Filter::Contains(needle) => f.write_str(&needle.to_uppercase()),
        }
    }
}

/// Live fee readout of a panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FeeReadout {
    /// Nothing typed yet.
    #[default]
    Empty,
    /// Inputs do not convert yet.
    Unavailable,
    /// The capability could not estimate.
    Failed,
    Estimated(U256),
}

impl fmt::Display for FeeReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeReadout::Empty => Ok(()),
            FeeReadout::Unavailable => f.write_str("Estimated Gas: -"),
            FeeReadout::Failed => f.write_str("Estimated Gas: Estimation Failed"),
            FeeReadout::Estimated(gas) => write!(f, "Estimated Gas: {}", format_fee(*gas)),
        }
    }
}

/// Labeled input of a panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputSlot {
    pub label: String,
    pub kind: String,
    pub name_hint: String,
    pub value: String,
}

/// Form state for one function. Independent of every other panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionPanel {
    descriptor: FunctionDescriptor,
    inputs: Vec<InputSlot>,
    fee: FeeReadout,
    expanded: bool,
}

impl FunctionPanel {
    pub fn new(descriptor: FunctionDescriptor) -> Self {
        let inputs = descriptor
            .inputs
            .iter()
            .map(|p| InputSlot {
                label: format!("{} ({})", p.display_name(), p.kind),
                kind: p.kind.clone(),
                name_hint: p.name_hint().to_string(),
                value: String::new(),
            })
            .collect();
        Self {
            descriptor,
            inputs,
            fee: FeeReadout::Empty,
            expanded: false,
        }
    }

    pub fn descriptor(&self) -> &FunctionDescriptor {
        &self.descriptor
    }

    /// `name (mutability)`
    pub fn header(&self) -> String {
        self.descriptor.to_string()
    }

    pub fn action_label(&self) -> String {
        format!("Execute {}", self.descriptor.name)
    }

    pub fn inputs(&self) -> &[InputSlot] {
        &self.inputs
    }

    pub fn set_input(&mut self, index: usize, text: impl Into<String>) -> Result<(), ConsoleError> {
        let name = &self.descriptor.name;
        let slot = self.inputs.get_mut(index).ok_or_else(|| {
            ConsoleError::input(format!("{name} has no input #{index}"))
        })?;
        slot.value = text.into();
        Ok(())
    }

    pub fn raw_values(&self) -> Vec<String> {
        self.inputs.iter().map(|slot| slot.value.clone()).collect()
    }

    pub fn fee(&self) -> &FeeReadout {
        &self.fee
    }

    pub fn set_fee(&mut self, fee: FeeReadout) {
        self.fee = fee;
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Expand or collapse the panel body.
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Text block for the terminal: header always, body only when expanded.
    pub fn render_text(&self) -> String {
        let mut out = self.header();
        if !self.expanded {
            return out;
        }
        for (i, slot) in self.inputs.iter().enumerate() {
            out.push_str(&format!("\n  [{i}] {}: {}", slot.label, slot.value));
        }
        let fee = self.fee.to_string();
        if !fee.is_empty() {
            out.push_str(&format!("\n  {fee}"));
        }
        out.push_str(&format!("\n  <{}>", self.action_label()));
        out
    }
}

/// Build one panel per catalog entry passing both the name filter and the access filter.
pub fn render(
    catalog: &Catalog,
    filter: &Filter,
    access: &AccessFilter,
    identity: &CallerIdentity,
) -> Vec<FunctionPanel> {
    catalog
        .iter()
        .filter(|f| filter.matches(&f.name))
        .filter(|f| access.allows(&f.name, identity))
        .cloned()
        .map(FunctionPanel::new)
        .collect()
}
