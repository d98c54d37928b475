//! Session context: everything a console instance knows between user actions.
//!
//! State is replaced wholesale on the action that owns it (connect replaces the caller,
//! load replaces catalog/target/scale/owner and drops any pending confirmation, a filter
//! change replaces the panels).

use core::fmt;

use alloy_primitives::{Address, TxHash};
use tracing::{info, warn};

use crate::{
    access::{AccessFilter, CallerIdentity},
    catalog::Catalog,
    confirm::ConfirmationSlot,
    constants::{DEFAULT_SCALE_FACTOR, STATUS_HISTORY_LIMIT},
    convert::TypeConverter,
    errors::ConsoleError,
    format::ResultFormatter,
    render::{render, Filter, FunctionPanel},
};

/// Content of the status line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Connected(String),
    Loaded { functions: usize },
    Submitted(TxHash),
    Confirmed(TxHash),
    Error(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => f.write_str("Not connected"),
            Status::Connected(addr) => write!(f, "Connected: {addr}"),
            Status::Loaded { functions } => write!(f, "Contract loaded ({functions} functions)"),
            Status::Submitted(_) => f.write_str("Transaction sent... awaiting confirmation"),
            Status::Confirmed(_) => f.write_str("Transaction confirmed."),
            Status::Error(msg) => write!(f, "Error: {msg}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    identity: CallerIdentity,
    access: AccessFilter,
    catalog: Catalog,
    target: Option<Address>,
    scale: u8,
    filter: Filter,
    panels: Vec<FunctionPanel>,
    pub(crate) confirmation: ConfirmationSlot,
    status: Vec<Status>,
    reported: usize,
    output: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AccessFilter::default())
    }
}

impl Session {
    pub fn new(access: AccessFilter) -> Self {
        Self {
            identity: CallerIdentity::default(),
            access,
            catalog: Catalog::default(),
            target: None,
            scale: DEFAULT_SCALE_FACTOR,
            filter: Filter::All,
            panels: Vec::new(),
            confirmation: ConfirmationSlot::default(),
            status: vec![Status::Idle],
            reported: 0,
            output: None,
        }
    }

    pub fn identity(&self) -> &CallerIdentity {
        &self.identity
    }

    /// Record the connected account and re-apply the access filter.
    pub fn set_caller(&mut self, caller: Address) {
        let caller = caller.to_checksum(None);
        self.identity.caller = Some(caller.clone());
        self.report(Status::Connected(caller));
        self.rerender();
    }

    pub fn set_privileged(&mut self, privileged: Option<String>) {
        self.identity.privileged = privileged;
        self.rerender();
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn target(&self) -> Option<Address> {
        self.target
    }

    /// Swap in a freshly loaded interface. Pending confirmations and the privileged account
    /// belong to the previous contract and are dropped; the filter goes back to all.
    pub fn replace_catalog(&mut self, catalog: Catalog, target: Address) {
        self.catalog = catalog;
        self.target = Some(target);
        self.identity.privileged = None;
        self.confirmation.clear();
        self.filter = Filter::All;
        self.rerender();
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: u8) {
        self.scale = scale;
    }

    pub fn converter(&self) -> TypeConverter {
        TypeConverter::new(self.scale)
    }

    pub fn formatter(&self) -> ResultFormatter {
        ResultFormatter::new(self.scale)
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.rerender();
    }

    pub fn access(&self) -> &AccessFilter {
        &self.access
    }

    pub fn panels(&self) -> &[FunctionPanel] {
        &self.panels
    }

    pub fn panel(&self, index: usize) -> Result<&FunctionPanel, ConsoleError> {
        self.panels
            .get(index)
            .ok_or_else(|| ConsoleError::input(format!("no function panel #{index}")))
    }

    pub fn panel_mut(&mut self, index: usize) -> Result<&mut FunctionPanel, ConsoleError> {
        self.panels
            .get_mut(index)
            .ok_or_else(|| ConsoleError::input(format!("no function panel #{index}")))
    }

    /// Rebuild every panel from the catalog. Input values and expansion are not carried over.
    pub fn rerender(&mut self) {
        self.panels = render(&self.catalog, &self.filter, &self.access, &self.identity);
    }

    pub fn confirmation(&self) -> &ConfirmationSlot {
        &self.confirmation
    }

    pub fn status(&self) -> &Status {
        self.status.last().unwrap_or(&Status::Idle)
    }

    /// The most recent statuses, oldest first. At most [`STATUS_HISTORY_LIMIT`] are kept.
    pub fn status_history(&self) -> &[Status] {
        &self.status
    }

    /// Number of statuses reported since the session was created.
    pub fn reported(&self) -> usize {
        self.reported
    }

    /// Statuses reported after `mark` (a previous [`Session::reported`] value) that are still
    /// retained.
    pub fn status_since(&self, mark: usize) -> &[Status] {
        // The initial `Idle` sits at absolute position 0, report n at position n.
        let first = self.reported + 1 - self.status.len();
        let start = (mark + 1).saturating_sub(first).min(self.status.len());
        &self.status[start..]
    }

    pub fn report(&mut self, status: Status) {
        match &status {
            Status::Error(msg) => warn!(%msg, "action failed"),
            Status::Submitted(tx) => info!(%tx, "transaction submitted"),
            Status::Confirmed(tx) => info!(%tx, "transaction confirmed"),
            other => info!(status = %other, "status"),
        }
        self.status.push(status);
        self.reported += 1;
        if self.status.len() > STATUS_HISTORY_LIMIT {
            let excess = self.status.len() - STATUS_HISTORY_LIMIT;
            self.status.drain(..excess);
        }
    }

    pub fn report_error(&mut self, err: &ConsoleError) {
        self.report(Status::Error(err.to_string()));
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn set_output(&mut self, output: String) {
        self.output = Some(output);
    }
}
