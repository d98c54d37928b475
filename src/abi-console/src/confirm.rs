//! Two-phase confirmation of state-changing calls.
//!
//! A request parks the converted arguments under a token; the front-end later resolves the
//! token with an accept/decline decision. Only one request is pending at a time and a new
//! request replaces the previous one.

use abi_console_types::{FunctionDescriptor, TypedValue};

use crate::{errors::ConsoleError, render::FeeReadout};

/// Handle for a pending confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConfirmationToken(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmationState {
    Pending,
    Confirmed,
    Cancelled,
}

/// What the front-end shows while waiting for a decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub token: ConfirmationToken,
    pub prompt: String,
    pub estimate: FeeReadout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingConfirmation {
    token: ConfirmationToken,
    descriptor: FunctionDescriptor,
    args: Vec<TypedValue>,
    estimate: FeeReadout,
    state: ConfirmationState,
}

impl PendingConfirmation {
    pub fn token(&self) -> ConfirmationToken {
        self.token
    }

    pub fn descriptor(&self) -> &FunctionDescriptor {
        &self.descriptor
    }

    pub fn args(&self) -> &[TypedValue] {
        &self.args
    }

    pub fn estimate(&self) -> &FeeReadout {
        &self.estimate
    }

    pub fn state(&self) -> ConfirmationState {
        self.state
    }

    pub fn into_parts(self) -> (FunctionDescriptor, Vec<TypedValue>) {
        (self.descriptor, self.args)
    }
}

/// Holds at most one pending confirmation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfirmationSlot {
    next: u64,
    pending: Option<PendingConfirmation>,
}

impl ConfirmationSlot {
    /// Park `args` for `descriptor` and return the prompt for the front-end.
    pub fn request(
        &mut self,
        descriptor: FunctionDescriptor,
        args: Vec<TypedValue>,
        estimate: FeeReadout,
    ) -> ConfirmationRequest {
        self.next += 1;
        let token = ConfirmationToken(self.next);
        let request = ConfirmationRequest {
            token,
            prompt: format!("Are you sure you want to execute {}?", descriptor.name),
            estimate: estimate.clone(),
        };
        self.pending = Some(PendingConfirmation {
            token,
            descriptor,
            args,
            estimate,
            state: ConfirmationState::Pending,
        });
        request
    }

    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    /// Settle `token` and empty the slot. A token that is not the pending one is rejected
    /// and leaves the slot untouched.
    pub fn resolve(
        &mut self,
        token: ConfirmationToken,
        accept: bool,
    ) -> Result<PendingConfirmation, ConsoleError> {
        match self.pending.take() {
            Some(mut pending) if pending.token == token => {
                pending.state = if accept {
                    ConfirmationState::Confirmed
                } else {
                    ConfirmationState::Cancelled
                };
                Ok(pending)
            }
            other => {
                self.pending = other;
                Err(ConsoleError::input("no pending confirmation for this request"))
            }
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
