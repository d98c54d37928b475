//! Invocation flow: convert, call or confirm-then-submit, report.
//!
//! Every public entry point is one user action. Failures are written to the session status
//! before being returned, so the front-end never has to translate them itself.

use abi_console_types::{ContractCapability, FunctionDescriptor, TypedValue};
use alloy_primitives::TxHash;
use tracing::{debug, warn};

use crate::{
    confirm::{ConfirmationRequest, ConfirmationState, ConfirmationToken},
    errors::ConsoleError,
    render::FeeReadout,
    session::{Session, Status},
};

/// Result of pressing "Execute" on a panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    /// A read call finished; the formatted value is also in the session output.
    Output(String),
    /// A state-changing call waits for [`InvocationController::resolve`].
    AwaitingConfirmation(ConfirmationRequest),
}

/// Outcome of resolving a confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Cancelled,
    Confirmed(TxHash),
}

pub struct InvocationController<'a, C: ?Sized> {
    capability: &'a C,
}

impl<'a, C: ContractCapability + ?Sized> InvocationController<'a, C> {
    pub fn new(capability: &'a C) -> Self {
        Self { capability }
    }

    /// Convert `raw` against the descriptor's parameters, in order. The first failing field
    /// aborts the whole conversion.
    pub fn convert_args(
        session: &Session,
        descriptor: &FunctionDescriptor,
        raw: &[String],
    ) -> Result<Vec<TypedValue>, ConsoleError> {
        if raw.len() != descriptor.inputs.len() {
            return Err(ConsoleError::input(format!(
                "{} expects {} arguments, got {}",
                descriptor.signature(),
                descriptor.inputs.len(),
                raw.len()
            )));
        }

        let converter = session.converter();
        descriptor
            .inputs
            .iter()
            .zip(raw)
            .map(|(param, text)| {
                converter
                    .convert(text, &param.kind, param.name_hint())
                    .map_err(|source| ConsoleError::Conversion {
                        field: param.display_name().to_string(),
                        source,
                    })
            })
            .collect()
    }

    /// Execute the function shown in panel `index` with its current input values.
    pub async fn execute_panel(
        &self,
        session: &mut Session,
        index: usize,
    ) -> Result<Invocation, ConsoleError> {
        let (descriptor, raw) = match session.panel(index) {
            Ok(panel) => (panel.descriptor().clone(), panel.raw_values()),
            Err(err) => {
                session.report_error(&err);
                return Err(err);
            }
        };
        self.invoke(session, &descriptor, &raw).await
    }

    /// Read-only functions are called and formatted straight away. State-changing functions
    /// get a best-effort fee estimate and a confirmation request; nothing is submitted until
    /// the request is resolved.
    pub async fn invoke(
        &self,
        session: &mut Session,
        descriptor: &FunctionDescriptor,
        raw: &[String],
    ) -> Result<Invocation, ConsoleError> {
        let result = self.try_invoke(session, descriptor, raw).await;
        if let Err(err) = &result {
            session.report_error(err);
        }
        result
    }

    async fn try_invoke(
        &self,
        session: &mut Session,
        descriptor: &FunctionDescriptor,
        raw: &[String],
    ) -> Result<Invocation, ConsoleError> {
        let args = Self::convert_args(session, descriptor, raw)?;

        if descriptor.is_read_only() {
            let value = self.capability.call(descriptor, &args).await?;
            let output = session.formatter().format(&value);
            debug!(function = descriptor.signature(), %output, "read call returned");
            session.set_output(output.clone());
            return Ok(Invocation::Output(output));
        }

        let estimate = self.estimate(descriptor, &args).await;
        let request = self.request_confirmation(session, descriptor.clone(), args, estimate);
        Ok(Invocation::AwaitingConfirmation(request))
    }

    /// Park a converted call until the user decides.
    pub fn request_confirmation(
        &self,
        session: &mut Session,
        descriptor: FunctionDescriptor,
        args: Vec<TypedValue>,
        estimate: FeeReadout,
    ) -> ConfirmationRequest {
        session.confirmation.request(descriptor, args, estimate)
    }

    /// Settle a confirmation. Declining performs no call and leaves the status alone;
    /// accepting submits, reports `Submitted`, waits for finality and reports `Confirmed`.
    pub async fn resolve(
        &self,
        session: &mut Session,
        token: ConfirmationToken,
        accept: bool,
    ) -> Result<Resolution, ConsoleError> {
        let settled = match session.confirmation.resolve(token, accept) {
            Ok(settled) => settled,
            Err(err) => {
                session.report_error(&err);
                return Err(err);
            }
        };
        if settled.state() == ConfirmationState::Cancelled {
            debug!(function = settled.descriptor().signature(), "execution declined");
            return Ok(Resolution::Cancelled);
        }

        let (descriptor, args) = settled.into_parts();
        let tx = match self.capability.submit(&descriptor, &args).await {
            Ok(tx) => tx,
            Err(source) => {
                let err = ConsoleError::Call(source);
                session.report_error(&err);
                return Err(err);
            }
        };
        session.report(Status::Submitted(tx));

        // No timeout: a stalled wait leaves the status at `Submitted`.
        if let Err(source) = self.capability.await_finality(tx).await {
            let err = ConsoleError::Call(source);
            session.report_error(&err);
            return Err(err);
        }
        session.report(Status::Confirmed(tx));
        Ok(Resolution::Confirmed(tx))
    }

    /// Refresh the fee readout of panel `index` from its current inputs.
    pub async fn live_estimate(
        &self,
        session: &mut Session,
        index: usize,
    ) -> Result<FeeReadout, ConsoleError> {
        let (descriptor, raw) = {
            let panel = session.panel(index)?;
            (panel.descriptor().clone(), panel.raw_values())
        };

        let readout = match Self::convert_args(session, &descriptor, &raw) {
            Ok(args) => self.estimate(&descriptor, &args).await,
            Err(_) => FeeReadout::Unavailable,
        };
        session.panel_mut(index)?.set_fee(readout.clone());
        Ok(readout)
    }

    async fn estimate(&self, descriptor: &FunctionDescriptor, args: &[TypedValue]) -> FeeReadout {
        match self.capability.estimate_cost(descriptor, args).await {
            Ok(gas) => FeeReadout::Estimated(gas),
            Err(source) => {
                let err = ConsoleError::Estimation(source);
                warn!(function = descriptor.signature(), %err, "fee estimation failed");
                FeeReadout::Failed
            }
        }
    }
}
