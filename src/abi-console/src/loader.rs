//! Wallet connection and contract (re)loading.

use abi_console_types::{CapabilityError, ContractCapability};
use alloy_primitives::Address;
use tracing::{debug, warn};

use crate::{
    catalog::Catalog,
    constants::{DEFAULT_SCALE_FACTOR, OWNER_SIGNATURE},
    errors::ConsoleError,
    session::{Session, Status},
};

/// Parse a target contract address.
///
/// All-lower or all-upper hex is accepted as is; mixed case must be a valid EIP-55 checksum.
pub fn parse_target(text: &str) -> Result<Address, ConsoleError> {
    let text = text.trim();
    let invalid = || ConsoleError::input(format!("Invalid contract address `{text}`"));

    let hex = text.strip_prefix("0x").unwrap_or(text);
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        let prefixed = format!("0x{hex}");
        Address::parse_checksummed(prefixed, None).map_err(|_| invalid())
    } else {
        hex.parse::<Address>().map_err(|_| invalid())
    }
}

/// Ask the wallet for its active account and make it the session caller.
pub async fn connect<C: ContractCapability + ?Sized>(
    session: &mut Session,
    capability: &C,
) -> Result<Address, ConsoleError> {
    match capability.connect().await {
        Ok(caller) => {
            session.set_caller(caller);
            Ok(caller)
        }
        Err(source) => {
            let err = ConsoleError::Call(source);
            session.report_error(&err);
            Err(err)
        }
    }
}

/// Load `interface` for the contract at `target`.
///
/// On any input error the previous contract stays loaded. Once the catalog is in place the
/// scale factor and the privileged account are refreshed; failures there fall back to the
/// defaults instead of aborting the load.
pub async fn load<C: ContractCapability + ?Sized>(
    session: &mut Session,
    capability: &mut C,
    interface: &str,
    target: &str,
) -> Result<(), ConsoleError> {
    let result = try_load(session, capability, interface, target).await;
    if let Err(err) = &result {
        session.report_error(err);
    }
    result
}

async fn try_load<C: ContractCapability + ?Sized>(
    session: &mut Session,
    capability: &mut C,
    interface: &str,
    target: &str,
) -> Result<(), ConsoleError> {
    let target = parse_target(target)?;
    let catalog = Catalog::parse(interface)?;
    capability
        .attach(target, interface)
        .await
        .map_err(|err| match err {
            CapabilityError::Encoding(msg) => {
                ConsoleError::input(format!("invalid interface description: {msg}"))
            }
            other => ConsoleError::Call(other),
        })?;

    let has_owner = catalog
        .by_signature(OWNER_SIGNATURE)
        .map(|f| f.is_read_only())
        .unwrap_or(false);
    let functions = catalog.len();
    session.replace_catalog(catalog, target);

    let scale = match capability.query_scale_factor().await {
        Ok(scale) => scale,
        Err(err) => {
            warn!(%err, "decimals() unavailable, using default scale");
            DEFAULT_SCALE_FACTOR
        }
    };
    session.set_scale(scale);

    if has_owner {
        match capability.query_owner().await {
            Ok(owner) => session.set_privileged(Some(owner.to_checksum(None))),
            Err(err) => warn!(%err, "owner() query failed, privileged functions stay visible"),
        }
    }

    debug!(%target, functions, scale, "contract loaded");
    session.report(Status::Loaded { functions });
    Ok(())
}
