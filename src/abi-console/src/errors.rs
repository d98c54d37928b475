use abi_console_types::CapabilityError;

/// Errors during argument conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("invalid {kind} value `{text}`")]
    InvalidNumber { kind: String, text: String },
    #[error("`{text}` does not fit in {kind}")]
    Overflow { kind: String, text: String },
    #[error("negative value `{text}` for unsigned {kind}")]
    Negative { kind: String, text: String },
    #[error("`{text}` has more than {decimals} fractional digits")]
    TooManyDecimals { text: String, decimals: u8 },
}

/// Errors surfaced to the user at the boundary of a single action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsoleError {
    /// Malformed interface description, target address or request.
    #[error("{0}")]
    Input(String),
    /// One field failed to convert; the invocation was aborted before any call.
    #[error("{field}: {source}")]
    Conversion {
        field: String,
        #[source]
        source: ConversionError,
    },
    /// Fee estimation failed. Never fatal.
    #[error("estimation failed: {0}")]
    Estimation(#[source] CapabilityError),
    /// Read call, submission or finality wait failed.
    #[error("{0}")]
    Call(#[from] CapabilityError),
}

impl ConsoleError {
    pub fn input(msg: impl Into<String>) -> Self {
        ConsoleError::Input(msg.into())
    }
}
