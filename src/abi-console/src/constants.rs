//! Constants mirrored from the token conventions the console assumes.

/// Decimals used when the loaded contract does not answer `decimals()` (ERC-20 default).
pub const DEFAULT_SCALE_FACTOR: u8 = 18;

/// Functions hidden from everyone but the recognized privileged account.
pub const PRIVILEGED_FUNCTIONS: [&str; 2] = ["mint", "burn"];

/// Filter tabs offered above the function panels.
pub const FILTER_TABS: [&str; 4] = ["all", "mint", "burn", "transfer"];

/// Parameter-name fragments that mark an integer as a human-decimal amount.
pub const AMOUNT_HINTS: [&str; 2] = ["amount", "value"];

/// Zero-argument view queried on load to learn the privileged account.
pub const OWNER_SIGNATURE: &str = "owner()";

/// Statuses a session keeps for the front-end to replay.
pub const STATUS_HISTORY_LIMIT: usize = 32;
