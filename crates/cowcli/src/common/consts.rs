/// Networks the workflow supports.
pub const SUPPORTED_CHAIN_IDS: [u64; 3] = [1, 100, 11155111];

/// Confirmations awaited after a transaction is first included.
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

/// How long to wait for a transaction to confirm before reporting it as
/// stuck, in seconds.
pub const DEFAULT_TX_TIMEOUT_SECS: u64 = 120;

pub fn is_supported_chain(chain_id: u64) -> bool {
    SUPPORTED_CHAIN_IDS.contains(&chain_id)
}
