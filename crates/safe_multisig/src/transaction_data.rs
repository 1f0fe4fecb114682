use alloy_primitives::{Address, Bytes, TxHash, U256};
use serde::{Serialize, Serializer};

/// How the Safe dispatches the inner call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Call = 0,
    DelegateCall = 1,
}

impl OperationType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Serialize for OperationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// A single call to be executed (or bundled) by a Safe.
#[derive(Debug, Clone)]
pub struct MetaTransactionData {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: OperationType,
}

/// The full Safe transaction, pinned to a nonce. Gas fields stay zero: the
/// executing owner pays, no refunds are routed through the wallet.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeTransactionData {
    pub to: Address,
    #[serde(serialize_with = "decimal_string")]
    pub value: U256,
    pub data: Bytes,
    pub operation: OperationType,
    pub safe_tx_gas: u64,
    pub base_gas: u64,
    pub gas_price: u64,
    pub gas_token: Address,
    pub refund_receiver: Address,
    pub nonce: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposeTransactionBody {
    #[serde(flatten)]
    pub safe_tx: SafeTransactionData,
    pub contract_transaction_hash: TxHash,
    pub sender: Address,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

// The transaction service wants amounts as decimal strings, not the hex
// quantities alloy serializes by default.
fn decimal_string<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}
