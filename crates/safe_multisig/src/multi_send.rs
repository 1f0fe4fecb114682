//! Bundling of several calls into a single atomic Safe transaction.

use std::str::FromStr;

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;

use crate::{
    contracts::multi_send::MultiSend,
    transaction_data::{MetaTransactionData, OperationType},
};

/// Canonical `MultiSendCallOnly` v1.3.0 deployment, shared across the
/// supported chains. The call-only variant is deliberate: bundled steps are
/// plain calls, a delegatecall smuggled into the bundle must fail.
pub const MULTI_SEND_CALL_ONLY: &str = "0x40A2aCCbd92BCA938b02010E17A5b8929b49130D";

/// Collapses an ordered call sequence into the single transaction a Safe
/// executes atomically.
///
/// One call passes through untouched; several become one `multiSend`
/// delegatecall preserving the input order, which is load-bearing: earlier
/// calls establish state (an allowance) that later ones rely on.
pub fn bundle_transactions(txs: &[MetaTransactionData]) -> eyre::Result<MetaTransactionData> {
    match txs {
        [] => eyre::bail!("Cannot bundle an empty transaction list"),
        [tx] => Ok(tx.clone()),
        txs => {
            let mut transactions = Vec::new();
            for tx in txs {
                if tx.operation != OperationType::Call {
                    eyre::bail!("Only plain calls can be bundled");
                }
                transactions.extend_from_slice(&encode_packed_transaction(tx));
            }

            let call = MultiSend::multiSendCall::new((transactions.into(),));

            Ok(MetaTransactionData {
                to: Address::from_str(MULTI_SEND_CALL_ONLY)?,
                value: U256::ZERO,
                data: call.abi_encode().into(),
                operation: OperationType::DelegateCall,
            })
        }
    }
}

/// Packs one call for `multiSend`: operation (1 byte), to (20), value
/// (32), data length (32), data.
fn encode_packed_transaction(tx: &MetaTransactionData) -> Vec<u8> {
    let mut out = Vec::with_capacity(85 + tx.data.len());
    out.push(tx.operation.as_u8());
    out.extend_from_slice(tx.to.as_slice());
    out.extend_from_slice(&tx.value.to_be_bytes::<32>());
    out.extend_from_slice(&U256::from(tx.data.len()).to_be_bytes::<32>());
    out.extend_from_slice(&tx.data);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Bytes;

    fn call(to_byte: u8, data: Vec<u8>) -> MetaTransactionData {
        MetaTransactionData {
            to: Address::repeat_byte(to_byte),
            value: U256::ZERO,
            data: Bytes::from(data),
            operation: OperationType::Call,
        }
    }

    #[test]
    fn single_call_passes_through_unbundled() {
        let tx = call(0x11, vec![0x01]);
        let bundled = bundle_transactions(std::slice::from_ref(&tx)).unwrap();

        assert_eq!(bundled.to, tx.to);
        assert_eq!(bundled.data, tx.data);
        assert_eq!(bundled.operation, OperationType::Call);
    }

    #[test]
    fn bundle_preserves_call_order() {
        let approval = call(0x11, vec![0xaa; 4]);
        let presign = call(0x22, vec![0xbb; 4]);

        let bundled = bundle_transactions(&[approval.clone(), presign.clone()]).unwrap();
        assert_eq!(bundled.operation, OperationType::DelegateCall);
        assert_eq!(bundled.to, Address::from_str(MULTI_SEND_CALL_ONLY).unwrap());

        let decoded =
            MultiSend::multiSendCall::abi_decode(bundled.data.as_ref(), true).unwrap();
        let packed = decoded.transactions.as_ref();

        let expected = [
            encode_packed_transaction(&approval),
            encode_packed_transaction(&presign),
        ]
        .concat();
        assert_eq!(packed, expected.as_slice());

        // The approval call's payload sits strictly before the
        // pre-signature call's payload in the packed stream.
        let approval_at = packed
            .windows(approval.data.len())
            .position(|w| w == approval.data.as_ref())
            .unwrap();
        let presign_at = packed
            .windows(presign.data.len())
            .position(|w| w == presign.data.as_ref())
            .unwrap();
        assert!(approval_at < presign_at);
    }

    #[test]
    fn empty_bundle_is_rejected() {
        assert!(bundle_transactions(&[]).is_err());
    }

    #[test]
    fn delegatecalls_cannot_be_bundled() {
        let mut inner = call(0x11, vec![0x01]);
        inner.operation = OperationType::DelegateCall;

        assert!(bundle_transactions(&[inner, call(0x22, vec![0x02])]).is_err());
    }
}
