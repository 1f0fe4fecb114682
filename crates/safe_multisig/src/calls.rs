//! On-chain reads and calldata construction against the Safe contract.

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use alloy_transport::Transport;

use crate::{contracts::safe::Safe, transaction_data::SafeTransactionData};

pub async fn get_nonce<P, T>(safe: Address, provider: &P) -> eyre::Result<U256>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    let call = Safe::nonceCall::new(());

    let Safe::nonceReturn { _0: nonce } = call_and_decode(call, safe, provider).await?;

    Ok(nonce)
}

pub async fn get_owners<P, T>(safe: Address, provider: &P) -> eyre::Result<Vec<Address>>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    let call = Safe::getOwnersCall::new(());

    let Safe::getOwnersReturn { _0: owners } = call_and_decode(call, safe, provider).await?;

    Ok(owners)
}

pub async fn get_threshold<P, T>(safe: Address, provider: &P) -> eyre::Result<U256>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    let call = Safe::getThresholdCall::new(());

    let Safe::getThresholdReturn { _0: threshold } = call_and_decode(call, safe, provider).await?;

    Ok(threshold)
}

pub async fn is_owner<P, T>(address: Address, safe: Address, provider: &P) -> eyre::Result<bool>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    let call = Safe::isOwnerCall::new((address,));

    let Safe::isOwnerReturn { _0: is_owner } = call_and_decode(call, safe, provider).await?;

    Ok(is_owner)
}

/// Asks the wallet for the hash it will verify signatures against for the
/// given transaction at its pinned nonce.
pub async fn get_transaction_hash<P, T>(
    safe_tx: &SafeTransactionData,
    safe: Address,
    provider: &P,
) -> eyre::Result<B256>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    let call = Safe::getTransactionHashCall::new((
        safe_tx.to,
        safe_tx.value,
        safe_tx.data.clone(),
        safe_tx.operation.as_u8(),
        U256::from(safe_tx.safe_tx_gas),
        U256::from(safe_tx.base_gas),
        U256::from(safe_tx.gas_price),
        safe_tx.gas_token,
        safe_tx.refund_receiver,
        U256::from(safe_tx.nonce),
    ));

    let Safe::getTransactionHashReturn { _0: tx_hash } =
        call_and_decode(call, safe, provider).await?;

    Ok(tx_hash)
}

/// Builds the calldata that executes `safe_tx` on the wallet with the
/// given signatures blob.
pub fn exec_transaction_calldata(safe_tx: &SafeTransactionData, signatures: &[u8]) -> Bytes {
    let call = Safe::execTransactionCall::new((
        safe_tx.to,
        safe_tx.value,
        safe_tx.data.clone(),
        safe_tx.operation.as_u8(),
        U256::from(safe_tx.safe_tx_gas),
        U256::from(safe_tx.base_gas),
        U256::from(safe_tx.gas_price),
        safe_tx.gas_token,
        safe_tx.refund_receiver,
        Bytes::copy_from_slice(signatures),
    ));

    call.abi_encode().into()
}

/// Pre-validated owner signature: `r` holds the owner address, `s` is
/// unused, `v = 1`. The wallet accepts it when that owner is the account
/// submitting the execution transaction.
pub fn pre_validated_signature(owner: Address) -> Vec<u8> {
    let mut signature = [0u8; 65];
    signature[12..32].copy_from_slice(owner.as_slice());
    signature[64] = 1;
    signature.to_vec()
}

/// Private function to make a contract call and decode the response
async fn call_and_decode<C, P, T>(call: C, to: Address, provider: &P) -> eyre::Result<C::Return>
where
    C: SolCall,
    P: Provider<T>,
    T: Transport + Clone,
{
    let mut req = TransactionRequest::default().to(to);
    req.set_input(call.abi_encode());

    let data = provider.call(&req).await?;
    let data = C::abi_decode_returns(data.as_ref(), true)?;

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction_data::OperationType;

    #[test]
    fn pre_validated_signature_layout() {
        let owner = Address::repeat_byte(0xab);
        let signature = pre_validated_signature(owner);

        assert_eq!(signature.len(), 65);
        assert_eq!(&signature[..12], &[0u8; 12]);
        assert_eq!(&signature[12..32], owner.as_slice());
        assert_eq!(&signature[32..64], &[0u8; 32]);
        assert_eq!(signature[64], 1);
    }

    #[test]
    fn exec_calldata_round_trips() {
        let safe_tx = SafeTransactionData {
            to: Address::repeat_byte(0x42),
            value: U256::ZERO,
            data: Bytes::from(vec![0xde, 0xad]),
            operation: OperationType::DelegateCall,
            safe_tx_gas: 0,
            base_gas: 0,
            gas_price: 0,
            gas_token: Address::ZERO,
            refund_receiver: Address::ZERO,
            nonce: 9,
        };
        let owner = Address::repeat_byte(0xab);

        let calldata = exec_transaction_calldata(&safe_tx, &pre_validated_signature(owner));
        let decoded = Safe::execTransactionCall::abi_decode(calldata.as_ref(), true).unwrap();

        assert_eq!(decoded.to, safe_tx.to);
        assert_eq!(decoded.data, safe_tx.data);
        assert_eq!(decoded.operation, OperationType::DelegateCall.as_u8());
        assert_eq!(decoded.signatures.len(), 65);
    }
}
