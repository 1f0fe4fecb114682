//! Threshold-signature coordination for Safe-held trading accounts.
//!
//! Everything the order needs on chain (the approval, the pre-signature)
//! is bundled into exactly one Safe transaction and proposed to the
//! transaction service; atomicity across those steps is the whole point of
//! routing through the coordinator.

use std::str::FromStr;

use alloy_primitives::{hex::ToHexExt, Address, Bytes, U256};
use alloy_provider::Provider;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolCall;
use alloy_transport::Transport;
use colored::Colorize;
use prettytable::{row, Table};
use url::Url;

use orderbook::{
    order::{OrderCreation, OrderData, SigningScheme},
    OrderbookClient,
};
use safe_multisig::{
    calls as safe_calls, multi_send,
    transaction_data::{MetaTransactionData, OperationType},
    SafeClient, SafeInfo,
};

use crate::{
    protocol::{consts::get_settlement, contracts::settlement::GPv2Settlement, OnchainOperation},
    prompt::{require_confirmation, UserPrompt},
    tx,
    utils::{print_loading_until_async, print_success_message},
};

pub(crate) struct SafeSubmission<'a> {
    pub safe: Address,
    pub signer: &'a PrivateKeySigner,
    pub order: OrderData,
    pub preparatory_ops: Vec<OnchainOperation>,
    pub chain_id: u64,
    pub rpc_url: &'a Url,
    pub confirmations: u64,
    pub timeout: u64,
}

/// Drives a pre-signature submission through the coordination service and
/// returns the order identifier.
pub(crate) async fn coordinate_presign_submission<P, T>(
    submission: SafeSubmission<'_>,
    orderbook: &OrderbookClient,
    provider: &P,
    prompt: &dyn UserPrompt,
) -> eyre::Result<String>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    let SafeSubmission {
        safe,
        signer,
        order,
        preparatory_ops,
        chain_id,
        rpc_url,
        confirmations,
        timeout,
    } = submission;

    let safe_client = SafeClient::new(chain_id)?;
    let info = print_loading_until_async(
        "Fetching Safe metadata",
        safe_client.fetch_info(safe, provider),
    )
    .await?;
    print_safe_info(safe, &info);

    let sender = signer.address();
    if !info.owners.contains(&sender) {
        eyre::bail!("Signer {} is not an owner of Safe {}", sender, safe);
    }

    // The order has to exist in the book before the on-chain pre-signature
    // can refer to anything.
    require_confirmation(
        prompt,
        "Post the order to the order book with the pre-sign scheme?",
    )?;
    let creation = OrderCreation {
        order,
        from: safe,
        signature: safe.as_slice().encode_hex_with_prefix(),
        signing_scheme: SigningScheme::PreSign,
    };
    let uid = print_loading_until_async("Posting order", orderbook.create_order(&creation)).await?;
    print_success_message(&format!("Order {} created, awaiting its pre-signature", uid));

    let operations = build_operation_sequence(preparatory_ops, chain_id, &uid)?;
    println!("\nOperations bundled into one Safe transaction:");
    for (index, operation) in operations.iter().enumerate() {
        println!("  {}. {}", index + 1, operation.description);
    }

    let meta_txs: Vec<MetaTransactionData> = operations.iter().map(to_meta_transaction).collect();
    let bundled = multi_send::bundle_transactions(&meta_txs)?;

    let (safe_tx, safe_tx_hash) = print_loading_until_async(
        "Proposing the transaction to the Safe transaction service",
        safe_client.propose_transaction(safe, signer, bundled, provider),
    )
    .await?;
    print_success_message(&format!("Safe transaction proposed: {safe_tx_hash:#x}"));

    let remaining = additional_signatures_required(info.threshold);
    if remaining == 0 {
        require_confirmation(
            prompt,
            "The signing threshold is already met. Execute the Safe transaction now?",
        )?;

        let signatures = safe_calls::pre_validated_signature(sender);
        let execute = OnchainOperation {
            description: format!("execute Safe transaction {safe_tx_hash:#x}"),
            to: safe,
            value: U256::ZERO,
            data: safe_calls::exec_transaction_calldata(&safe_tx, &signatures),
        };
        tx::send_operation(rpc_url, signer, &execute, confirmations, timeout, chain_id).await?;
    } else {
        println!(
            "{}",
            format!(
                "Proposal created. {} more owner signature(s) are required before the transaction can execute.",
                remaining
            )
            .bright_yellow()
        );
    }

    Ok(uid)
}

/// Appends the pre-signature after the preparatory steps. The allowance
/// must exist before settlement can draw funds, so the approval keeps its
/// slot ahead of the pre-signature.
fn build_operation_sequence(
    preparatory: Vec<OnchainOperation>,
    chain_id: u64,
    order_uid: &str,
) -> eyre::Result<Vec<OnchainOperation>> {
    let mut operations = preparatory;
    operations.push(presign_operation(chain_id, order_uid)?);
    Ok(operations)
}

fn presign_operation(chain_id: u64, order_uid: &str) -> eyre::Result<OnchainOperation> {
    let settlement = get_settlement(chain_id)?;
    let uid = Bytes::from_str(order_uid)?;
    let call = GPv2Settlement::setPreSignatureCall::new((uid, true));

    Ok(OnchainOperation {
        description: format!(
            "mark order {} as pre-signed on the settlement contract",
            order_uid
        ),
        to: settlement,
        value: U256::ZERO,
        data: call.abi_encode().into(),
    })
}

/// Signatures still missing once the proposer's own is counted.
fn additional_signatures_required(threshold: U256) -> u64 {
    threshold.saturating_sub(U256::from(1u64)).to::<u64>()
}

fn to_meta_transaction(operation: &OnchainOperation) -> MetaTransactionData {
    MetaTransactionData {
        to: operation.to,
        value: operation.value,
        data: operation.data.clone(),
        operation: OperationType::Call,
    }
}

fn print_safe_info(safe: Address, info: &SafeInfo) {
    let owners = info
        .owners
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");

    let mut table = Table::new();
    table.add_row(row![Fcb -> "Safe", safe.to_string()]);
    table.add_row(row![Fcb -> "Owners", owners]);
    table.add_row(row![Fcb -> "Threshold", info.threshold.to_string()]);
    table.add_row(row![Fcb -> "Nonce", info.nonce.to_string()]);
    table.printstd();
}

#[cfg(test)]
mod tests {
    use super::*;

    const UID: &str = "0x2b8a7a42d8aed96a4f4f53ccc4c1a0437e44e02cbf267e21ba3c1ef0ae45c02a36416d81e590ff67370e4523b9cd3257aa0a853c675dd2a0";

    #[test]
    fn presign_comes_last_in_the_bundle() {
        let approval = OnchainOperation {
            description: "approve".to_string(),
            to: Address::repeat_byte(0x11),
            value: U256::ZERO,
            data: vec![0xaa].into(),
        };

        let operations = build_operation_sequence(vec![approval.clone()], 1, UID).unwrap();

        assert_eq!(operations.len(), 2);
        assert_eq!(operations[0].to, approval.to);
        assert_eq!(operations[1].to, get_settlement(1).unwrap());
    }

    #[test]
    fn presign_operation_encodes_the_order_uid() {
        let operation = presign_operation(1, UID).unwrap();

        let decoded =
            GPv2Settlement::setPreSignatureCall::abi_decode(operation.data.as_ref(), true)
                .unwrap();
        assert_eq!(decoded.orderUid, Bytes::from_str(UID).unwrap());
        assert!(decoded.signed);
    }

    #[test]
    fn threshold_of_one_needs_no_further_signatures() {
        assert_eq!(additional_signatures_required(U256::from(1u64)), 0);
    }

    #[test]
    fn higher_thresholds_report_the_exact_remainder() {
        assert_eq!(additional_signatures_required(U256::from(2u64)), 1);
        assert_eq!(additional_signatures_required(U256::from(5u64)), 4);
    }
}
