//! Transaction dispatch for the direct (single-signer) path.

use std::time::Duration;

use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::B256;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use colored::Colorize;
use eyre::WrapErr;
use url::Url;

use crate::protocol::{consts::etherscan_tx_url, OnchainOperation};

/// Sends one operation and blocks until it is mined with the requested
/// confirmation count, bounded by `timeout` seconds so a stuck transaction
/// surfaces as an error instead of hanging the run.
pub async fn send_operation(
    rpc_url: &Url,
    signer: &PrivateKeySigner,
    operation: &OnchainOperation,
    confirmations: u64,
    timeout: u64,
    chain_id: u64,
) -> eyre::Result<B256> {
    let wallet = EthereumWallet::from(signer.clone());
    let provider = ProviderBuilder::new()
        .wallet(wallet)
        .on_http(rpc_url.clone());

    let mut tx = TransactionRequest::default().to(operation.to);
    tx.set_value(operation.value);
    tx.set_input(operation.data.clone());

    let pending = provider.send_transaction(tx).await?;
    let tx_hash = *pending.tx_hash();

    println!(
        "{}",
        format!(
            "Transaction sent. Etherscan link {}. Waiting for {} confirmations...",
            etherscan_tx_url(chain_id, format!("{tx_hash:#x}")),
            confirmations
        )
        .bright_cyan()
    );

    let receipt = pending
        .with_required_confirmations(confirmations)
        .with_timeout(Some(Duration::from_secs(timeout)))
        .get_receipt()
        .await
        .wrap_err_with(|| format!("While waiting for transaction {tx_hash:#x} to confirm"))?;

    if !receipt.status() {
        eyre::bail!("Transaction {tx_hash:#x} reverted");
    }

    println!(
        "{}",
        format!(
            "Transaction confirmed. Etherscan link {}",
            etherscan_tx_url(chain_id, format!("{tx_hash:#x}"))
        )
        .bright_cyan()
    );

    Ok(tx_hash)
}
