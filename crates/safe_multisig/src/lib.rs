//! Coordination of multi-owner contract-wallet transactions through the
//! Safe transaction service: read wallet metadata from chain, bundle and
//! propose transactions, and build execution calldata once the signing
//! threshold is met.

use alloy_primitives::{hex::ToHexExt, Address, B256, U256};
use alloy_provider::Provider;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::Transport;
use tracing::debug;

use calls::{get_nonce, get_owners, get_threshold, get_transaction_hash};
use consts::get_transaction_service_url;
use transaction_data::{MetaTransactionData, ProposeTransactionBody, SafeTransactionData};

pub mod calls;
pub mod multi_send;
pub mod transaction_data;

mod consts;
mod contracts;

/// Wallet metadata read from chain before proposing.
#[derive(Debug, Clone)]
pub struct SafeInfo {
    pub owners: Vec<Address>,
    pub threshold: U256,
    pub nonce: U256,
}

pub struct SafeClient {
    tx_service_url: String,
    client: reqwest::Client,
}

impl SafeClient {
    pub fn new(chain_id: u64) -> eyre::Result<Self> {
        let tx_service_url = get_transaction_service_url(chain_id)?;

        Ok(Self {
            tx_service_url,
            client: reqwest::Client::new(),
        })
    }

    /// Reads the owner set, signing threshold and current nonce of a Safe.
    pub async fn fetch_info<P, T>(&self, safe: Address, provider: &P) -> eyre::Result<SafeInfo>
    where
        P: Provider<T>,
        T: Transport + Clone,
    {
        let owners = get_owners(safe, provider).await?;
        let threshold = get_threshold(safe, provider).await?;
        let nonce = get_nonce(safe, provider).await?;

        Ok(SafeInfo {
            owners,
            threshold,
            nonce,
        })
    }

    /// Builds the Safe transaction for `meta_tx` at the wallet's current
    /// nonce, signs its hash with `signer` and posts the proposal to the
    /// transaction service.
    ///
    /// Returns the proposed transaction together with its hash so the
    /// caller can execute it once enough signatures are collected.
    pub async fn propose_transaction<P, T>(
        &self,
        safe: Address,
        signer: &PrivateKeySigner,
        meta_tx: MetaTransactionData,
        provider: &P,
    ) -> eyre::Result<(SafeTransactionData, B256)>
    where
        P: Provider<T>,
        T: Transport + Clone,
    {
        let nonce = get_nonce(safe, provider).await?;
        let safe_tx = SafeTransactionData {
            to: meta_tx.to,
            value: meta_tx.value,
            data: meta_tx.data,
            operation: meta_tx.operation,
            safe_tx_gas: 0,
            base_gas: 0,
            gas_price: 0,
            gas_token: Address::ZERO,
            refund_receiver: Address::ZERO,
            nonce: nonce.to::<u64>(),
        };

        // The wallet itself is the authority on how its transactions hash.
        let tx_hash = get_transaction_hash(&safe_tx, safe, provider).await?;
        let signature = signer.sign_hash(&tx_hash).await?;

        let body = ProposeTransactionBody {
            safe_tx: safe_tx.clone(),
            contract_transaction_hash: tx_hash,
            sender: signer.address(),
            signature: signature.as_bytes().encode_hex_with_prefix(),
            origin: None,
        };

        let url = format!(
            "{}/v1/safes/{}/multisig-transactions/",
            self.tx_service_url, safe
        );
        debug!(%url, ?tx_hash, "proposing transaction");

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            eyre::bail!("Failed to propose transaction: {} - {}", status, text);
        }

        Ok((safe_tx, tx_hash))
    }
}
