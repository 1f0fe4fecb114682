//! EIP-712 hashing and signing of orders.

use alloy_primitives::{hex::ToHexExt, Address, B256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{eip712_domain, sol, Eip712Domain, SolStruct};

use crate::order::OrderData;

sol! {
    /// The order struct the settlement contract hashes. Field order and
    /// types must match the contract exactly or signatures will not verify.
    struct Order {
        address sellToken;
        address buyToken;
        address receiver;
        uint256 sellAmount;
        uint256 buyAmount;
        uint32 validTo;
        bytes32 appData;
        uint256 feeAmount;
        string kind;
        bool partiallyFillable;
        string sellTokenBalance;
        string buyTokenBalance;
    }
}

impl From<&OrderData> for Order {
    fn from(order: &OrderData) -> Self {
        Self {
            sellToken: order.sell_token,
            buyToken: order.buy_token,
            receiver: order.receiver,
            sellAmount: order.sell_amount,
            buyAmount: order.buy_amount,
            validTo: order.valid_to,
            appData: order.app_data,
            feeAmount: order.fee_amount,
            kind: order.kind.as_str().to_string(),
            partiallyFillable: order.partially_fillable,
            sellTokenBalance: order.sell_token_balance.as_str().to_string(),
            buyTokenBalance: order.buy_token_balance.as_str().to_string(),
        }
    }
}

/// The settlement contract's EIP-712 domain.
pub fn settlement_domain(chain_id: u64, settlement: Address) -> Eip712Domain {
    eip712_domain! {
        name: "Gnosis Protocol",
        version: "v2",
        chain_id: chain_id,
        verifying_contract: settlement,
    }
}

pub fn order_signing_hash(order: &OrderData, domain: &Eip712Domain) -> B256 {
    Order::from(order).eip712_signing_hash(domain)
}

/// Signs the order's EIP-712 hash and returns the 65-byte signature hex
/// encoded, ready for submission with the `eip712` signing scheme.
pub async fn sign_order(
    order: &OrderData,
    chain_id: u64,
    settlement: Address,
    signer: &PrivateKeySigner,
) -> eyre::Result<String> {
    let domain = settlement_domain(chain_id, settlement);
    let hash = order_signing_hash(order, &domain);
    let signature = signer.sign_hash(&hash).await?;

    Ok(signature.as_bytes().encode_hex_with_prefix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{order::OrderData, quote::tests::quote_request_fixture, quote::Quote};
    use alloy_primitives::U256;

    fn order_fixture() -> OrderData {
        let quote = Quote {
            sell_amount: U256::from(990_000_000_000_000_000u128),
            buy_amount: U256::from(164577689090780u64),
            fee_amount: U256::from(10_000_000_000_000_000u128),
        };
        OrderData::from_quote(&quote_request_fixture(), &quote, quote.buy_amount)
    }

    #[test]
    fn struct_encoding_matches_the_contract_schema() {
        assert_eq!(
            Order::eip712_root_type(),
            "Order(address sellToken,address buyToken,address receiver,\
             uint256 sellAmount,uint256 buyAmount,uint32 validTo,\
             bytes32 appData,uint256 feeAmount,string kind,\
             bool partiallyFillable,string sellTokenBalance,\
             string buyTokenBalance)"
        );
    }

    #[test]
    fn hash_commits_to_order_contents_and_domain() {
        let settlement = Address::repeat_byte(0x90);
        let domain = settlement_domain(1, settlement);
        let order = order_fixture();

        let hash = order_signing_hash(&order, &domain);

        let mut changed = order.clone();
        changed.buy_amount = changed.buy_amount + U256::from(1u64);
        assert_ne!(hash, order_signing_hash(&changed, &domain));

        let other_domain = settlement_domain(100, settlement);
        assert_ne!(hash, order_signing_hash(&order, &other_domain));
    }
}
