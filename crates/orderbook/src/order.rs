use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::{
    quote::{Quote, QuoteRequest},
    u256_decimal,
};

/// Which side of the trade the stated amount fixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Sell,
    Buy,
}

impl OrderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Sell => "sell",
            OrderKind::Buy => "buy",
        }
    }
}

/// Balance source the settlement contract draws sell tokens from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SellTokenSource {
    Erc20,
    Internal,
    External,
}

impl SellTokenSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SellTokenSource::Erc20 => "erc20",
            SellTokenSource::Internal => "internal",
            SellTokenSource::External => "external",
        }
    }
}

/// Destination bought tokens are credited to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuyTokenDestination {
    Erc20,
    Internal,
}

impl BuyTokenDestination {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuyTokenDestination::Erc20 => "erc20",
            BuyTokenDestination::Internal => "internal",
        }
    }
}

/// How the settlement contract verifies the order's authorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningScheme {
    Eip712,
    EthSign,
    Eip1271,
    PreSign,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceQuality {
    Fast,
    Optimal,
}

/// A finalized order, ready for signing and submission.
///
/// Distinct from [`QuoteRequest`] on purpose: the quoting-only
/// `sellAmountBeforeFee` field does not exist here, so an order can never
/// leak it to the signing or submission path.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
    pub sell_token: Address,
    pub buy_token: Address,
    pub receiver: Address,
    #[serde(with = "u256_decimal")]
    pub sell_amount: U256,
    #[serde(with = "u256_decimal")]
    pub buy_amount: U256,
    pub valid_to: u32,
    pub app_data: B256,
    #[serde(with = "u256_decimal")]
    pub fee_amount: U256,
    pub kind: OrderKind,
    pub partially_fillable: bool,
    pub sell_token_balance: SellTokenSource,
    pub buy_token_balance: BuyTokenDestination,
    pub price_quality: PriceQuality,
}

impl OrderData {
    /// Combines a quote request with the quoted amounts into an order.
    ///
    /// `buy_amount` must already carry the slippage protection (see
    /// [`crate::slippage::apply_slippage`]); `sell_amount` and `fee_amount`
    /// pass through from the quote, where fees have already been deducted.
    pub fn from_quote(request: &QuoteRequest, quote: &Quote, buy_amount: U256) -> Self {
        Self {
            sell_token: request.sell_token,
            buy_token: request.buy_token,
            receiver: request.receiver,
            sell_amount: quote.sell_amount,
            buy_amount,
            valid_to: request.valid_to,
            app_data: request.app_data,
            fee_amount: quote.fee_amount,
            kind: request.kind,
            partially_fillable: request.partially_fillable,
            sell_token_balance: request.sell_token_balance,
            buy_token_balance: request.buy_token_balance,
            price_quality: PriceQuality::Optimal,
        }
    }
}

/// Submission payload: the order plus its owner and authorization.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreation {
    #[serde(flatten)]
    pub order: OrderData,
    pub from: Address,
    pub signature: String,
    pub signing_scheme: SigningScheme,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::tests::quote_request_fixture;
    use std::collections::BTreeSet;

    fn quote_fixture() -> Quote {
        Quote {
            sell_amount: U256::from(990_000_000_000_000_000u128),
            buy_amount: U256::from(164577689090780u64),
            fee_amount: U256::from(10_000_000_000_000_000u128),
        }
    }

    #[test]
    fn from_quote_carries_protected_buy_amount() {
        let request = quote_request_fixture();
        let quote = quote_fixture();
        let protected = U256::from(162931912199872u64);

        let order = OrderData::from_quote(&request, &quote, protected);

        assert_eq!(order.sell_amount, quote.sell_amount);
        assert_eq!(order.buy_amount, protected);
        assert_eq!(order.fee_amount, quote.fee_amount);
        assert_eq!(order.receiver, request.receiver);
        assert_eq!(order.valid_to, request.valid_to);
        assert_eq!(order.price_quality, PriceQuality::Optimal);
    }

    #[test]
    fn serialized_order_has_exactly_the_order_schema_fields() {
        let request = quote_request_fixture();
        let order = OrderData::from_quote(&request, &quote_fixture(), U256::from(1u64));
        let creation = OrderCreation {
            order,
            from: request.from,
            signature: "0x00".to_string(),
            signing_scheme: SigningScheme::Eip712,
        };

        let value = serde_json::to_value(&creation).unwrap();
        let keys: BTreeSet<String> = value.as_object().unwrap().keys().cloned().collect();
        let expected: BTreeSet<String> = [
            "sellToken",
            "buyToken",
            "receiver",
            "sellAmount",
            "buyAmount",
            "validTo",
            "appData",
            "feeAmount",
            "kind",
            "partiallyFillable",
            "sellTokenBalance",
            "buyTokenBalance",
            "priceQuality",
            "from",
            "signature",
            "signingScheme",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        // The quoting-only field must never survive the conversion.
        assert!(!keys.contains("sellAmountBeforeFee"));
        assert_eq!(keys, expected);
    }

    #[test]
    fn wire_names_for_enums() {
        assert_eq!(
            serde_json::to_string(&SigningScheme::PreSign).unwrap(),
            r#""presign""#
        );
        assert_eq!(
            serde_json::to_string(&SigningScheme::Eip712).unwrap(),
            r#""eip712""#
        );
        assert_eq!(serde_json::to_string(&OrderKind::Sell).unwrap(), r#""sell""#);
        assert_eq!(
            serde_json::to_string(&SellTokenSource::Erc20).unwrap(),
            r#""erc20""#
        );
    }
}
