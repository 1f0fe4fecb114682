use alloy_primitives::{Address, B256, U256};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    order::{BuyTokenDestination, OrderKind, SellTokenSource},
    u256_decimal,
};

/// How long a quoted order stays valid, in milliseconds.
pub const QUOTE_VALIDITY_MS: i64 = 30 * 60 * 1000;

/// A price-quote request for a sell order.
///
/// This is the quoting wire type only; orders sent for signing and
/// submission use [`crate::order::OrderData`], which a quote request is
/// converted into once the quote arrives.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub sell_token: Address,
    pub buy_token: Address,
    pub receiver: Address,
    #[serde(with = "u256_decimal")]
    pub sell_amount_before_fee: U256,
    pub kind: OrderKind,
    pub partially_fillable: bool,
    pub sell_token_balance: SellTokenSource,
    pub buy_token_balance: BuyTokenDestination,
    pub app_data: B256,
    pub valid_to: u32,
    pub from: Address,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub quote: Quote,
    #[serde(default)]
    pub id: Option<i64>,
}

/// The amounts quoted by the service. Fees are already deducted from
/// `sell_amount`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(with = "u256_decimal")]
    pub sell_amount: U256,
    #[serde(with = "u256_decimal")]
    pub buy_amount: U256,
    #[serde(with = "u256_decimal")]
    pub fee_amount: U256,
}

/// Deadline for an order quoted at `now_ms`: the validity window added in
/// milliseconds, then converted to whole seconds, rounded up.
pub fn quote_deadline_from(now_ms: i64) -> u32 {
    ((now_ms + QUOTE_VALIDITY_MS) as u64).div_ceil(1000) as u32
}

pub fn quote_deadline() -> u32 {
    quote_deadline_from(Utc::now().timestamp_millis())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn quote_request_fixture() -> QuoteRequest {
        QuoteRequest {
            sell_token: Address::repeat_byte(0x11),
            buy_token: Address::repeat_byte(0x22),
            receiver: Address::repeat_byte(0x33),
            sell_amount_before_fee: U256::from(1_000_000_000_000_000_000u128),
            kind: OrderKind::Sell,
            partially_fillable: false,
            sell_token_balance: SellTokenSource::Erc20,
            buy_token_balance: BuyTokenDestination::Erc20,
            app_data: B256::ZERO,
            valid_to: 1_700_000_000,
            from: Address::repeat_byte(0x33),
        }
    }

    #[test]
    fn deadline_rounds_sub_second_remainders_up() {
        // 1_000 ms of offset land exactly on a second boundary.
        assert_eq!(quote_deadline_from(0), (QUOTE_VALIDITY_MS / 1000) as u32);
        // 1 ms past the boundary pushes the deadline a full second out.
        assert_eq!(
            quote_deadline_from(1),
            (QUOTE_VALIDITY_MS / 1000) as u32 + 1
        );
        assert_eq!(
            quote_deadline_from(999),
            (QUOTE_VALIDITY_MS / 1000) as u32 + 1
        );
    }

    #[test]
    fn quote_request_wire_shape() {
        let value = serde_json::to_value(quote_request_fixture()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["kind"], "sell");
        assert_eq!(object["sellTokenBalance"], "erc20");
        assert_eq!(object["buyTokenBalance"], "erc20");
        assert_eq!(object["sellAmountBeforeFee"], "1000000000000000000");
        assert_eq!(object["partiallyFillable"], false);
    }

    #[test]
    fn quote_response_parses_decimal_amounts() {
        let json = r#"{
            "quote": {
                "sellAmount": "990000000000000000",
                "buyAmount": "164577689090780",
                "feeAmount": "10000000000000000"
            },
            "id": 42
        }"#;

        let response: QuoteResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.id, Some(42));
        assert_eq!(
            response.quote.buy_amount,
            U256::from(164577689090780u64)
        );
    }
}
