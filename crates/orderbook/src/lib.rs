use order::OrderCreation;
use quote::{QuoteRequest, QuoteResponse};
use tracing::debug;

pub mod order;
pub mod quote;
pub mod signing;
pub mod slippage;
pub mod u256_decimal;

mod consts;

pub use consts::{explorer_order_url, get_explorer_url, get_orderbook_url};

/// Client for the remote order-book service: price quotes in, signed (or
/// pre-signed) orders out.
pub struct OrderbookClient {
    base_url: String,
    client: reqwest::Client,
}

impl OrderbookClient {
    pub fn new(chain_id: u64) -> eyre::Result<Self> {
        let base_url = get_orderbook_url(chain_id)?;

        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    /// Requests a price quote for the given sell order parameters.
    ///
    /// The service answers with the executable sell amount, the buy amount
    /// at the current price and the protocol fee. No price protection is
    /// applied here; see [`slippage`].
    pub async fn request_quote(&self, request: &QuoteRequest) -> eyre::Result<QuoteResponse> {
        let url = format!("{}/api/v1/quote", self.base_url);
        debug!(%url, "requesting quote");

        let response = self.client.post(&url).json(request).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            eyre::bail!("Quote request rejected: {} - {}", status, text);
        }

        Ok(response.json().await?)
    }

    /// Posts a finalized order and returns its unique identifier.
    pub async fn create_order(&self, order: &OrderCreation) -> eyre::Result<String> {
        let url = format!("{}/api/v1/orders", self.base_url);
        debug!(%url, "posting order");

        let response = self.client.post(&url).json(order).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            eyre::bail!("Order submission rejected: {} - {}", status, text);
        }

        let uid: String = response.json().await?;
        Ok(uid)
    }
}
