use alloy_provider::{Provider, ProviderBuilder};
use alloy_transport::Transport;
use alloy_transport_http::Http;
use reqwest::Client;
use url::Url;

/// Read-only provider for balance, allowance and Safe metadata queries.
pub fn get_provider(rpc_url: &Url) -> impl Provider<Http<Client>> + Clone {
    ProviderBuilder::new().on_http(rpc_url.clone())
}

pub async fn get_chain_id<P, T>(provider: &P) -> eyre::Result<u64>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    let chain_id = provider.get_chain_id().await?;

    Ok(chain_id)
}
