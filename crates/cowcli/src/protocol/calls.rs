//! Read-only token queries used by the preparation planner.

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use alloy_transport::Transport;

use super::contracts::erc20::IERC20;

pub async fn get_token_balance<P, T>(
    token: Address,
    owner: Address,
    provider: &P,
) -> eyre::Result<U256>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    let call = IERC20::balanceOfCall::new((owner,));

    let IERC20::balanceOfReturn { _0: balance } = call_and_decode(call, token, provider).await?;

    Ok(balance)
}

pub async fn get_token_allowance<P, T>(
    token: Address,
    owner: Address,
    spender: Address,
    provider: &P,
) -> eyre::Result<U256>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    let call = IERC20::allowanceCall::new((owner, spender));

    let IERC20::allowanceReturn { _0: allowance } = call_and_decode(call, token, provider).await?;

    Ok(allowance)
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
