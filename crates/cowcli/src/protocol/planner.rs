//! Decides which on-chain steps must precede order submission.
//!
//! Read-only and idempotent: the same chain state yields the same plan, so
//! re-running before an approval is mined simply plans it again.

use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_sol_types::SolCall;
use alloy_transport::Transport;

use super::{calls, consts, contracts::erc20::IERC20, OnchainOperation};

pub async fn plan_preparatory_operations<P, T>(
    from: Address,
    sell_token: Address,
    sell_amount: U256,
    sell_amount_before_fee: U256,
    chain_id: u64,
    provider: &P,
) -> eyre::Result<Vec<OnchainOperation>>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    // An unfunded order can never settle, so this fails before the
    // allowance is even looked at.
    let balance = calls::get_token_balance(sell_token, from, provider).await?;
    ensure_funded(balance, sell_amount_before_fee)?;

    let vault_relayer = consts::get_vault_relayer(chain_id)?;
    let allowance = calls::get_token_allowance(sell_token, from, vault_relayer, provider).await?;

    Ok(approval_operations(
        allowance,
        sell_amount,
        sell_token,
        vault_relayer,
    ))
}

pub(crate) fn ensure_funded(balance: U256, required: U256) -> eyre::Result<()> {
    if balance < required {
        eyre::bail!(
            "Insufficient sell token balance: required {}, available {}",
            required,
            balance
        );
    }

    Ok(())
}

/// Zero or one approval: nothing when the standing allowance already
/// covers the sale, otherwise a single one-time maximum approval so
/// future orders skip this step.
pub(crate) fn approval_operations(
    allowance: U256,
    sell_amount: U256,
    sell_token: Address,
    vault_relayer: Address,
) -> Vec<OnchainOperation> {
    if allowance >= sell_amount {
        return Vec::new();
    }

    let call = IERC20::approveCall::new((vault_relayer, U256::MAX));

    vec![OnchainOperation {
        description: format!(
            "approve the vault relayer {} to spend the sell token {}",
            vault_relayer, sell_token
        ),
        to: sell_token,
        value: U256::ZERO,
        data: call.abi_encode().into(),
    }]
}
