use std::path::PathBuf;

use alloy_primitives::{Address, B256};
use alloy_signer_local::PrivateKeySigner;
use clap::Parser;
use colored::Colorize;
use url::Url;

use orderbook::{
    explorer_order_url,
    order::{BuyTokenDestination, OrderCreation, OrderData, OrderKind, SellTokenSource, SigningScheme},
    quote::{quote_deadline, QuoteRequest},
    signing::sign_order,
    slippage::{apply_slippage, DEFAULT_SLIPPAGE_BIPS, MAX_SLIPPAGE_BIPS},
    OrderbookClient,
};

use crate::{
    cmd::utils::{get_chain_id, get_provider},
    common::{
        consts::{DEFAULT_CONFIRMATIONS, DEFAULT_TX_TIMEOUT_SECS},
        resolve_app_data, resolve_chain_id, resolve_rpc_url, signer_from_env, OrderDefinition,
        OrderSpec, TradingAccount,
    },
    coordinator::{coordinate_presign_submission, SafeSubmission},
    prompt::{require_confirmation, TerminalPrompt, UserPrompt},
    protocol::{consts::get_settlement, planner::plan_preparatory_operations, OnchainOperation},
    tx,
    utils::{print_loading_until_async, print_phase, print_success_message},
};

#[derive(Debug, Parser)]
#[clap(about = "Quote, authorize and submit a limit order from a JSON definition.")]
pub struct SubmitCommand {
    #[arg(
        value_name = "ORDER_FILE",
        help = "Path to the JSON order definition."
    )]
    pub order_file: Option<PathBuf>,

    #[arg(
        long,
        env = "RPC_URL",
        value_name = "URL",
        help = "JSON-RPC endpoint. Derived from INFURA_KEY when unset."
    )]
    pub rpc_url: Option<Url>,

    /// Timeout for transaction confirmation, in seconds.
    #[arg(long, env = "ETH_TIMEOUT", default_value_t = DEFAULT_TX_TIMEOUT_SECS)]
    pub timeout: u64,

    /// The number of confirmations until the receipt is fetched.
    #[arg(long, default_value_t = DEFAULT_CONFIRMATIONS)]
    pub confirmations: u64,
}

impl SubmitCommand {
    pub async fn execute(self) -> eyre::Result<()> {
        self.execute_with_prompt(&TerminalPrompt).await
    }

    pub async fn execute_with_prompt(self, prompt: &dyn UserPrompt) -> eyre::Result<()> {
        let Self {
            order_file,
            rpc_url,
            timeout,
            confirmations,
        } = self;

        let path =
            order_file.ok_or_else(|| eyre::eyre!("Missing path to the order definition file"))?;
        let definition = OrderDefinition::load(&path)?;

        // Everything that can fail from configuration alone fails here,
        // before the first network call.
        let chain_id = resolve_chain_id(definition.chain_id)?;
        let account = definition.account.resolve()?;
        let slippage_bips = definition
            .order
            .slippage_tolerance_bips
            .unwrap_or(DEFAULT_SLIPPAGE_BIPS);
        if slippage_bips >= MAX_SLIPPAGE_BIPS {
            eyre::bail!(
                "slippageToleranceBips must be below {}, got {}",
                MAX_SLIPPAGE_BIPS,
                slippage_bips
            );
        }
        let signer = signer_from_env()?;
        let rpc_url = resolve_rpc_url(rpc_url, chain_id)?;
        let app_data = resolve_app_data(definition.order.app_data)?;
        tracing::debug!(chain_id, ?account, slippage_bips, "configuration resolved");

        let provider = get_provider(&rpc_url);
        let rpc_chain_id = get_chain_id(&provider).await?;
        if rpc_chain_id != chain_id {
            eyre::bail!(
                "RPC endpoint serves chain {} but the order targets chain {}",
                rpc_chain_id,
                chain_id
            );
        }

        let orderbook = OrderbookClient::new(chain_id)?;

        print_phase("Quoting");
        let (from, receiver) =
            resolve_trading_addresses(&account, signer.address(), definition.order.receiver);
        let quote_request = build_quote_request(&definition.order, from, receiver, app_data);
        println!("{}", serde_json::to_string_pretty(&quote_request)?);

        let response = print_loading_until_async(
            "Requesting quote",
            orderbook.request_quote(&quote_request),
        )
        .await?;
        let quote = response.quote;
        println!("Quoted sell amount: {}", quote.sell_amount);
        println!("Quoted buy amount:  {}", quote.buy_amount);
        println!("Quoted fee amount:  {}", quote.fee_amount);

        let buy_amount = apply_slippage(quote.buy_amount, slippage_bips)?;
        println!(
            "Buy amount with {} bips slippage protection: {}",
            slippage_bips, buy_amount
        );

        let order = OrderData::from_quote(&quote_request, &quote, buy_amount);
        println!("{}", serde_json::to_string_pretty(&order)?);

        print_phase("Planning preparation");
        let operations = print_loading_until_async(
            "Checking balance and allowance",
            plan_preparatory_operations(
                from,
                definition.order.sell_token,
                order.sell_amount,
                definition.order.sell_amount_before_fee,
                chain_id,
                &provider,
            ),
        )
        .await?;
        if operations.is_empty() {
            println!("No preparatory transactions required.");
        } else {
            for (index, operation) in operations.iter().enumerate() {
                println!("  {}. {}", index + 1, operation.description);
            }
        }

        print_phase("Authorizing");
        let uid = match authorization_route(&account, operations.len()) {
            AuthorizationRoute::DirectEip712 => {
                submit_eoa(
                    order,
                    &operations,
                    &signer,
                    chain_id,
                    &rpc_url,
                    confirmations,
                    timeout,
                    &orderbook,
                    prompt,
                )
                .await?
            }
            AuthorizationRoute::SafePresign { safe } => {
                coordinate_presign_submission(
                    SafeSubmission {
                        safe,
                        signer: &signer,
                        order,
                        preparatory_ops: operations,
                        chain_id,
                        rpc_url: &rpc_url,
                        confirmations,
                        timeout,
                    },
                    &orderbook,
                    &provider,
                    prompt,
                )
                .await?
            }
            AuthorizationRoute::SafeFallbackPresign { safe } => {
                println!(
                    "{}",
                    "Preparatory transactions are pending, so the gasless EIP-1271 path is \
                     unavailable; falling back to the pre-signature flow to bundle everything \
                     into one Safe transaction."
                        .bright_yellow()
                );
                coordinate_presign_submission(
                    SafeSubmission {
                        safe,
                        signer: &signer,
                        order,
                        preparatory_ops: operations,
                        chain_id,
                        rpc_url: &rpc_url,
                        confirmations,
                        timeout,
                    },
                    &orderbook,
                    &provider,
                    prompt,
                )
                .await?
            }
            AuthorizationRoute::SafeEip1271 { .. } => {
                eyre::bail!("Direct EIP-1271 order submission is not implemented")
            }
        };

        print_phase("Submitted");
        print_success_message(&format!("Order created: {}", uid));
        println!("{}", explorer_order_url(chain_id, &uid)?.bright_cyan());

        Ok(())
    }
}

/// The authorization path for an account model with the given number of
/// pending preparatory operations. Exhaustive: every account model maps to
/// exactly one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthorizationRoute {
    /// Sign the order off-chain with EIP-712 and send any preparatory
    /// transactions directly.
    DirectEip712,
    /// Always coordinate a pre-signature through the Safe.
    SafePresign { safe: Address },
    /// EIP-1271 account with unavoidable on-chain work: degrade to the
    /// pre-signature bundle.
    SafeFallbackPresign { safe: Address },
    /// EIP-1271 account with nothing to do on chain. Unimplemented, and it
    /// must fail loudly rather than degrade silently.
    SafeEip1271 { safe: Address },
}

pub(crate) fn authorization_route(
    account: &TradingAccount,
    pending_operations: usize,
) -> AuthorizationRoute {
    match *account {
        TradingAccount::Eoa => AuthorizationRoute::DirectEip712,
        TradingAccount::SafeWithEoaPresign { safe } => AuthorizationRoute::SafePresign { safe },
        TradingAccount::SafeWithEoaEip1271 { safe } => {
            if pending_operations == 0 {
                AuthorizationRoute::SafeEip1271 { safe }
            } else {
                AuthorizationRoute::SafeFallbackPresign { safe }
            }
        }
    }
}

/// Trading account and receiver for the quote: an EOA trades as the
/// signer, Safe models trade as the wallet; the receiver defaults to the
/// trading account itself.
pub(crate) fn resolve_trading_addresses(
    account: &TradingAccount,
    signer_address: Address,
    receiver_override: Option<Address>,
) -> (Address, Address) {
    let from = match *account {
        TradingAccount::Eoa => signer_address,
        TradingAccount::SafeWithEoaPresign { safe }
        | TradingAccount::SafeWithEoaEip1271 { safe } => safe,
    };

    (from, receiver_override.unwrap_or(from))
}

/// Assembles the quote request: always a sell order against standard
/// on-chain balances, valid for the next thirty minutes.
pub(crate) fn build_quote_request(
    spec: &OrderSpec,
    from: Address,
    receiver: Address,
    app_data: B256,
) -> QuoteRequest {
    QuoteRequest {
        sell_token: spec.sell_token,
        buy_token: spec.buy_token,
        receiver,
        sell_amount_before_fee: spec.sell_amount_before_fee,
        kind: OrderKind::Sell,
        partially_fillable: spec.partially_fillable.unwrap_or(false),
        sell_token_balance: SellTokenSource::Erc20,
        buy_token_balance: BuyTokenDestination::Erc20,
        app_data,
        valid_to: quote_deadline(),
        from,
    }
}

#[allow(clippy::too_many_arguments)]
async fn submit_eoa(
    order: OrderData,
    operations: &[OnchainOperation],
    signer: &PrivateKeySigner,
    chain_id: u64,
    rpc_url: &Url,
    confirmations: u64,
    timeout: u64,
    orderbook: &OrderbookClient,
    prompt: &dyn UserPrompt,
) -> eyre::Result<String> {
    // Preparatory steps are not optional once planned: a declined send
    // halts the run instead of skipping the operation.
    for operation in operations {
        require_confirmation(
            prompt,
            &format!("Send transaction to {}?", operation.description),
        )?;
        tx::send_operation(rpc_url, signer, operation, confirmations, timeout, chain_id).await?;
    }

    require_confirmation(prompt, "Post the order to the order book?")?;

    let settlement = get_settlement(chain_id)?;
    let signature = sign_order(&order, chain_id, settlement, signer).await?;
    let creation = OrderCreation {
        order,
        from: signer.address(),
        signature,
        signing_scheme: SigningScheme::Eip712,
    };

    print_loading_until_async("Posting order", orderbook.create_order(&creation)).await
}
