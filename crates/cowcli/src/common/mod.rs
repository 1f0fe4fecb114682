use std::{fs, io::BufReader, path::Path, str::FromStr};

use alloy_primitives::{Address, B256, U256};
use alloy_signer_local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use eyre::WrapErr;
use orderbook::u256_decimal;
use serde::{de, Deserialize, Deserializer};
use url::Url;

use consts::is_supported_chain;

pub mod consts;

/// The order-definition file, read once and immutable for the run.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderDefinition {
    #[serde(default)]
    pub chain_id: Option<u64>,
    pub account: AccountConfig,
    pub order: OrderSpec,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AccountConfig {
    pub account_type: AccountType,
    #[serde(default)]
    pub safe_address: Option<Address>,
}

/// The account models the workflow knows how to authorize for. Closed on
/// purpose: anything else in the order file fails at deserialization, long
/// before a network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum AccountType {
    #[serde(rename = "EOA")]
    Eoa,
    #[serde(rename = "SAFE_WITH_EOA_PRESIGN")]
    SafeWithEoaPresign,
    #[serde(rename = "SAFE_WITH_EOA_EIP1271")]
    SafeWithEoaEip1271,
}

/// Account model with its required addresses resolved and proven present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradingAccount {
    Eoa,
    SafeWithEoaPresign { safe: Address },
    SafeWithEoaEip1271 { safe: Address },
}

impl AccountConfig {
    pub fn resolve(&self) -> eyre::Result<TradingAccount> {
        match self.account_type {
            AccountType::Eoa => Ok(TradingAccount::Eoa),
            AccountType::SafeWithEoaPresign => {
                let safe = self.require_safe_address("SAFE_WITH_EOA_PRESIGN")?;
                Ok(TradingAccount::SafeWithEoaPresign { safe })
            }
            AccountType::SafeWithEoaEip1271 => {
                let safe = self.require_safe_address("SAFE_WITH_EOA_EIP1271")?;
                Ok(TradingAccount::SafeWithEoaEip1271 { safe })
            }
        }
    }

    fn require_safe_address(&self, account_type: &str) -> eyre::Result<Address> {
        self.safe_address
            .ok_or_else(|| eyre::eyre!("safeAddress is required for {} accounts", account_type))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderSpec {
    pub sell_token: Address,
    pub buy_token: Address,
    #[serde(with = "u256_decimal")]
    pub sell_amount_before_fee: U256,
    /// Accepted for schema compatibility; the executable buy amount always
    /// comes from a fresh quote.
    #[serde(default, with = "u256_decimal::option")]
    pub buy_amount: Option<U256>,
    #[serde(default)]
    pub partially_fillable: Option<bool>,
    #[serde(default)]
    pub app_data: Option<B256>,
    #[serde(default)]
    pub receiver: Option<Address>,
    #[serde(default, deserialize_with = "deserialize_bips")]
    pub slippage_tolerance_bips: Option<u32>,
}

fn deserialize_bips<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    value
        .map(|value| value.parse::<u32>())
        .transpose()
        .map_err(de::Error::custom)
}

impl OrderDefinition {
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let file = fs::File::open(path)
            .wrap_err_with(|| format!("Failed to open {}", path.display()))?;
        let reader = BufReader::new(file);

        serde_json::from_reader(reader)
            .wrap_err_with(|| format!("Failed to parse order definition from {}", path.display()))
    }
}

/// Chain selection: the order file wins, the `CHAIN_ID` environment
/// variable is the fallback.
pub fn resolve_chain_id(from_file: Option<u64>) -> eyre::Result<u64> {
    let chain_id = match from_file {
        Some(chain_id) => chain_id,
        None => match std::env::var("CHAIN_ID") {
            Ok(value) => value
                .parse::<u64>()
                .wrap_err("CHAIN_ID is not a valid chain id")?,
            Err(_) => eyre::bail!(
                "Chain ID is required: set it in the order file or the CHAIN_ID environment variable"
            ),
        },
    };

    if !is_supported_chain(chain_id) {
        eyre::bail!("Chain ID {} is not supported", chain_id);
    }

    Ok(chain_id)
}

/// Derives the signing key from the `MNEMONIC` environment variable.
pub fn signer_from_env() -> eyre::Result<PrivateKeySigner> {
    let phrase = std::env::var("MNEMONIC")
        .map_err(|_| eyre::eyre!("The MNEMONIC environment variable is required for signing"))?;

    let signer = MnemonicBuilder::<English>::default()
        .phrase(phrase.trim())
        .build()?;

    Ok(signer)
}

/// RPC endpoint: an explicit `--rpc-url`/`RPC_URL` wins; otherwise one is
/// derived from `INFURA_KEY` for chains Infura serves.
pub fn resolve_rpc_url(explicit: Option<Url>, chain_id: u64) -> eyre::Result<Url> {
    if let Some(url) = explicit {
        return Ok(url);
    }

    if let Ok(key) = std::env::var("INFURA_KEY") {
        let network = match chain_id {
            1 => "mainnet",
            11155111 => "sepolia",
            _ => eyre::bail!(
                "Infura does not serve chain {}; set RPC_URL instead",
                chain_id
            ),
        };
        let url = Url::parse(&format!("https://{}.infura.io/v3/{}", network, key))?;
        return Ok(url);
    }

    eyre::bail!("An RPC endpoint is required: set RPC_URL or INFURA_KEY")
}

/// App-data hash attached to orders: the `APP_DATA` environment variable
/// overrides the order file; absent both, the zero hash.
pub fn resolve_app_data(from_file: Option<B256>) -> eyre::Result<B256> {
    match std::env::var("APP_DATA") {
        Ok(value) => B256::from_str(value.trim()).wrap_err("APP_DATA is not a 32-byte hash"),
        Err(_) => Ok(from_file.unwrap_or(B256::ZERO)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAFE: &str = "0x36416d81e590ff67370e4523b9cd3257aa0a853c";

    fn definition_json(account: &str) -> String {
        format!(
            r#"{{
                "chainId": 100,
                "account": {account},
                "order": {{
                    "sellToken": "0x6810e776880c02933d47db1b9fc05908e5386b96",
                    "buyToken": "0xe91d153e0b41518a2ce8dd3d7944fa863463a97d",
                    "sellAmountBeforeFee": "1000000000000000000",
                    "slippageToleranceBips": "50"
                }}
            }}"#
        )
    }

    #[test]
    fn parses_a_full_definition() {
        let json = definition_json(&format!(
            r#"{{"accountType": "SAFE_WITH_EOA_PRESIGN", "safeAddress": "{SAFE}"}}"#
        ));
        let definition: OrderDefinition = serde_json::from_str(&json).unwrap();

        assert_eq!(definition.chain_id, Some(100));
        assert_eq!(definition.order.slippage_tolerance_bips, Some(50));
        assert_eq!(
            definition.order.sell_amount_before_fee,
            U256::from(1_000_000_000_000_000_000u128)
        );

        let account = definition.account.resolve().unwrap();
        assert_eq!(
            account,
            TradingAccount::SafeWithEoaPresign {
                safe: Address::from_str(SAFE).unwrap()
            }
        );
    }

    #[test]
    fn unknown_account_type_fails_at_deserialization() {
        let json = definition_json(r#"{"accountType": "SAFE_WITH_MAGIC"}"#);
        assert!(serde_json::from_str::<OrderDefinition>(&json).is_err());
    }

    #[test]
    fn non_eoa_accounts_need_a_safe_address() {
        for account_type in ["SAFE_WITH_EOA_PRESIGN", "SAFE_WITH_EOA_EIP1271"] {
            let json = definition_json(&format!(r#"{{"accountType": "{account_type}"}}"#));
            let definition: OrderDefinition = serde_json::from_str(&json).unwrap();
            let err = definition.account.resolve().unwrap_err();
            assert!(err.to_string().contains("safeAddress"));
        }
    }

    #[test]
    fn eoa_needs_no_safe_address() {
        let json = definition_json(r#"{"accountType": "EOA"}"#);
        let definition: OrderDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(
            definition.account.resolve().unwrap(),
            TradingAccount::Eoa
        );
    }

    #[test]
    fn slippage_bips_parse_from_decimal_strings() {
        let json = definition_json(r#"{"accountType": "EOA"}"#).replace("\"50\"", "\"junk\"");
        assert!(serde_json::from_str::<OrderDefinition>(&json).is_err());
    }
}
