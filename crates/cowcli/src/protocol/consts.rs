use alloy_primitives::Address;

use std::str::FromStr;

use addresses::{gnosis, mainnet, sepolia};

pub mod addresses {
    pub mod mainnet {
        pub const CHAIN_ID: u64 = 1;

        /// Settlement contract; verifies order signatures and pre-signatures.
        pub const SETTLEMENT: &str = "0x9008D19f58AAbD9eD0D60971565AA8510560ab41";

        /// Vault relayer allowed to pull approved sell tokens during settlement.
        pub const VAULT_RELAYER: &str = "0xC92E8bdf79f0507f65a392b0ab4667716BFE0110";

        pub const ETHERSCAN_URL: &str = "https://etherscan.io";
    }

    pub mod gnosis {
        pub const CHAIN_ID: u64 = 100;

        pub const SETTLEMENT: &str = "0x9008D19f58AAbD9eD0D60971565AA8510560ab41";

        pub const VAULT_RELAYER: &str = "0xC92E8bdf79f0507f65a392b0ab4667716BFE0110";

        pub const ETHERSCAN_URL: &str = "https://gnosisscan.io";
    }

    pub mod sepolia {
        pub const CHAIN_ID: u64 = 11155111;

        pub const SETTLEMENT: &str = "0x9008D19f58AAbD9eD0D60971565AA8510560ab41";

        pub const VAULT_RELAYER: &str = "0xC92E8bdf79f0507f65a392b0ab4667716BFE0110";

        pub const ETHERSCAN_URL: &str = "https://sepolia.etherscan.io";
    }
}

pub fn get_settlement(chain_id: u64) -> eyre::Result<Address> {
    let address = match chain_id {
        mainnet::CHAIN_ID => mainnet::SETTLEMENT,
        gnosis::CHAIN_ID => gnosis::SETTLEMENT,
        sepolia::CHAIN_ID => sepolia::SETTLEMENT,
        _ => return Err(eyre::eyre!("Chain ID not supported")),
    };

    Ok(Address::from_str(address)?)
}

pub fn get_vault_relayer(chain_id: u64) -> eyre::Result<Address> {
    let address = match chain_id {
        mainnet::CHAIN_ID => mainnet::VAULT_RELAYER,
        gnosis::CHAIN_ID => gnosis::VAULT_RELAYER,
        sepolia::CHAIN_ID => sepolia::VAULT_RELAYER,
        _ => return Err(eyre::eyre!("Chain ID not supported")),
    };

    Ok(Address::from_str(address)?)
}

/// Returns the Etherscan transaction URL for the given chain ID and transaction hash.
///
/// # Panics
///
/// Panics if the chain ID is not one of the supported ones; chain support
/// is validated before any transaction is sent.
pub fn etherscan_tx_url(chain_id: u64, tx: String) -> String {
    match chain_id {
        mainnet::CHAIN_ID => format!("{}/tx/{}", mainnet::ETHERSCAN_URL, tx),
        gnosis::CHAIN_ID => format!("{}/tx/{}", gnosis::ETHERSCAN_URL, tx),
        sepolia::CHAIN_ID => format!("{}/tx/{}", sepolia::ETHERSCAN_URL, tx),
        _ => panic!("Unsupported chain id: {}", chain_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settlement_and_relayer_resolve_on_all_supported_chains() {
        for chain_id in [1, 100, 11155111] {
            assert!(get_settlement(chain_id).is_ok());
            assert!(get_vault_relayer(chain_id).is_ok());
        }
        assert!(get_settlement(42161).is_err());
    }

    #[test]
    fn etherscan_url_shape() {
        assert_eq!(
            etherscan_tx_url(1, "0xabc".to_string()),
            "https://etherscan.io/tx/0xabc"
        );
    }
}
