use urls::{gnosis, mainnet, sepolia};

pub mod urls {
    pub mod mainnet {
        pub const CHAIN_ID: u64 = 1;

        pub const ORDERBOOK_URL: &str = "https://api.cow.fi/mainnet";

        pub const EXPLORER_URL: &str = "https://explorer.cow.fi";
    }

    pub mod gnosis {
        pub const CHAIN_ID: u64 = 100;

        pub const ORDERBOOK_URL: &str = "https://api.cow.fi/xdai";

        pub const EXPLORER_URL: &str = "https://explorer.cow.fi/gc";
    }

    pub mod sepolia {
        pub const CHAIN_ID: u64 = 11155111;

        pub const ORDERBOOK_URL: &str = "https://api.cow.fi/sepolia";

        pub const EXPLORER_URL: &str = "https://explorer.cow.fi/sepolia";
    }
}

pub fn get_orderbook_url(chain_id: u64) -> eyre::Result<String> {
    match chain_id {
        mainnet::CHAIN_ID => Ok(mainnet::ORDERBOOK_URL.to_string()),
        gnosis::CHAIN_ID => Ok(gnosis::ORDERBOOK_URL.to_string()),
        sepolia::CHAIN_ID => Ok(sepolia::ORDERBOOK_URL.to_string()),
        _ => Err(eyre::eyre!("Chain ID not supported")),
    }
}

pub fn get_explorer_url(chain_id: u64) -> eyre::Result<String> {
    match chain_id {
        mainnet::CHAIN_ID => Ok(mainnet::EXPLORER_URL.to_string()),
        gnosis::CHAIN_ID => Ok(gnosis::EXPLORER_URL.to_string()),
        sepolia::CHAIN_ID => Ok(sepolia::EXPLORER_URL.to_string()),
        _ => Err(eyre::eyre!("Chain ID not supported")),
    }
}

/// Returns the explorer page for an order. The `{base}/orders/{uid}` shape
/// is scraped by user scripts and must stay stable.
pub fn explorer_order_url(chain_id: u64, uid: &str) -> eyre::Result<String> {
    Ok(format!("{}/orders/{}", get_explorer_url(chain_id)?, uid))
}
