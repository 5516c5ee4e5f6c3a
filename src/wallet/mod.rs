//! Wallet glue: chain config, lives shop and prize pool
//!
//! The wallet itself is an external collaborator behind `WalletProvider`.
//! Everything here is plain arithmetic and ERC-20 call encoding so it can be
//! exercised without a chain.

#[cfg(target_arch = "wasm32")]
pub mod injected;

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::persistence;
use crate::platform::KeyValueStore;

#[cfg(target_arch = "wasm32")]
pub use injected::InjectedWallet;

/// Lives granted per purchase
pub const LIVES_PER_PURCHASE: u32 = 5;
/// 0.25 USDC at 6 decimals
pub const LIVES_PRICE_BASE_UNITS: u128 = 250_000;

/// ERC-20 `balanceOf(address)`
const BALANCE_OF_SELECTOR: &str = "70a08231";
/// ERC-20 `transfer(address,uint256)`
const TRANSFER_SELECTOR: &str = "a9059cbb";

/// Network and contract addresses the shop talks to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChainConfig {
    pub chain_id: u64,
    pub chain_name: String,
    pub rpc_url: String,
    pub usdc_contract: String,
    pub usdc_decimals: u32,
    pub merchant_wallet: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 43114,
            chain_name: "Avalanche C-Chain".to_string(),
            rpc_url: "https://api.avax.network/ext/bc/C/rpc".to_string(),
            usdc_contract: "0xB97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E".to_string(),
            usdc_decimals: 6,
            merchant_wallet: "0x18cd0B25309Df2e9c207f4417C5eaa7A7eaA19B8".to_string(),
        }
    }
}

impl ChainConfig {
    /// Chain id as the `0x`-prefixed hex string wallets expect
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// Render base units as a decimal token amount (`250000` -> `0.25`)
    pub fn format_amount(&self, base_units: u128) -> String {
        let scale = 10u128.pow(self.usdc_decimals);
        let whole = base_units / scale;
        let frac = base_units % scale;
        if frac == 0 {
            return whole.to_string();
        }
        let digits = format!("{frac:0width$}", width = self.usdc_decimals as usize);
        format!("{whole}.{}", digits.trim_end_matches('0'))
    }
}

/// Injected browser wallet (or a stand-in)
#[allow(async_fn_in_trait)]
pub trait WalletProvider {
    /// Ask the user to connect; returns the authorised accounts
    async fn request_accounts(&self) -> Result<Vec<String>, ClientError>;

    async fn switch_network(&self, chain: &ChainConfig) -> Result<(), ClientError>;

    /// ERC-20 balance of `owner` in base units
    async fn token_balance(&self, contract: &str, owner: &str) -> Result<u128, ClientError>;

    /// Send `amount` base units of `contract` from `from` to `to`; returns the tx hash
    async fn transfer(
        &self,
        contract: &str,
        from: &str,
        to: &str,
        amount: u128,
    ) -> Result<String, ClientError>;
}

fn pad_word(hex: &str) -> String {
    format!("{hex:0>64}")
}

/// Calldata for `balanceOf(owner)`
pub fn encode_balance_of(owner: &str) -> String {
    let owner = owner.trim_start_matches("0x").to_lowercase();
    format!("0x{BALANCE_OF_SELECTOR}{}", pad_word(&owner))
}

/// Calldata for `transfer(to, amount)`
pub fn encode_transfer(to: &str, amount: u128) -> String {
    let to = to.trim_start_matches("0x").to_lowercase();
    format!(
        "0x{TRANSFER_SELECTOR}{}{}",
        pad_word(&to),
        pad_word(&format!("{amount:x}"))
    )
}

/// Decode a `uint256` return word that fits in 128 bits
pub fn decode_uint(word: &str) -> Result<u128, ClientError> {
    let hex = word.trim_start_matches("0x").trim_start_matches('0');
    if hex.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(hex, 16)
        .map_err(|e| ClientError::external("wallet", format!("bad uint256 '{word}': {e}")))
}

/// Buy `LIVES_PER_PURCHASE` lives with USDC.
///
/// Checks the balance first so a doomed transfer never reaches the wallet.
/// On success the new life count is persisted and returned.
pub async fn purchase_lives(
    wallet: &impl WalletProvider,
    chain: &ChainConfig,
    account: &str,
    current_lives: u32,
    store: &mut impl KeyValueStore,
) -> Result<u32, ClientError> {
    crate::validate::wallet_address(account)?;
    wallet.switch_network(chain).await?;

    let available = wallet.token_balance(&chain.usdc_contract, account).await?;
    if available < LIVES_PRICE_BASE_UNITS {
        return Err(ClientError::InsufficientFunds {
            required: LIVES_PRICE_BASE_UNITS,
            available,
        });
    }

    let tx = wallet
        .transfer(
            &chain.usdc_contract,
            account,
            &chain.merchant_wallet,
            LIVES_PRICE_BASE_UNITS,
        )
        .await?;
    log::info!(
        "Purchased {LIVES_PER_PURCHASE} lives for {} USDC (tx {tx})",
        chain.format_amount(LIVES_PRICE_BASE_UNITS)
    );

    let lives = current_lives.saturating_add(LIVES_PER_PURCHASE);
    persistence::save_lives(store, lives);
    Ok(lives)
}

/// Prize shares for places 1-3, in percent of the pool
pub const PRIZE_SPLIT: [u128; 3] = [50, 30, 20];
/// Share of the merchant balance paid out as prizes, in percent
pub const PRIZE_POOL_SHARE: u128 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrizePool {
    /// Total pool in base units
    pub total: u128,
    /// Payouts for places 1-3 in base units
    pub places: [u128; 3],
}

impl PrizePool {
    pub fn from_balance(merchant_balance: u128) -> Self {
        let total = merchant_balance * PRIZE_POOL_SHARE / 100;
        Self {
            total,
            places: PRIZE_SPLIT.map(|pct| total * pct / 100),
        }
    }

    pub async fn fetch(wallet: &impl WalletProvider, chain: &ChainConfig) -> Result<Self, ClientError> {
        let balance = wallet
            .token_balance(&chain.usdc_contract, &chain.merchant_wallet)
            .await?;
        Ok(Self::from_balance(balance))
    }
}

/// In-memory token ledger standing in for a real wallet
#[derive(Debug, Default)]
pub struct LedgerWallet {
    accounts: Vec<String>,
    balances: RefCell<HashMap<String, u128>>,
}

impl LedgerWallet {
    pub fn new(account: &str) -> Self {
        Self {
            accounts: vec![account.to_string()],
            balances: RefCell::default(),
        }
    }

    pub fn credit(&self, owner: &str, amount: u128) {
        *self
            .balances
            .borrow_mut()
            .entry(owner.to_lowercase())
            .or_default() += amount;
    }

    pub fn balance(&self, owner: &str) -> u128 {
        self.balances
            .borrow()
            .get(&owner.to_lowercase())
            .copied()
            .unwrap_or(0)
    }
}

impl WalletProvider for LedgerWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, ClientError> {
        Ok(self.accounts.clone())
    }

    async fn switch_network(&self, _chain: &ChainConfig) -> Result<(), ClientError> {
        Ok(())
    }

    async fn token_balance(&self, _contract: &str, owner: &str) -> Result<u128, ClientError> {
        Ok(self.balance(owner))
    }

    async fn transfer(
        &self,
        _contract: &str,
        from: &str,
        to: &str,
        amount: u128,
    ) -> Result<String, ClientError> {
        let available = self.balance(from);
        if available < amount {
            return Err(ClientError::InsufficientFunds {
                required: amount,
                available,
            });
        }
        let mut balances = self.balances.borrow_mut();
        balances.insert(from.to_lowercase(), available - amount);
        *balances.entry(to.to_lowercase()).or_default() += amount;
        Ok(format!("0x{:064x}", balances.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;
    use futures::executor::block_on;

    const PLAYER: &str = "0x0000000000000000000000000000000000000abc";

    #[test]
    fn test_chain_defaults() {
        let chain = ChainConfig::default();
        assert_eq!(chain.chain_id_hex(), "0xa86a");
        assert_eq!(chain.format_amount(LIVES_PRICE_BASE_UNITS), "0.25");
        assert_eq!(chain.format_amount(3_000_000), "3");
    }

    #[test]
    fn test_calldata_encoding() {
        let data = encode_balance_of(PLAYER);
        assert!(data.starts_with("0x70a08231"));
        assert_eq!(data.len(), 2 + 8 + 64);
        assert!(data.ends_with("abc"));

        let data = encode_transfer(PLAYER, LIVES_PRICE_BASE_UNITS);
        assert!(data.starts_with("0xa9059cbb"));
        assert_eq!(data.len(), 2 + 8 + 128);
        assert!(data.ends_with("3d090"));

        assert_eq!(decode_uint(&format!("0x{:064x}", 250_000u32)), Ok(250_000));
        assert_eq!(decode_uint("0x"), Ok(0));
        assert!(decode_uint("0xnothex").is_err());
    }

    #[test]
    fn test_purchase_lives() {
        let chain = ChainConfig::default();
        let wallet = LedgerWallet::new(PLAYER);
        wallet.credit(PLAYER, 300_000);
        let mut store = MemoryStore::new();

        let lives = block_on(purchase_lives(&wallet, &chain, PLAYER, 0, &mut store)).unwrap();
        assert_eq!(lives, 5);
        assert_eq!(persistence::load_lives(&store), Some(5));
        assert_eq!(wallet.balance(PLAYER), 50_000);
        assert_eq!(wallet.balance(&chain.merchant_wallet), LIVES_PRICE_BASE_UNITS);
    }

    #[test]
    fn test_purchase_rejected_without_funds() {
        let chain = ChainConfig::default();
        let wallet = LedgerWallet::new(PLAYER);
        wallet.credit(PLAYER, 100_000);
        let mut store = MemoryStore::new();

        let err = block_on(purchase_lives(&wallet, &chain, PLAYER, 2, &mut store)).unwrap_err();
        assert_eq!(
            err,
            ClientError::InsufficientFunds {
                required: LIVES_PRICE_BASE_UNITS,
                available: 100_000
            }
        );
        assert_eq!(persistence::load_lives(&store), None);
        assert_eq!(wallet.balance(PLAYER), 100_000);
    }

    #[test]
    fn test_prize_pool_split() {
        let pool = PrizePool::from_balance(10_000_000);
        assert_eq!(pool.total, 7_000_000);
        assert_eq!(pool.places, [3_500_000, 2_100_000, 1_400_000]);

        let chain = ChainConfig::default();
        let wallet = LedgerWallet::new(PLAYER);
        wallet.credit(&chain.merchant_wallet, 1_000_000);
        assert_eq!(block_on(PrizePool::fetch(&wallet, &chain)).unwrap().total, 700_000);
    }
}
