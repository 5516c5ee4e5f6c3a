//! EIP-1193 wallet injected as `window.ethereum`

use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::{decode_uint, encode_balance_of, encode_transfer, ChainConfig, WalletProvider};
use crate::error::ClientError;

const SERVICE: &str = "wallet";

fn js_err(e: JsValue) -> ClientError {
    // Wallets reject with `{ code, message }`
    let message = Reflect::get(&e, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{e:?}"));
    ClientError::external(SERVICE, message)
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), ClientError> {
    Reflect::set(target, &key.into(), value).map_err(js_err)?;
    Ok(())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct InjectedWallet;

impl InjectedWallet {
    pub fn is_available() -> bool {
        web_sys::window()
            .and_then(|w| Reflect::get(&w, &"ethereum".into()).ok())
            .is_some_and(|eth| !eth.is_undefined() && !eth.is_null())
    }

    async fn request(&self, method: &str, params: &Array) -> Result<JsValue, ClientError> {
        let window = web_sys::window().ok_or_else(|| ClientError::external(SERVICE, "no window"))?;
        let ethereum = Reflect::get(&window, &"ethereum".into()).map_err(js_err)?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return Err(ClientError::external(SERVICE, "no wallet extension found"));
        }

        let args = Object::new();
        set(&args, "method", &method.into())?;
        set(&args, "params", params)?;

        let request: Function = Reflect::get(&ethereum, &"request".into())
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;
        let promise: Promise = request
            .call1(&ethereum, &args)
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;
        JsFuture::from(promise).await.map_err(js_err)
    }
}

impl WalletProvider for InjectedWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, ClientError> {
        let accounts = self.request("eth_requestAccounts", &Array::new()).await?;
        Ok(Array::from(&accounts)
            .iter()
            .filter_map(|a| a.as_string())
            .collect())
    }

    async fn switch_network(&self, chain: &ChainConfig) -> Result<(), ClientError> {
        let target = Object::new();
        set(&target, "chainId", &chain.chain_id_hex().into())?;
        self.request("wallet_switchEthereumChain", &Array::of1(&target))
            .await?;
        log::info!("Wallet on {} ({})", chain.chain_name, chain.chain_id);
        Ok(())
    }

    async fn token_balance(&self, contract: &str, owner: &str) -> Result<u128, ClientError> {
        let call = Object::new();
        set(&call, "to", &contract.into())?;
        set(&call, "data", &encode_balance_of(owner).into())?;
        let result = self
            .request("eth_call", &Array::of2(&call, &"latest".into()))
            .await?;
        let word = result
            .as_string()
            .ok_or_else(|| ClientError::external(SERVICE, "eth_call returned no data"))?;
        decode_uint(&word)
    }

    async fn transfer(
        &self,
        contract: &str,
        from: &str,
        to: &str,
        amount: u128,
    ) -> Result<String, ClientError> {
        let tx = Object::new();
        set(&tx, "from", &from.into())?;
        set(&tx, "to", &contract.into())?;
        set(&tx, "data", &encode_transfer(to, amount).into())?;
        let hash = self
            .request("eth_sendTransaction", &Array::of1(&tx))
            .await?;
        hash.as_string()
            .ok_or_else(|| ClientError::external(SERVICE, "wallet returned no transaction hash"))
    }
}
