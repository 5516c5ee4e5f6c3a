//! Score API over `fetch`

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use super::{LeaderboardPage, PageQuery, ScoreService, ScoreSubmission, SubmitReceipt};
use crate::error::ClientError;

const SERVICE: &str = "score-api";

pub struct HttpScoreService {
    base_url: String,
}

fn js_err(e: JsValue) -> ClientError {
    ClientError::external(SERVICE, format!("{e:?}"))
}

impl HttpScoreService {
    /// `base_url` is the API prefix, e.g. `/api`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn send(&self, method: &str, path: &str, body: Option<String>) -> Result<String, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let opts = RequestInit::new();
        opts.set_method(method);
        if let Some(body) = &body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&url, &opts).map_err(js_err)?;
        if body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(js_err)?;
        }

        let window = web_sys::window().ok_or_else(|| ClientError::external(SERVICE, "no window"))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;

        let text = JsFuture::from(response.text().map_err(js_err)?)
            .await
            .map_err(js_err)?
            .as_string()
            .unwrap_or_default();

        if response.ok() {
            Ok(text)
        } else {
            log::warn!("{method} {url} -> {}", response.status());
            Err(ClientError::from_status(response.status(), &text))
        }
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_string(body).map_err(|e| ClientError::external(SERVICE, e.to_string()))?;
        let text = self.send("POST", path, Some(body)).await?;
        serde_json::from_str(&text).map_err(|e| ClientError::external(SERVICE, e.to_string()))
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct WalletBody<'a> {
    wallet_address: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    nickname: Option<&'a str>,
}

#[derive(serde::Deserialize)]
struct NicknameReply {
    nickname: String,
}

#[derive(serde::Deserialize)]
struct Ack {
    #[serde(default)]
    success: bool,
}

impl ScoreService for HttpScoreService {
    async fn submit_score(&self, submission: &ScoreSubmission) -> Result<SubmitReceipt, ClientError> {
        self.post("/scores", submission).await
    }

    async fn fetch_leaderboard(&self, query: PageQuery) -> Result<LeaderboardPage, ClientError> {
        let path = format!("/leaderboard?page={}&limit={}", query.page, query.limit);
        let text = self.send("GET", &path, None).await?;
        serde_json::from_str(&text).map_err(|e| ClientError::external(SERVICE, e.to_string()))
    }

    async fn save_nickname(&self, wallet_address: &str, nickname: &str) -> Result<String, ClientError> {
        let body = WalletBody {
            wallet_address,
            nickname: Some(nickname),
        };
        let reply: NicknameReply = self.post("/nickname", &body).await?;
        Ok(reply.nickname)
    }

    async fn claim_free_life(&self, wallet_address: &str) -> Result<(), ClientError> {
        let body = WalletBody {
            wallet_address,
            nickname: None,
        };
        let ack: Ack = self.post("/free-life", &body).await?;
        if ack.success {
            Ok(())
        } else {
            Err(ClientError::Conflict("free life already claimed".into()))
        }
    }
}
