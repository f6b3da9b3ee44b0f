//! Typed client for the bonus points backend
//!
//! Every endpoint is a JSON `POST`. [`Transport`] carries one request and
//! hands back the decoded JSON body; [`BonusApi`] layers the endpoint paths
//! and payload types on top of it. There is no retry and no timeout: a
//! failed call is reported once and the caller decides what to show.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::payload::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Sends one JSON body to a backend path.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post(&self, path: &str, body: Value) -> Result<Value, ClientError>;
}

/// [`Transport`] over HTTP(S); uses `fetch` when compiled to wasm32.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Self {
        HttpTransport {
            client: reqwest::Client::new(),
            config,
        }
    }
}

impl Transport for HttpTransport {
    async fn post(&self, path: &str, body: Value) -> Result<Value, ClientError> {
        let url = self.config.endpoint(path);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let value = parse_body(&text);

        if status.is_success() {
            Ok(value)
        } else {
            log::error!("POST {} answered {}", url, status);
            Err(rejection(status.as_u16(), &value))
        }
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Builds the error for a non-success reply, keeping the backend's `error` text.
pub fn rejection(status: u16, body: &Value) -> ClientError {
    let message = body
        .get("error")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string);
    ClientError::Rejected { status, message }
}

#[derive(Debug, Clone)]
pub struct BonusApi<T> {
    transport: T,
}

impl BonusApi<HttpTransport> {
    pub fn http(config: ClientConfig) -> Self {
        BonusApi::new(HttpTransport::new(config))
    }
}

impl<T: Transport> BonusApi<T> {
    pub fn new(transport: T) -> Self {
        BonusApi { transport }
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        log::debug!("POST {}", path);
        let body = serde_json::to_value(body)?;
        let reply = self.transport.post(path, body).await?;
        Ok(serde_json::from_value(reply)?)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.call("/login", request).await
    }

    pub async fn validate_session(
        &self,
        request: &ValidateSessionRequest,
    ) -> Result<ValidateSessionResponse, ClientError> {
        self.call("/validate-session", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ClientError> {
        self.call::<_, Value>("/users", request).await?;
        Ok(())
    }

    pub async fn balance(&self, request: &SessionRequest) -> Result<BalanceResponse, ClientError> {
        self.call("/users/balance", request).await
    }

    pub async fn messages(
        &self,
        request: &SessionRequest,
    ) -> Result<MessagesResponse, ClientError> {
        self.call("/users/messages", request).await
    }

    /// The reply carries the sender's new balance; callers re-fetch instead of trusting it.
    pub async fn transfer_balance(&self, request: &TransferRequest) -> Result<(), ClientError> {
        self.call::<_, Value>("/users/transfer-balance", request)
            .await?;
        Ok(())
    }

    pub async fn user_data(&self, request: &UserDataRequest) -> Result<Profile, ClientError> {
        self.call("/user-data", request).await
    }

    pub async fn update_password(
        &self,
        request: &UpdatePasswordRequest,
    ) -> Result<Notice, ClientError> {
        self.call("/users/update-password", request).await
    }

    pub async fn admin_view_balance(
        &self,
        request: &AdminViewBalanceRequest,
    ) -> Result<BalanceResponse, ClientError> {
        self.call("/users/view-balance", request).await
    }

    pub async fn admin_update_balance(
        &self,
        request: &AdminUpdateBalanceRequest,
    ) -> Result<AdminUpdateBalanceResponse, ClientError> {
        self.call("/users/update-balance", request).await
    }

    pub async fn admin_update_grade(
        &self,
        request: &AdminUpdateGradeRequest,
    ) -> Result<AdminUpdateGradeResponse, ClientError> {
        self.call("/users/update-grade", request).await
    }

    pub async fn admin_update_password(
        &self,
        request: &AdminUpdatePasswordRequest,
    ) -> Result<Notice, ClientError> {
        // A bare acknowledgement (no JSON object) still counts as success.
        let reply: Value = self.call("/users/admin/update-password", request).await?;
        Ok(serde_json::from_value(reply).unwrap_or_default())
    }
}
