//! The remote `users` resource.
//!
//! [`RemoteUsers`] is the seam between the store and the remote origin.
//! [`HttpRemote`] talks to a jsonplaceholder-shaped REST API; tests plug in
//! their own implementations.

use crate::{StoreConfig, UserFields, UserId, UserRecord};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Why a remote call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Whether the remote answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::Status(404))
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RemoteError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            RemoteError::Status(status.as_u16())
        } else {
            RemoteError::Transport(e.to_string())
        }
    }
}

/// The remote collection of users.
///
/// Writes are forwarded but the remote is not trusted to persist them.
#[allow(async_fn_in_trait)]
pub trait RemoteUsers {
    /// `GET users`
    async fn list(&self) -> Result<Vec<UserRecord>, RemoteError>;

    /// `GET users/{id}`
    async fn get(&self, id: UserId) -> Result<UserRecord, RemoteError>;

    /// `POST users`; returns the echoed body.
    async fn create(&self, fields: &UserFields) -> Result<UserFields, RemoteError>;

    /// `PUT users/{id}`
    async fn update(&self, id: UserId, fields: &UserFields) -> Result<(), RemoteError>;

    /// `DELETE users/{id}`
    async fn delete(&self, id: UserId) -> Result<(), RemoteError>;
}

/// HTTP client for a jsonplaceholder-style `users` resource.
#[derive(Clone, Debug)]
pub struct HttpRemote {
    client: Client,
    config: StoreConfig,
}

impl HttpRemote {
    /// Build a client from the store config.
    pub fn new(config: StoreConfig) -> Result<Self, RemoteError> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.request_timeout);
        let client = builder.build()?;

        tracing::debug!(base_url = %config.base_url, "Created users client");

        Ok(Self { client, config })
    }

    /// Send a request and decode a JSON body from a 2xx response.
    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let response = request.send().await?.error_for_status()?;
        response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    /// Send a request and only check that the response is 2xx.
    async fn execute_discard(&self, request: RequestBuilder) -> Result<(), RemoteError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RemoteError::Status(status.as_u16()))
        }
    }
}

impl RemoteUsers for HttpRemote {
    async fn list(&self) -> Result<Vec<UserRecord>, RemoteError> {
        self.execute_json(self.client.get(self.config.users_url()))
            .await
    }

    async fn get(&self, id: UserId) -> Result<UserRecord, RemoteError> {
        self.execute_json(self.client.get(self.config.user_url(id)))
            .await
    }

    async fn create(&self, fields: &UserFields) -> Result<UserFields, RemoteError> {
        self.execute_json(self.client.post(self.config.users_url()).json(fields))
            .await
    }

    async fn update(&self, id: UserId, fields: &UserFields) -> Result<(), RemoteError> {
        self.execute_discard(self.client.put(self.config.user_url(id)).json(fields))
            .await
    }

    async fn delete(&self, id: UserId) -> Result<(), RemoteError> {
        self.execute_discard(self.client.delete(self.config.user_url(id)))
            .await
    }
}
