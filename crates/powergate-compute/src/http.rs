use async_trait::async_trait;
use powergate_core::{InstanceState, LifecycleAction};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{ComputeControl, ComputeError, ComputeResult};

#[derive(Debug, Deserialize)]
struct DescribeStateResponse {
    state: InstanceState,
}

/// Client for a provider compute control-plane REST API.
///
/// `GET {base}/instances/{id}` returns `{"state": "<wire word>"}`;
/// `POST {base}/instances/{id}/start` and `.../stop` issue transitions.
/// Credentials are ambient: an optional bearer token supplied at
/// construction is attached to every request.
pub struct HttpComputeClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpComputeClient {
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>) -> ComputeResult<Self> {
        let client = Client::builder().build().map_err(|e| {
            ComputeError::Transport(format!("failed to build http client: {e}"))
        })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    fn instance_url(&self, instance_id: &str) -> String {
        format!("{}/instances/{}", self.base_url, instance_id)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check_status(
        instance_id: &str,
        response: reqwest::Response,
    ) -> ComputeResult<reqwest::Response> {
        match response.status() {
            StatusCode::NOT_FOUND => Err(ComputeError::InstanceNotFound(instance_id.to_string())),
            status if !status.is_success() => {
                let message = response.text().await.unwrap_or_default();
                Err(ComputeError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
            _ => Ok(response),
        }
    }
}

#[async_trait]
impl ComputeControl for HttpComputeClient {
    async fn describe_state(&self, instance_id: &str) -> ComputeResult<InstanceState> {
        let url = self.instance_url(instance_id);
        debug!(%instance_id, %url, "Describing instance");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ComputeError::Transport(e.to_string()))?;
        let response = Self::check_status(instance_id, response).await?;

        let body: DescribeStateResponse = response
            .json()
            .await
            .map_err(|e| ComputeError::Decode(e.to_string()))?;
        Ok(body.state)
    }

    async fn apply_action(&self, instance_id: &str, action: LifecycleAction) -> ComputeResult<()> {
        let url = format!("{}/{}", self.instance_url(instance_id), action.verb());
        debug!(%instance_id, %action, %url, "Applying instance action");

        let response = self
            .authorize(self.client.post(&url))
            .send()
            .await
            .map_err(|e| ComputeError::Transport(e.to_string()))?;
        Self::check_status(instance_id, response).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_url_building() {
        let client = HttpComputeClient::new("http://compute.local:8600", None).unwrap();
        assert_eq!(
            client.instance_url("i-0abc"),
            "http://compute.local:8600/instances/i-0abc"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = HttpComputeClient::new("http://compute.local:8600/", None).unwrap();
        assert_eq!(
            client.instance_url("i-0abc"),
            "http://compute.local:8600/instances/i-0abc"
        );
    }
}
