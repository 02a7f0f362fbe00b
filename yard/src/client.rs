use std::time::Duration;

use reqwest::RequestBuilder;
use serde_json::json;

use crate::config::UpstreamConfig;
use crate::error::YardError;
use crate::types::{ConditionCode, ConditionCodeResponse, SearchRequest};

/// Timeout for authenticated upstream calls and the token exchange.
pub(crate) const API_TIMEOUT: Duration = Duration::from_secs(30);

const CONDITION_CODE_SEARCH_PATH: &str =
    "yard-management/api/yard-management/trailerConditionCode/search";

/// HTTP client for the upstream yard-management deployment.
///
/// Holds one pooled `reqwest::Client` built at startup; all methods are
/// stateless beyond it. The bearer token and organization arrive with
/// every call, so one client instance serves every tenant.
#[derive(Debug, Clone)]
pub struct YardClient {
    http: reqwest::Client,
    pub(crate) config: UpstreamConfig,
}

impl YardClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, YardError> {
        let http = reqwest::Client::builder()
            .timeout(API_TIMEOUT)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { http, config })
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("https://{}/{}", self.config.api_host, path)
    }

    pub(crate) fn post(&self, url: &str) -> RequestBuilder {
        self.http.post(url)
    }

    /// Attach the per-call auth and tenant headers the upstream expects.
    pub(crate) fn org_headers(
        &self,
        request: RequestBuilder,
        token: &str,
        org: &str,
    ) -> RequestBuilder {
        request
            .bearer_auth(token)
            .header("selectedOrganization", org)
            .header("selectedLocation", format!("{org}-DM1"))
    }

    /// Fetch the trailer condition-code reference table.
    pub async fn condition_codes(
        &self,
        org: &str,
        token: &str,
    ) -> Result<Vec<ConditionCode>, YardError> {
        let request = SearchRequest {
            query: String::new(),
            template: Some(json!({
                "ConditionCodeId": null,
                "Description": null,
                "RemoveCurrentLocation": null
            })),
            size: 9999,
            page: None,
            need_total_count: Some(true),
        };

        let response = self
            .org_headers(self.post(&self.api_url(CONDITION_CODE_SEARCH_PATH)), token, org)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(YardError::UpstreamRejected(
                "Failed to fetch condition codes".to_string(),
            ));
        }

        let body: ConditionCodeResponse = response.json().await?;
        Ok(body
            .data
            .map(|data| data.trailer_condition_code)
            .unwrap_or_default())
    }
}
