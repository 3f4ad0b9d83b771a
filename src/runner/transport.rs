// Backend transport for report calls
// Author: Gabriel Demetrios Lafis

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value as JsonValue};

use super::RunError;
use crate::data::{rowset_from_json, RowSet};
use crate::report::{ParameterBinding, ReportDefinition, ReportSummary};
use crate::utils::BackendConfig;

/// The authenticated report endpoints the pipeline depends on
#[async_trait]
pub trait ReportTransport: Send + Sync {
    /// `GET /reports/list`
    async fn list_reports(&self) -> Result<Vec<ReportSummary>, RunError>;

    /// `GET /reports/details/{report_name}`
    async fn report_details(&self, report_name: &str) -> Result<ReportDefinition, RunError>;

    /// `POST /reports/run`
    async fn run_report(&self, report_name: &str, parameters: &ParameterBinding) -> Result<RowSet, RunError>;

    /// `POST /reports/favorite/{name}` or `/reports/unfavorite/{name}`
    async fn set_favorite(&self, report_name: &str, favorite: bool) -> Result<(), RunError>;
}

/// Fail when the payload carries `status: "error"`
pub fn check_status(body: &JsonValue) -> Result<(), RunError> {
    if body.get("status").and_then(JsonValue::as_str) == Some("error") {
        let message = body
            .get("message")
            .and_then(JsonValue::as_str)
            .unwrap_or("The report service reported an error");
        return Err(RunError::Execution(message.to_string()));
    }
    Ok(())
}

/// Read a `/reports/run` payload into rows
pub fn parse_run_response(body: &JsonValue) -> Result<RowSet, RunError> {
    check_status(body)?;

    let results = body.get("results").unwrap_or(&JsonValue::Null);
    rowset_from_json(results).map_err(|err| RunError::Execution(format!("Unexpected result payload: {}", err)))
}

/// Read a `/reports/list` payload
pub fn parse_list_response(body: &JsonValue) -> Result<Vec<ReportSummary>, RunError> {
    check_status(body)?;

    match body.get("reports") {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(reports) => serde_json::from_value(reports.clone())
            .map_err(|err| RunError::Execution(format!("Unexpected report list: {}", err))),
    }
}

/// HTTP implementation of [`ReportTransport`] with bearer authentication
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &BackendConfig) -> Result<Self, RunError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| RunError::Transport(format!("failed to create HTTP client: {}", err)))?;

        Ok(HttpTransport {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: RequestBuilder) -> Result<JsonValue, RunError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|err| {
            error!("Report service request failed: {}", err);
            if err.is_timeout() {
                RunError::Transport("request timed out".to_string())
            } else {
                RunError::Transport(err.to_string())
            }
        })?;

        let status = response.status();
        let body = response.json::<JsonValue>().await;
        debug!("Report service answered {}", status);

        match body {
            Ok(body) if status.is_success() => Ok(body),
            Ok(body) => {
                check_status(&body)?;
                match body.get("message").and_then(JsonValue::as_str) {
                    Some(message) => Err(RunError::Execution(message.to_string())),
                    None => Err(RunError::Transport(format!("HTTP {}", status))),
                }
            }
            Err(err) if status.is_success() => Err(RunError::Transport(format!("unreadable response: {}", err))),
            Err(_) => Err(RunError::Transport(format!("HTTP {}", status))),
        }
    }
}

#[async_trait]
impl ReportTransport for HttpTransport {
    async fn list_reports(&self) -> Result<Vec<ReportSummary>, RunError> {
        let body = self.send(self.client.get(self.url("reports/list"))).await?;
        parse_list_response(&body)
    }

    async fn report_details(&self, report_name: &str) -> Result<ReportDefinition, RunError> {
        let path = format!("reports/details/{}", report_name);
        let body = self.send(self.client.get(self.url(&path))).await?;
        check_status(&body)?;
        Ok(ReportDefinition::from_details(report_name, &body))
    }

    async fn run_report(&self, report_name: &str, parameters: &ParameterBinding) -> Result<RowSet, RunError> {
        let payload = json!({
            "report_name": report_name,
            "parameters": parameters,
        });

        let body = self
            .send(self.client.post(self.url("reports/run")).json(&payload))
            .await?;
        parse_run_response(&body)
    }

    async fn set_favorite(&self, report_name: &str, favorite: bool) -> Result<(), RunError> {
        let action = if favorite { "favorite" } else { "unfavorite" };
        let path = format!("reports/{}/{}", action, report_name);
        let body = self.send(self.client.post(self.url(&path))).await?;
        check_status(&body)
    }
}
