use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{multipart, ClientBuilder};
use serde::{Deserialize, Serialize};

use crate::form::types::{SubmissionInput, SubmissionOutcome};

/// Shown when the server fails without an error body of its own.
pub const GENERIC_ERROR: &str = "The analysis request failed. Please try again.";

#[derive(Serialize)]
struct AnalyzeTextRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Analysis {
    pub category: String,
    pub suggested_response: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
}

/// Client for the `POST /analyze` endpoint. Text goes up as JSON, a file
/// as multipart form data; the arbiter guarantees never both.
#[derive(Clone)]
pub struct AnalyzeClient {
    http: reqwest::Client,
    endpoint: String,
}

impl AnalyzeClient {
    pub fn new(endpoint: String, timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        let http = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { http, endpoint })
    }

    /// Sends the current input and folds every failure mode into the
    /// message the error panel shows. Server-supplied messages win over
    /// the generic one.
    pub async fn analyze(&self, input: &SubmissionInput) -> SubmissionOutcome {
        let response = match self.send(input).await {
            Ok(r) => r,
            Err(message) => {
                tracing::error!(%message, "analyze request failed before a response arrived");
                return SubmissionOutcome::Failure { message };
            }
        };

        let status = response.status();
        if status.is_success() {
            match response.json::<Analysis>().await {
                Ok(analysis) => SubmissionOutcome::Success {
                    category: analysis.category,
                    suggested_response: analysis.suggested_response,
                },
                Err(e) => {
                    tracing::error!(error = %e, "could not parse analysis response");
                    SubmissionOutcome::Failure {
                        message: GENERIC_ERROR.to_string(),
                    }
                }
            }
        } else {
            tracing::warn!(%status, "analyze returned an error status");
            let body = response.json::<ApiErrorBody>().await.ok();
            SubmissionOutcome::Failure {
                message: error_message(body),
            }
        }
    }

    async fn send(&self, input: &SubmissionInput) -> Result<reqwest::Response, String> {
        let request = match input {
            SubmissionInput::Text(text) => self
                .http
                .post(&self.endpoint)
                .json(&AnalyzeTextRequest { text }),
            SubmissionInput::File { path, name } => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| format!("could not read {name}: {e}"))?;
                let part = multipart::Part::bytes(bytes).file_name(name.clone());
                let form = multipart::Form::new().part("file", part);
                self.http.post(&self.endpoint).multipart(form)
            }
        };
        request.send().await.map_err(|e| describe_transport(&e))
    }
}

fn describe_transport(e: &reqwest::Error) -> String {
    if e.is_connect() {
        "Could not connect to the analysis service. Is it running?".to_string()
    } else if e.is_timeout() {
        "The analysis service took too long to respond.".to_string()
    } else {
        GENERIC_ERROR.to_string()
    }
}

/// Error panel text for a non-2xx response: prefer the server's message,
/// fall back to the generic one.
fn error_message(body: Option<ApiErrorBody>) -> String {
    body.and_then(|b| b.error)
        .unwrap_or_else(|| GENERIC_ERROR.to_string())
}
