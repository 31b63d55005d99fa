use std::fmt;
use std::str::FromStr;

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Malicious,
    Safe,
    FalsePositive,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Malicious => "malicious",
            ReportType::Safe => "safe",
            ReportType::FalsePositive => "false_positive",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "malicious" => Ok(ReportType::Malicious),
            "safe" => Ok(ReportType::Safe),
            "false_positive" => Ok(ReportType::FalsePositive),
            other => Err(ReportError::InvalidRequest(format!(
                "reportType must be one of malicious, safe, false_positive (got '{}')",
                other
            ))),
        }
    }
}

/// Body of `POST /api/report`. Fields are optional here so that missing
/// ones produce a 400 with a clear message instead of a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub url: Option<String>,
    pub report_type: Option<String>,
    pub user_reason: Option<String>,
}

/// Request metadata stored next to each report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    pub ip: String,
    pub user_agent: String,
}

impl RequestMeta {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let ip = header("x-forwarded-for")
            .and_then(|forwarded| forwarded.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .or_else(|| header("x-real-ip"))
            .unwrap_or("unknown")
            .to_string();
        let user_agent = header("user-agent").unwrap_or("unknown").to_string();

        Self { ip, user_agent }
    }
}

/// Persisted report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub url: String,
    pub report_type: ReportType,
    pub user_reason: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub ip: String,
    pub user_agent: String,
}

/// Trim and lowercase a reported URL.
pub fn normalize_url(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl ReportRequest {
    /// Validate the request and build the document to persist.
    pub fn into_document(
        self,
        meta: RequestMeta,
        timestamp: DateTime<Utc>,
    ) -> Result<ReportDocument, ReportError> {
        let url = self
            .url
            .as_deref()
            .map(normalize_url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ReportError::InvalidRequest("url is required".to_string()))?;
        let report_type: ReportType = self
            .report_type
            .as_deref()
            .map(str::trim)
            .filter(|kind| !kind.is_empty())
            .ok_or_else(|| ReportError::InvalidRequest("reportType is required".to_string()))?
            .parse()?;
        let user_reason = self
            .user_reason
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty());

        Ok(ReportDocument {
            url,
            report_type,
            user_reason,
            timestamp,
            ip: meta.ip,
            user_agent: meta.user_agent,
        })
    }
}
