//! Notification test DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::notify::DeliveryReport;

/// Request body for `POST /notifications/test`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NotifyTestRequest {
    /// Message to deliver. A default test message is used when omitted.
    #[serde(default)]
    pub message: Option<String>,
}

/// One channel's delivery outcome.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeliveryReportDto {
    /// Channel name.
    pub channel: String,
    /// Whether delivery succeeded.
    pub delivered: bool,
    /// Failure detail, when delivery did not succeed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<DeliveryReport> for DeliveryReportDto {
    fn from(report: DeliveryReport) -> Self {
        Self {
            channel: report.channel.as_str().to_string(),
            delivered: report.delivered,
            detail: report.detail,
        }
    }
}

/// Response body for `POST /notifications/test`.
#[derive(Debug, Serialize, ToSchema)]
pub struct NotifyTestResponse {
    /// One report per configured channel.
    pub results: Vec<DeliveryReportDto>,
}
