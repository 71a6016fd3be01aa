use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Log field holding the principal that performed a data access.
const PRINCIPAL_EMAIL_FIELD: &str = "protoPayload.authenticationInfo.principalEmail";

/// A logs-based metric derived from a resource declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub metric: String,
    pub description: String,
    pub filter: String,
    pub metric_descriptor: MetricDescriptor,
    pub label_extractors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDescriptor {
    pub metric_kind: String,
    pub value_type: String,
    pub unit: String,
    pub labels: Vec<MetricLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricLabel {
    pub key: String,
    pub value_type: String,
    pub description: String,
}

impl Metric {
    /// Delta counter of unexpected accesses to `bucket`, labelled by user.
    pub fn unexpected_access(bucket: &str, filter: String) -> Self {
        Self {
            metric: format!("unexpected-access-{bucket}"),
            description: format!("Count of unexpected data access to {bucket}"),
            filter,
            metric_descriptor: MetricDescriptor {
                metric_kind: "DELTA".to_string(),
                value_type: "INT64".to_string(),
                unit: "1".to_string(),
                labels: vec![MetricLabel {
                    key: "user".to_string(),
                    value_type: "STRING".to_string(),
                    description: "Unexpected user".to_string(),
                }],
            },
            label_extractors: BTreeMap::from([(
                "user".to_string(),
                format!("EXTRACT({PRINCIPAL_EMAIL_FIELD})"),
            )]),
        }
    }
}

/// Build the log filter matching successful data access to `bucket` in
/// `project_id` by anyone not in `expected_users`.
///
/// The negated principal match takes its values joined with ` AND `, which is
/// how the logging query language spells "none of these".
pub fn render_unexpected_access_filter(
    project_id: &str,
    bucket: &str,
    expected_users: &[String],
) -> Result<String, RenderError> {
    for user in expected_users {
        if user.trim().is_empty() {
            return Err(RenderError::BlankExpectedUser {
                bucket: bucket.to_string(),
            });
        }
        if user
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"' | '\''))
        {
            return Err(RenderError::UnsafeExpectedUser {
                bucket: bucket.to_string(),
                user: user.clone(),
            });
        }
    }

    Ok(format!(
        "resource.type=gcs_bucket AND\n\
         logName=projects/{project_id}/logs/cloudaudit.googleapis.com%2Fdata_access AND\n\
         protoPayload.resourceName=projects/_/buckets/{bucket} AND\n\
         protoPayload.status.code!=7 AND\n\
         {PRINCIPAL_EMAIL_FIELD}!=({users})\n",
        users = expected_users.join(" AND "),
    ))
}
