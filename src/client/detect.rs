//! Worm detection calls (`/api/Detect1`, `/api/Detect2`).

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use super::{ClientError, PdaClient};
use crate::api::types::ApiResponse;
use crate::models::{DetectionKind, DetectionRecord, DetectionUpdate};

/// Body for opening a detection record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AddDetection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combine_time: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub if_qualified: bool,
}

fn base(kind: DetectionKind) -> &'static str {
    match kind {
        DetectionKind::MotorWorm => "api/Detect1",
        DetectionKind::SplitWorm => "api/Detect2",
    }
}

/// Attach the component id under the field name the endpoint expects.
fn with_component_id<B: Serialize>(
    kind: DetectionKind,
    component_id: &str,
    body: &B,
) -> Result<Value, ClientError> {
    let mut value =
        serde_json::to_value(body).map_err(|e| ClientError::ResponseParsing(e.to_string()))?;
    if let Value::Object(map) = &mut value {
        map.insert(
            kind.component().id_field().to_string(),
            Value::String(component_id.to_string()),
        );
    }
    Ok(value)
}

impl PdaClient {
    /// Latest detection record of a component; `None` when it has none.
    pub async fn latest_detection(
        &self,
        kind: DetectionKind,
        component_id: &str,
    ) -> Result<Option<DetectionRecord>, ClientError> {
        let action = match kind {
            DetectionKind::MotorWorm => "GetMotorWormDetect",
            DetectionKind::SplitWorm => "GetSplitWormDetect",
        };
        let field = kind.component().id_field();
        let request = self.get(&format!("{}/{action}", base(kind)), &[(field, component_id)]);
        self.execute_request(request).await
    }

    pub async fn detection_list(
        &self,
        kind: DetectionKind,
        task_id: &str,
    ) -> Result<Option<Vec<DetectionRecord>>, ClientError> {
        let action = match kind {
            DetectionKind::MotorWorm => "GetMotorWormDetectList",
            DetectionKind::SplitWorm => "GetSplitWormDetectList",
        };
        let request = self.get(&format!("{}/{action}", base(kind)), &[("task_id", task_id)]);
        self.execute_request(request).await
    }

    pub async fn add_detection(
        &self,
        kind: DetectionKind,
        component_id: &str,
        body: &AddDetection,
    ) -> Result<ApiResponse<Value>, ClientError> {
        let action = match kind {
            DetectionKind::MotorWorm => "AddDetect1",
            DetectionKind::SplitWorm => "AddDetect2",
        };
        let body = with_component_id(kind, component_id, body)?;
        tracing::info!(component_id, kind = %kind, "Opening detection record");
        let response = self
            .execute_command(self.post(&format!("{}/{action}", base(kind)), &body))
            .await?;
        if response.is_success() {
            tracing::info!(component_id, "Detection record opened");
        }
        Ok(response)
    }

    /// Send measurements for the latest record of `component_id`.
    pub async fn update_latest_detection(
        &self,
        kind: DetectionKind,
        component_id: &str,
        update: &DetectionUpdate,
    ) -> Result<ApiResponse<Value>, ClientError> {
        let body = with_component_id(kind, component_id, update)?;
        tracing::info!(component_id, kind = %kind, "Updating latest detection record");
        let response = self
            .execute_command(self.put(&format!("{}/UpdateLatestDetect", base(kind)), &body))
            .await?;
        if response.is_success() {
            tracing::info!(component_id, "Detection record updated");
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::live_client;
    use crate::models::ComponentKind;
    use chrono::{Duration, Local};

    #[tokio::test]
    async fn measurement_flow_over_http() {
        let (server, client) = live_client().await;
        let added = client
            .add_component(ComponentKind::Motor, "M-21", "T-9", None)
            .await
            .unwrap();
        assert!(added.is_success());

        let opened = client
            .latest_detection(DetectionKind::MotorWorm, "M-21")
            .await
            .unwrap()
            .unwrap();
        let bonded = opened.combine_time.unwrap();

        let update = DetectionUpdate {
            distance_before: Some(5.0),
            distance_after: Some(4.99),
            using_time: Some(bonded + Duration::hours(73)),
            inspector_id: Some("QA-3".into()),
            ..Default::default()
        };
        let response = client
            .update_latest_detection(DetectionKind::MotorWorm, "M-21", &update)
            .await
            .unwrap();
        assert!(response.is_success());

        let latest = client
            .latest_detection(DetectionKind::MotorWorm, "M-21")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, opened.id);
        assert_eq!(latest.if_qualified, Some(true));
        assert_eq!(latest.inspector_id.as_deref(), Some("QA-3"));

        server.stop().await;
    }

    #[tokio::test]
    async fn missing_record_is_none() {
        let (server, client) = live_client().await;
        let latest = client
            .latest_detection(DetectionKind::SplitWorm, "S-404")
            .await
            .unwrap();
        assert!(latest.is_none());
        server.stop().await;
    }

    #[tokio::test]
    async fn second_record_becomes_latest() {
        let (server, client) = live_client().await;
        client
            .add_component(ComponentKind::Split, "S-2", "T-9", None)
            .await
            .unwrap();
        let response = client
            .add_detection(
                DetectionKind::SplitWorm,
                "S-2",
                &AddDetection {
                    combine_time: Some(Local::now().naive_local()),
                    remarks: Some("re-bonded".into()),
                    if_qualified: false,
                },
            )
            .await
            .unwrap();
        assert!(response.is_success());

        let records = client
            .detection_list(DetectionKind::SplitWorm, "T-9")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(records.len(), 2);

        let latest = client
            .latest_detection(DetectionKind::SplitWorm, "S-2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.remarks.as_deref(), Some("re-bonded"));
        server.stop().await;
    }
}
