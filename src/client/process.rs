//! Assembly process calls: registering, listing and binding components.

use serde_json::{json, Value};

use super::{ClientError, PdaClient};
use crate::api::types::ApiResponse;
use crate::models::{Component, ComponentKind};

fn controller(kind: ComponentKind) -> &'static str {
    match kind {
        ComponentKind::Motor => "api/Motor",
        ComponentKind::Finger => "api/Finger",
        ComponentKind::Palm => "api/Palm",
        ComponentKind::Split => "api/Split",
    }
}

impl PdaClient {
    /// Register a component. For motors and split mechanisms the server opens
    /// the first detection record in the same call.
    pub async fn add_component(
        &self,
        kind: ComponentKind,
        component_id: &str,
        task_id: &str,
        remarks: Option<&str>,
    ) -> Result<ApiResponse<Value>, ClientError> {
        let action = match kind {
            ComponentKind::Motor => "AddMotor",
            ComponentKind::Finger => "AddFinger",
            ComponentKind::Palm => "AddPalm",
            ComponentKind::Split => "AddSplit",
        };
        let body = json!({
            kind.id_field(): component_id,
            "task_id": task_id,
            "remarks": remarks,
        });
        tracing::info!(component_id, task_id, kind = %kind, "Registering component");
        let response = self
            .execute_command(self.post(&format!("{}/{action}", controller(kind)), &body))
            .await?;
        if response.is_success() {
            tracing::info!(component_id, kind = %kind, "Component registered");
        }
        Ok(response)
    }

    pub async fn motor(&self, motor_id: &str) -> Result<Option<Component>, ClientError> {
        let request = self.get("api/Motor/GetMotor", &[("motor_id", motor_id)]);
        self.execute_request(request).await
    }

    pub async fn component_list(
        &self,
        kind: ComponentKind,
        task_id: &str,
    ) -> Result<Option<Vec<Component>>, ClientError> {
        let action = match kind {
            ComponentKind::Motor => "GetFinishedList",
            ComponentKind::Finger => "GetFingerList",
            ComponentKind::Palm => "GetPalmList",
            ComponentKind::Split => "GetSplitList",
        };
        let request = self.get(&format!("{}/{action}", controller(kind)), &[("taskId", task_id)]);
        self.execute_request(request).await
    }

    /// Bind a component to its parent in the assembly (motor→finger,
    /// finger→palm, split→palm).
    pub async fn bind(
        &self,
        kind: ComponentKind,
        component_id: &str,
        parent_id: &str,
    ) -> Result<ApiResponse<Value>, ClientError> {
        let (action, parent) = match kind {
            ComponentKind::Motor => ("MotorBindFinger", ComponentKind::Finger),
            ComponentKind::Finger => ("FingerBindPalm", ComponentKind::Palm),
            ComponentKind::Split => ("SplitBindPalm", ComponentKind::Palm),
            ComponentKind::Palm => {
                return Ok(ApiResponse::failure("palm cannot be bound to a parent"));
            }
        };
        let body = json!({
            kind.id_field(): component_id,
            parent.id_field(): parent_id,
        });
        tracing::info!(component_id, parent_id, kind = %kind, "Binding component");
        self.execute_command(self.post(&format!("{}/{action}", controller(kind)), &body))
            .await
    }

    pub async fn update_qualify(
        &self,
        kind: ComponentKind,
        component_id: &str,
        if_qualified: bool,
    ) -> Result<ApiResponse<Value>, ClientError> {
        let body = json!({ "id": component_id, "if_qualified": if_qualified });
        tracing::info!(component_id, if_qualified, kind = %kind, "Setting qualification");
        self.execute_command(self.put(&format!("{}/UpdateQualify", controller(kind)), &body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::live_client;

    #[tokio::test]
    async fn assemble_hand_over_http() {
        let (server, client) = live_client().await;
        for (kind, id) in [
            (ComponentKind::Palm, "P-1"),
            (ComponentKind::Finger, "F-1"),
            (ComponentKind::Motor, "M-1"),
            (ComponentKind::Split, "S-1"),
        ] {
            let response = client.add_component(kind, id, "T-5", None).await.unwrap();
            assert!(response.is_success(), "{kind} {id}: {}", response.msg);
        }

        assert!(client.bind(ComponentKind::Motor, "M-1", "F-1").await.unwrap().is_success());
        assert!(client.bind(ComponentKind::Finger, "F-1", "P-1").await.unwrap().is_success());
        assert!(client.bind(ComponentKind::Split, "S-1", "P-1").await.unwrap().is_success());

        let motor = client.motor("M-1").await.unwrap().unwrap();
        assert_eq!(motor.bound_to.as_deref(), Some("F-1"));

        let splits = client
            .component_list(ComponentKind::Split, "T-5")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(splits[0].bound_to.as_deref(), Some("P-1"));

        server.stop().await;
    }

    #[tokio::test]
    async fn rejected_bind_returns_failure_envelope() {
        let (server, client) = live_client().await;
        client
            .add_component(ComponentKind::Motor, "M-2", "T-5", None)
            .await
            .unwrap();
        let response = client.bind(ComponentKind::Motor, "M-2", "F-404").await.unwrap();
        assert_eq!(response.result_code, crate::api::types::RESULT_FAILURE);
        assert_eq!(response.msg, "finger 'F-404' does not exist");

        let palm = client.bind(ComponentKind::Palm, "P-1", "X").await.unwrap();
        assert!(!palm.is_success());
        server.stop().await;
    }

    #[tokio::test]
    async fn qualification_flag_round_trip() {
        let (server, client) = live_client().await;
        client
            .add_component(ComponentKind::Finger, "F-3", "T-6", Some("left index"))
            .await
            .unwrap();
        let response = client
            .update_qualify(ComponentKind::Finger, "F-3", true)
            .await
            .unwrap();
        assert!(response.is_success());

        let fingers = client
            .component_list(ComponentKind::Finger, "T-6")
            .await
            .unwrap()
            .unwrap();
        assert!(fingers[0].if_qualified);
        assert_eq!(fingers[0].remarks.as_deref(), Some("left index"));

        assert!(client.motor("M-404").await.unwrap().is_none());
        server.stop().await;
    }
}
