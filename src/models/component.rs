use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::ComponentKind;

/// A traceable part on the assembly line (motor, finger, palm or split
/// mechanism), identified by the code printed on its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub kind: ComponentKind,
    pub component_id: String,
    pub task_id: String,
    /// Id of the parent component this one was assembled into.
    pub bound_to: Option<String>,
    pub if_qualified: bool,
    pub remarks: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Input for registering a new component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComponent {
    pub component_id: String,
    pub task_id: String,
    pub remarks: Option<String>,
}
