use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::DetectionKind;
use super::timestamp;
use crate::qualification::{self, QualificationInput};

/// One worm-gear inspection entry for a motor or split mechanism.
///
/// A component may accumulate several records; only the one with the
/// highest `id` is "latest" and receives updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub id: i64,
    pub kind: DetectionKind,
    pub component_id: String,
    pub distance_before: Option<f64>,
    pub force: Option<f64>,
    pub distance_after: Option<f64>,
    pub distance_result: Option<f64>,
    pub combine_time: Option<NaiveDateTime>,
    pub using_time: Option<NaiveDateTime>,
    pub inspector_id: Option<String>,
    pub remarks: Option<String>,
    pub if_qualified: Option<bool>,
}

/// Input for opening a new detection record on a component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDetection {
    pub component_id: String,
    pub combine_time: Option<NaiveDateTime>,
    pub remarks: Option<String>,
    pub if_qualified: bool,
}

/// Partial update applied to the latest record of a component.
///
/// Numeric and timestamp fields apply when present, text fields only when
/// non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionUpdate {
    #[serde(default)]
    pub distance_before: Option<f64>,
    #[serde(default)]
    pub force: Option<f64>,
    #[serde(default)]
    pub distance_after: Option<f64>,
    #[serde(default)]
    pub distance_result: Option<f64>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub using_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub inspector_id: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub if_qualified: Option<bool>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl DetectionUpdate {
    /// Names of the fields this update carries, in a fixed order.
    pub fn updated_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.distance_before.is_some() {
            fields.push("distance_before");
        }
        if self.force.is_some() {
            fields.push("force");
        }
        if self.distance_after.is_some() {
            fields.push("distance_after");
        }
        if self.distance_result.is_some() {
            fields.push("distance_result");
        }
        if self.using_time.is_some() {
            fields.push("using_time");
        }
        if non_empty(&self.inspector_id).is_some() {
            fields.push("inspector");
        }
        if non_empty(&self.remarks).is_some() {
            fields.push("remarks");
        }
        if self.if_qualified.is_some() {
            fields.push("if_qualified");
        }
        fields
    }
}

impl DetectionRecord {
    /// Values the qualification rule reads.
    pub fn qualification_input(&self) -> QualificationInput {
        QualificationInput {
            distance_before: self.distance_before,
            distance_after: self.distance_after,
            combine_time: self.combine_time,
            using_time: self.using_time,
        }
    }

    /// Merge `update` into this record and settle `if_qualified`.
    ///
    /// Timestamps are cut to storage precision first, so the merged record
    /// is exactly what gets persisted.
    ///
    /// `distance_result` is derived only from distances carried by the update
    /// itself; an explicit value always wins. Qualification is computed from
    /// the merged record unless the update carries its own verdict.
    pub fn apply(&mut self, update: &DetectionUpdate) {
        if let Some(v) = update.distance_before {
            self.distance_before = Some(v);
        }
        if let Some(v) = update.force {
            self.force = Some(v);
        }
        if let Some(v) = update.distance_after {
            self.distance_after = Some(v);
        }

        if let Some(v) = update.distance_result {
            self.distance_result = Some(v);
        } else if let (Some(before), Some(after)) = (update.distance_before, update.distance_after) {
            self.distance_result = Some(qualification::distance_result(before, after));
        }

        // Judge on what will be stored, not on the caller's sub-seconds.
        if let Some(v) = update.using_time {
            self.using_time = Some(timestamp::to_storage_precision(v));
        }
        if let Some(v) = non_empty(&update.inspector_id) {
            self.inspector_id = Some(v.to_string());
        }
        if let Some(v) = non_empty(&update.remarks) {
            self.remarks = Some(v.to_string());
        }

        self.if_qualified = Some(qualification::determine(
            &self.qualification_input(),
            update.if_qualified,
        ));
    }
}
