//! Inspection workflow: component registration, binding, and worm
//! detection records.
//!
//! Functions here take a `&Connection` and own validation plus transaction
//! scope; endpoint handlers stay thin wrappers around them.

use chrono::{Local, NaiveDateTime};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{self, DatabaseError};
use crate::models::{
    Component, ComponentKind, DetectionKind, DetectionRecord, DetectionUpdate, NewComponent,
    NewDetection,
};

/// Remark stored on the detection record opened alongside a new component
/// when the caller supplies none.
pub fn auto_detection_remark(kind: ComponentKind) -> String {
    format!("auto-generated on {} creation", kind.label())
}

#[derive(Debug, thiserror::Error)]
pub enum InspectionError {
    #[error("{0}")]
    Validation(String),

    #[error("{} '{id}' does not exist", .kind.label())]
    UnknownComponent { kind: ComponentKind, id: String },

    #[error("{} '{id}' has no detection record to update", .kind.label())]
    NoDetectionRecord { kind: ComponentKind, id: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for InspectionError {
    fn from(err: rusqlite::Error) -> Self {
        InspectionError::Database(DatabaseError::Sqlite(err))
    }
}

fn require_id(value: &str, field: &str) -> Result<(), InspectionError> {
    if value.trim().is_empty() {
        return Err(InspectionError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

// ═══════════════════════════════════════════
// Detection records
// ═══════════════════════════════════════════

/// Result of an update-latest call, shaped for the response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionUpdateOutcome {
    pub record: DetectionRecord,
    pub updated_fields: Vec<String>,
}

/// Latest detection record for a component. Blank ids are rejected.
pub fn latest_detection(
    conn: &Connection,
    kind: DetectionKind,
    component_id: &str,
) -> Result<Option<DetectionRecord>, InspectionError> {
    require_id(component_id, kind.component().id_field())?;
    Ok(db::get_latest_detection(conn, kind, component_id)?)
}

/// Open a new detection record on an existing component.
pub fn add_detection(
    conn: &Connection,
    kind: DetectionKind,
    new: &NewDetection,
) -> Result<DetectionRecord, InspectionError> {
    let component = kind.component();
    require_id(&new.component_id, component.id_field())?;
    if !db::component_exists(conn, component, &new.component_id)? {
        return Err(InspectionError::UnknownComponent {
            kind: component,
            id: new.component_id.clone(),
        });
    }
    let record = db::insert_detection(conn, kind, new)?;
    tracing::info!(
        detect_id = record.id,
        component_id = %record.component_id,
        kind = %kind,
        "Detection record created"
    );
    Ok(record)
}

/// Merge `update` into the latest record for `component_id` and settle
/// its qualification.
pub fn update_latest_detection(
    conn: &mut Connection,
    kind: DetectionKind,
    component_id: &str,
    update: &DetectionUpdate,
) -> Result<DetectionUpdateOutcome, InspectionError> {
    require_id(component_id, kind.component().id_field())?;

    let tx = conn.transaction()?;
    let mut record = db::get_latest_detection(&tx, kind, component_id)?.ok_or_else(|| {
        InspectionError::NoDetectionRecord {
            kind: kind.component(),
            id: component_id.to_string(),
        }
    })?;

    record.apply(update);
    db::update_detection(&tx, &record)?;
    tx.commit()?;

    tracing::info!(
        detect_id = record.id,
        component_id,
        kind = %kind,
        if_qualified = ?record.if_qualified,
        "Latest detection record updated"
    );

    Ok(DetectionUpdateOutcome {
        updated_fields: update
            .updated_fields()
            .into_iter()
            .map(String::from)
            .collect(),
        record,
    })
}

pub fn detections_for_task(
    conn: &Connection,
    kind: DetectionKind,
    task_id: &str,
) -> Result<Vec<DetectionRecord>, InspectionError> {
    let records = db::list_detections_by_task(conn, kind, task_id)?;
    tracing::debug!(count = records.len(), task_id, kind = %kind, "Loaded detection records");
    Ok(records)
}

// ═══════════════════════════════════════════
// Components
// ═══════════════════════════════════════════

/// A newly registered component and, for kinds that are worm-inspected,
/// the detection record opened for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub component: Component,
    pub initial_detection: Option<DetectionRecord>,
}

fn detection_kind_for(kind: ComponentKind) -> Option<DetectionKind> {
    match kind {
        ComponentKind::Motor => Some(DetectionKind::MotorWorm),
        ComponentKind::Split => Some(DetectionKind::SplitWorm),
        ComponentKind::Finger | ComponentKind::Palm => None,
    }
}

/// Register a component. Motors and split mechanisms also get a detection
/// record stamped with the bonding time; failing to open it is logged and
/// does not undo the registration.
pub fn register_component(
    conn: &Connection,
    kind: ComponentKind,
    new: &NewComponent,
) -> Result<Registration, InspectionError> {
    require_id(&new.component_id, kind.id_field())?;
    require_id(&new.task_id, "task_id")?;

    let component = match db::insert_component(conn, kind, new, now()) {
        Ok(c) => c,
        Err(e) if e.is_constraint_violation() => {
            return Err(InspectionError::Validation(format!(
                "{} '{}' already exists",
                kind.label(),
                new.component_id
            )));
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(component_id = %component.component_id, kind = %kind, "Component registered");

    let initial_detection = detection_kind_for(kind).and_then(|detection_kind| {
        let opening = NewDetection {
            component_id: component.component_id.clone(),
            combine_time: Some(component.created_at),
            remarks: Some(
                new.remarks
                    .clone()
                    .unwrap_or_else(|| auto_detection_remark(kind)),
            ),
            if_qualified: false,
        };
        match add_detection(conn, detection_kind, &opening) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    component_id = %component.component_id,
                    error = %e,
                    "Could not open initial detection record"
                );
                None
            }
        }
    });

    Ok(Registration {
        component,
        initial_detection,
    })
}

pub fn get_component(
    conn: &Connection,
    kind: ComponentKind,
    component_id: &str,
) -> Result<Option<Component>, InspectionError> {
    require_id(component_id, kind.id_field())?;
    Ok(db::get_component(conn, kind, component_id)?)
}

pub fn components_for_task(
    conn: &Connection,
    kind: ComponentKind,
    task_id: &str,
) -> Result<Vec<Component>, InspectionError> {
    let components = db::list_components_by_task(conn, kind, task_id)?;
    tracing::debug!(count = components.len(), task_id, kind = %kind, "Loaded components");
    Ok(components)
}

/// Assemble `component_id` into its parent (motor→finger, finger→palm,
/// split→palm).
pub fn bind(
    conn: &Connection,
    kind: ComponentKind,
    component_id: &str,
    parent_id: &str,
) -> Result<(), InspectionError> {
    require_id(component_id, kind.id_field())?;
    let parent = kind.parent().ok_or_else(|| {
        InspectionError::Validation(format!("{} cannot be bound to a parent", kind.label()))
    })?;
    require_id(parent_id, parent.id_field())?;

    match db::bind_component(conn, kind, component_id, parent_id) {
        Ok(()) => {
            tracing::info!(component_id, parent_id, kind = %kind, "Component bound");
            Ok(())
        }
        Err(DatabaseError::NotFound { entity_type, id }) if entity_type == parent.as_str() => {
            Err(InspectionError::UnknownComponent { kind: parent, id })
        }
        Err(DatabaseError::NotFound { id, .. }) => {
            Err(InspectionError::UnknownComponent { kind, id })
        }
        Err(e) => Err(e.into()),
    }
}

pub fn set_qualified(
    conn: &Connection,
    kind: ComponentKind,
    component_id: &str,
    if_qualified: bool,
) -> Result<(), InspectionError> {
    require_id(component_id, kind.id_field())?;
    match db::set_component_qualified(conn, kind, component_id, if_qualified) {
        Ok(()) => {
            tracing::info!(component_id, if_qualified, kind = %kind, "Component qualification set");
            Ok(())
        }
        Err(DatabaseError::NotFound { id, .. }) => {
            Err(InspectionError::UnknownComponent { kind, id })
        }
        Err(e) => Err(e.into()),
    }
}
