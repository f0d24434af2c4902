use rusqlite::{params, Connection, OptionalExtension};

use super::{format_datetime, parse_datetime, parse_enum};
use crate::db::DatabaseError;
use crate::models::{DetectionKind, DetectionRecord, NewDetection};

const DETECTION_COLUMNS: &str = "d.id, d.kind, d.component_id, d.distance_before, d.force, \
     d.distance_after, d.distance_result, d.combine_time, d.using_time, d.inspector_id, \
     d.remarks, d.if_qualified";

/// Open a detection record. The component must exist (foreign key).
pub fn insert_detection(
    conn: &Connection,
    kind: DetectionKind,
    new: &NewDetection,
) -> Result<DetectionRecord, DatabaseError> {
    conn.execute(
        "INSERT INTO detections (kind, component_kind, component_id, combine_time, remarks, if_qualified)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            kind.as_str(),
            kind.component().as_str(),
            new.component_id,
            new.combine_time.as_ref().map(format_datetime),
            new.remarks,
            new.if_qualified,
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_detection(conn, id)?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "detection".into(),
        id: id.to_string(),
    })
}

pub fn get_detection(conn: &Connection, id: i64) -> Result<Option<DetectionRecord>, DatabaseError> {
    let sql = format!("SELECT {DETECTION_COLUMNS} FROM detections d WHERE d.id = ?1");
    conn.query_row(&sql, params![id], row_to_detection)
        .optional()
        .map_err(DatabaseError::from)
}

/// The record with the highest id for a component, if any.
pub fn get_latest_detection(
    conn: &Connection,
    kind: DetectionKind,
    component_id: &str,
) -> Result<Option<DetectionRecord>, DatabaseError> {
    let sql = format!(
        "SELECT {DETECTION_COLUMNS} FROM detections d
         WHERE d.kind = ?1 AND d.component_id = ?2
         ORDER BY d.id DESC
         LIMIT 1"
    );
    conn.query_row(&sql, params![kind.as_str(), component_id], row_to_detection)
        .optional()
        .map_err(DatabaseError::from)
}

/// Records whose component belongs to `task_id`.
pub fn list_detections_by_task(
    conn: &Connection,
    kind: DetectionKind,
    task_id: &str,
) -> Result<Vec<DetectionRecord>, DatabaseError> {
    let sql = format!(
        "SELECT {DETECTION_COLUMNS} FROM detections d
         JOIN components c ON c.kind = d.component_kind AND c.component_id = d.component_id
         WHERE d.kind = ?1 AND c.task_id = ?2
         ORDER BY d.id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![kind.as_str(), task_id], row_to_detection)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Persist every mutable column of `record` (matched by id).
pub fn update_detection(conn: &Connection, record: &DetectionRecord) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE detections SET distance_before = ?2, force = ?3, distance_after = ?4,
         distance_result = ?5, combine_time = ?6, using_time = ?7, inspector_id = ?8,
         remarks = ?9, if_qualified = ?10
         WHERE id = ?1",
        params![
            record.id,
            record.distance_before,
            record.force,
            record.distance_after,
            record.distance_result,
            record.combine_time.as_ref().map(format_datetime),
            record.using_time.as_ref().map(format_datetime),
            record.inspector_id,
            record.remarks,
            record.if_qualified,
        ],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "detection".into(),
            id: record.id.to_string(),
        });
    }
    Ok(())
}

fn row_to_detection(row: &rusqlite::Row) -> Result<DetectionRecord, rusqlite::Error> {
    let kind_str: String = row.get(1)?;
    Ok(DetectionRecord {
        id: row.get(0)?,
        kind: parse_enum(1, &kind_str)?,
        component_id: row.get(2)?,
        distance_before: row.get(3)?,
        force: row.get(4)?,
        distance_after: row.get(5)?,
        distance_result: row.get(6)?,
        combine_time: parse_datetime(7, row.get(7)?)?,
        using_time: parse_datetime(8, row.get(8)?)?,
        inspector_id: row.get(9)?,
        remarks: row.get(10)?,
        if_qualified: row.get(11)?,
    })
}
