use chrono::{NaiveDateTime, Timelike};
use rusqlite::{params, Connection, OptionalExtension};

use super::{format_datetime, parse_datetime, parse_enum};
use crate::db::DatabaseError;
use crate::models::{Component, ComponentKind, NewComponent};

const COMPONENT_COLUMNS: &str =
    "kind, component_id, task_id, bound_to, if_qualified, remarks, created_at";

/// Insert a component. Duplicate ids of the same kind violate the primary key.
pub fn insert_component(
    conn: &Connection,
    kind: ComponentKind,
    new: &NewComponent,
    created_at: NaiveDateTime,
) -> Result<Component, DatabaseError> {
    conn.execute(
        "INSERT INTO components (kind, component_id, task_id, bound_to, if_qualified, remarks, created_at)
         VALUES (?1, ?2, ?3, NULL, 0, ?4, ?5)",
        params![
            kind.as_str(),
            new.component_id,
            new.task_id,
            new.remarks,
            format_datetime(&created_at),
        ],
    )?;
    Ok(Component {
        kind,
        component_id: new.component_id.clone(),
        task_id: new.task_id.clone(),
        bound_to: None,
        if_qualified: false,
        remarks: new.remarks.clone(),
        // read back at storage precision
        created_at: created_at.with_nanosecond(0).unwrap_or(created_at),
    })
}

pub fn get_component(
    conn: &Connection,
    kind: ComponentKind,
    component_id: &str,
) -> Result<Option<Component>, DatabaseError> {
    let sql = format!(
        "SELECT {COMPONENT_COLUMNS} FROM components WHERE kind = ?1 AND component_id = ?2"
    );
    conn.query_row(&sql, params![kind.as_str(), component_id], row_to_component)
        .optional()
        .map_err(DatabaseError::from)
}

pub fn component_exists(
    conn: &Connection,
    kind: ComponentKind,
    component_id: &str,
) -> Result<bool, DatabaseError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM components WHERE kind = ?1 AND component_id = ?2)",
        params![kind.as_str(), component_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// All components of a kind registered under a task, oldest first.
pub fn list_components_by_task(
    conn: &Connection,
    kind: ComponentKind,
    task_id: &str,
) -> Result<Vec<Component>, DatabaseError> {
    let sql = format!(
        "SELECT {COMPONENT_COLUMNS} FROM components
         WHERE kind = ?1 AND task_id = ?2
         ORDER BY created_at ASC, rowid ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![kind.as_str(), task_id], row_to_component)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Record that `component_id` was assembled into `parent_id`.
///
/// Both ends must exist; the parent kind follows the assembly hierarchy.
pub fn bind_component(
    conn: &Connection,
    kind: ComponentKind,
    component_id: &str,
    parent_id: &str,
) -> Result<(), DatabaseError> {
    let parent_kind = kind.parent().ok_or_else(|| {
        DatabaseError::ConstraintViolation(format!("{} cannot be bound to a parent", kind.label()))
    })?;
    if !component_exists(conn, parent_kind, parent_id)? {
        return Err(DatabaseError::NotFound {
            entity_type: parent_kind.as_str().into(),
            id: parent_id.into(),
        });
    }
    let affected = conn.execute(
        "UPDATE components SET bound_to = ?3 WHERE kind = ?1 AND component_id = ?2",
        params![kind.as_str(), component_id, parent_id],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: kind.as_str().into(),
            id: component_id.into(),
        });
    }
    Ok(())
}

pub fn set_component_qualified(
    conn: &Connection,
    kind: ComponentKind,
    component_id: &str,
    if_qualified: bool,
) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE components SET if_qualified = ?3 WHERE kind = ?1 AND component_id = ?2",
        params![kind.as_str(), component_id, if_qualified],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: kind.as_str().into(),
            id: component_id.into(),
        });
    }
    Ok(())
}

fn row_to_component(row: &rusqlite::Row) -> Result<Component, rusqlite::Error> {
    let kind_str: String = row.get(0)?;
    let created = parse_datetime(6, Some(row.get(6)?))?;
    Ok(Component {
        kind: parse_enum(0, &kind_str)?,
        component_id: row.get(1)?,
        task_id: row.get(2)?,
        bound_to: row.get(3)?,
        if_qualified: row.get(4)?,
        remarks: row.get(5)?,
        created_at: created.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use chrono::NaiveDate;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn new(id: &str, task: &str) -> NewComponent {
        NewComponent {
            component_id: id.into(),
            task_id: task.into(),
            remarks: None,
        }
    }

    #[test]
    fn insert_and_get_motor() {
        let conn = test_db();
        insert_component(&conn, ComponentKind::Motor, &new("M-1", "T-1"), at(8)).unwrap();

        let motor = get_component(&conn, ComponentKind::Motor, "M-1").unwrap().unwrap();
        assert_eq!(motor.task_id, "T-1");
        assert_eq!(motor.created_at, at(8));
        assert!(!motor.if_qualified);
        assert!(motor.bound_to.is_none());
    }

    #[test]
    fn same_id_different_kind_is_distinct() {
        let conn = test_db();
        insert_component(&conn, ComponentKind::Motor, &new("X-1", "T-1"), at(8)).unwrap();
        insert_component(&conn, ComponentKind::Palm, &new("X-1", "T-1"), at(8)).unwrap();
        assert!(get_component(&conn, ComponentKind::Finger, "X-1").unwrap().is_none());
    }

    #[test]
    fn duplicate_id_is_constraint_violation() {
        let conn = test_db();
        insert_component(&conn, ComponentKind::Motor, &new("M-1", "T-1"), at(8)).unwrap();
        let err = insert_component(&conn, ComponentKind::Motor, &new("M-1", "T-2"), at(9))
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn list_by_task_filters_kind_and_task() {
        let conn = test_db();
        insert_component(&conn, ComponentKind::Finger, &new("F-2", "T-1"), at(9)).unwrap();
        insert_component(&conn, ComponentKind::Finger, &new("F-1", "T-1"), at(8)).unwrap();
        insert_component(&conn, ComponentKind::Finger, &new("F-3", "T-2"), at(8)).unwrap();
        insert_component(&conn, ComponentKind::Motor, &new("M-1", "T-1"), at(8)).unwrap();

        let fingers = list_components_by_task(&conn, ComponentKind::Finger, "T-1").unwrap();
        let ids: Vec<_> = fingers.iter().map(|f| f.component_id.as_str()).collect();
        assert_eq!(ids, vec!["F-1", "F-2"]);
    }

    #[test]
    fn bind_requires_parent() {
        let conn = test_db();
        insert_component(&conn, ComponentKind::Motor, &new("M-1", "T-1"), at(8)).unwrap();
        let err = bind_component(&conn, ComponentKind::Motor, "M-1", "F-404").unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { ref entity_type, .. } if entity_type == "finger"));

        insert_component(&conn, ComponentKind::Finger, &new("F-1", "T-1"), at(8)).unwrap();
        bind_component(&conn, ComponentKind::Motor, "M-1", "F-1").unwrap();
        let motor = get_component(&conn, ComponentKind::Motor, "M-1").unwrap().unwrap();
        assert_eq!(motor.bound_to.as_deref(), Some("F-1"));
    }

    #[test]
    fn bind_missing_child_is_not_found() {
        let conn = test_db();
        insert_component(&conn, ComponentKind::Palm, &new("P-1", "T-1"), at(8)).unwrap();
        let err = bind_component(&conn, ComponentKind::Split, "S-404", "P-1").unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { ref entity_type, .. } if entity_type == "split"));
    }

    #[test]
    fn palm_has_no_parent() {
        let conn = test_db();
        let err = bind_component(&conn, ComponentKind::Palm, "P-1", "P-2").unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn set_qualified_flag() {
        let conn = test_db();
        insert_component(&conn, ComponentKind::Split, &new("S-1", "T-1"), at(8)).unwrap();
        set_component_qualified(&conn, ComponentKind::Split, "S-1", true).unwrap();
        assert!(get_component(&conn, ComponentKind::Split, "S-1").unwrap().unwrap().if_qualified);

        let err = set_component_qualified(&conn, ComponentKind::Split, "S-9", true).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }
}
