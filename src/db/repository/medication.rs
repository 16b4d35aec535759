use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::Medication;

const MEDICATION_COLUMNS: &str = "id, name, clinical_use, dosage, contraindications, precautions,
     side_effects, interactions, pharmaceutical_data, presentations";

/// Insert a medication and return its row id. A duplicate name is a
/// `ConstraintViolation`.
pub fn insert_medication(conn: &Connection, med: &Medication) -> Result<i64, DatabaseError> {
    let result = conn.execute(
        "INSERT INTO medications (name, clinical_use, dosage, contraindications, precautions,
         side_effects, interactions, pharmaceutical_data, presentations)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            med.name,
            med.clinical_use,
            med.dosage,
            med.contraindications,
            med.precautions,
            med.side_effects,
            med.interactions,
            med.pharmaceutical_data,
            med.presentations,
        ],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(DatabaseError::ConstraintViolation(format!(
                "medication name already exists: {}",
                med.name
            )))
        }
        Err(e) => Err(e.into()),
    }
}

/// All catalog names in ascending order.
pub fn list_medication_names(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT name FROM medications ORDER BY name ASC")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Exact (case-sensitive) lookup by catalog name.
pub fn get_medication_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<Medication>, DatabaseError> {
    let sql = format!("SELECT {MEDICATION_COLUMNS} FROM medications WHERE name = ?1");
    let med = conn
        .query_row(&sql, params![name], medication_from_row)
        .optional()?;
    Ok(med)
}

pub fn delete_medication_by_name(conn: &Connection, name: &str) -> Result<bool, DatabaseError> {
    let deleted = conn.execute("DELETE FROM medications WHERE name = ?1", params![name])?;
    Ok(deleted > 0)
}

pub fn count_medications(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM medications", [], |row| row.get(0))?;
    Ok(count)
}

/// Change counter maintained by triggers on the medications table.
pub fn catalog_generation(conn: &Connection) -> Result<u64, DatabaseError> {
    let generation: i64 = conn.query_row(
        "SELECT generation FROM catalog_generation WHERE id = 1",
        [],
        |row| row.get(0),
    )?;
    Ok(generation.max(0) as u64)
}

fn medication_from_row(row: &rusqlite::Row<'_>) -> Result<Medication, rusqlite::Error> {
    Ok(Medication {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        clinical_use: row.get(2)?,
        dosage: row.get(3)?,
        contraindications: row.get(4)?,
        precautions: row.get(5)?,
        side_effects: row.get(6)?,
        interactions: row.get(7)?,
        pharmaceutical_data: row.get(8)?,
        presentations: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn amoxicilina() -> Medication {
        let mut med = Medication::named("Amoxicilina");
        med.clinical_use = Some("Antibiótico de amplio espectro".into());
        med.dosage = Some("500mg cada 8 horas".into());
        med
    }

    #[test]
    fn insert_and_find_by_name() {
        let conn = test_db();
        let id = insert_medication(&conn, &amoxicilina()).unwrap();

        let found = get_medication_by_name(&conn, "Amoxicilina").unwrap().unwrap();
        assert_eq!(found.id, Some(id));
        assert_eq!(found.clinical_use.as_deref(), Some("Antibiótico de amplio espectro"));
        assert_eq!(found.dosage.as_deref(), Some("500mg cada 8 horas"));
        assert!(found.side_effects.is_none());
    }

    #[test]
    fn find_missing_returns_none() {
        let conn = test_db();
        assert!(get_medication_by_name(&conn, "Paracetamol").unwrap().is_none());
    }

    #[test]
    fn lookup_is_exact() {
        let conn = test_db();
        insert_medication(&conn, &Medication::named("Paracetamol")).unwrap();
        assert!(get_medication_by_name(&conn, "paracetamol").unwrap().is_none());
    }

    #[test]
    fn duplicate_name_is_constraint_violation() {
        let conn = test_db();
        insert_medication(&conn, &Medication::named("Ibuprofeno")).unwrap();
        let err = insert_medication(&conn, &Medication::named("Ibuprofeno")).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn names_listed_in_order() {
        let conn = test_db();
        for name in ["Paracetamol", "Amoxicilina", "Ibuprofeno"] {
            insert_medication(&conn, &Medication::named(name)).unwrap();
        }
        let names = list_medication_names(&conn).unwrap();
        assert_eq!(names, vec!["Amoxicilina", "Ibuprofeno", "Paracetamol"]);
        assert_eq!(count_medications(&conn).unwrap(), 3);
    }

    #[test]
    fn generation_tracks_writes() {
        let conn = test_db();
        assert_eq!(catalog_generation(&conn).unwrap(), 0);

        insert_medication(&conn, &Medication::named("Paracetamol")).unwrap();
        insert_medication(&conn, &Medication::named("Ibuprofeno")).unwrap();
        assert_eq!(catalog_generation(&conn).unwrap(), 2);

        conn.execute(
            "UPDATE medications SET dosage = '400mg' WHERE name = 'Ibuprofeno'",
            [],
        )
        .unwrap();
        assert_eq!(catalog_generation(&conn).unwrap(), 3);

        assert!(delete_medication_by_name(&conn, "Paracetamol").unwrap());
        assert_eq!(catalog_generation(&conn).unwrap(), 4);
    }

    #[test]
    fn failed_insert_does_not_bump_generation() {
        let conn = test_db();
        insert_medication(&conn, &Medication::named("Paracetamol")).unwrap();
        let _ = insert_medication(&conn, &Medication::named("Paracetamol"));
        assert_eq!(catalog_generation(&conn).unwrap(), 1);
    }

    #[test]
    fn delete_missing_returns_false() {
        let conn = test_db();
        assert!(!delete_medication_by_name(&conn, "Nada").unwrap());
    }
}
