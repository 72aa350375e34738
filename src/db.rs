use crate::access::BookScope;
use crate::entities::{
    Artifact, Book, NewArtifact, NewBook, NewPart, NewPerson, NewVehicle, Part, Person, Vehicle,
};
use crate::store::{Store, StoreError, StoreResult};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Open (or create) the database file and make sure the schema exists
pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    setup_database(&conn)?;
    debug!("database ready at {}", path.display());
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery (in-memory databases stay on "memory")
    let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;

    // Parts reference vehicles with ON DELETE CASCADE; SQLite only honours
    // that with foreign keys switched on per connection.
    conn.pragma_update(None, "foreign_keys", true)?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS artifacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            shiny INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            restricted INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS people (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first TEXT NOT NULL,
            last TEXT NOT NULL,
            title TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS vehicles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS parts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            make TEXT NOT NULL,
            vehicle_id INTEGER NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_parts_vehicle ON parts(vehicle_id);
        CREATE INDEX IF NOT EXISTS idx_books_restricted ON books(restricted);",
    )
    .context("Failed to create schema")?;

    Ok(())
}

// ============================================================================
// ROW MAPPING
// ============================================================================

fn artifact_from_row(row: &Row) -> rusqlite::Result<Artifact> {
    Ok(Artifact {
        id: row.get(0)?,
        name: row.get(1)?,
        shiny: row.get(2)?,
    })
}

fn book_from_row(row: &Row) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        restricted: row.get(3)?,
    })
}

fn person_from_row(row: &Row) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get(0)?,
        first: row.get(1)?,
        last: row.get(2)?,
        title: row.get(3)?,
    })
}

fn vehicle_from_row(row: &Row) -> rusqlite::Result<Vehicle> {
    Ok(Vehicle {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn part_from_row(row: &Row) -> rusqlite::Result<Part> {
    Ok(Part {
        id: row.get(0)?,
        name: row.get(1)?,
        make: row.get(2)?,
        vehicle: row.get(3)?,
    })
}

/// Book filter as a WHERE fragment
fn scope_clause(scope: BookScope) -> &'static str {
    match scope {
        BookScope::All => "1 = 1",
        BookScope::Unrestricted => "restricted = 0",
    }
}

/// Foreign key failures on `parts.vehicle_id` become MissingReference
fn part_write_error(err: rusqlite::Error, vehicle: i64) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::MissingReference { entity: "vehicle", id: vehicle }
        }
        other => StoreError::Sqlite(other),
    }
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// `Store` over a single SQLite connection.
///
/// The connection is not `Sync`, so every call takes the mutex for its
/// duration.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap a connection that already went through `setup_database`
    pub fn new(conn: Connection) -> Self {
        SqliteStore { conn: Mutex::new(conn) }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(open_database(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(Self::new(conn))
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn query_all<T>(
        &self,
        sql: &str,
        map: fn(&Row) -> rusqlite::Result<T>,
    ) -> StoreResult<Vec<T>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([], map)?.collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn query_one<T>(
        &self,
        sql: &str,
        id: i64,
        map: fn(&Row) -> rusqlite::Result<T>,
    ) -> StoreResult<Option<T>> {
        let conn = self.conn()?;
        let row = conn.query_row(sql, [id], map).optional()?;
        Ok(row)
    }

    fn delete_by_id(&self, table: &str, id: i64) -> StoreResult<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(&format!("DELETE FROM {} WHERE id = ?1", table), [id])?;
        Ok(deleted > 0)
    }
}

impl Store for SqliteStore {
    fn list_artifacts(&self) -> StoreResult<Vec<Artifact>> {
        self.query_all("SELECT id, name, shiny FROM artifacts ORDER BY id", artifact_from_row)
    }

    fn get_artifact(&self, id: i64) -> StoreResult<Option<Artifact>> {
        self.query_one("SELECT id, name, shiny FROM artifacts WHERE id = ?1", id, artifact_from_row)
    }

    fn insert_artifact(&self, new: &NewArtifact) -> StoreResult<Artifact> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO artifacts (name, shiny) VALUES (?1, ?2)",
            params![new.name, new.shiny],
        )?;
        Ok(Artifact {
            id: conn.last_insert_rowid(),
            name: new.name.clone(),
            shiny: new.shiny,
        })
    }

    fn update_artifact(&self, id: i64, new: &NewArtifact) -> StoreResult<Option<Artifact>> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE artifacts SET name = ?1, shiny = ?2 WHERE id = ?3",
            params![new.name, new.shiny, id],
        )?;
        Ok((changed > 0).then(|| Artifact {
            id,
            name: new.name.clone(),
            shiny: new.shiny,
        }))
    }

    fn delete_artifact(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("artifacts", id)
    }

    fn list_books(&self, scope: BookScope) -> StoreResult<Vec<Book>> {
        let sql = format!(
            "SELECT id, title, author, restricted FROM books WHERE {} ORDER BY id",
            scope_clause(scope)
        );
        self.query_all(&sql, book_from_row)
    }

    fn get_book(&self, id: i64, scope: BookScope) -> StoreResult<Option<Book>> {
        let sql = format!(
            "SELECT id, title, author, restricted FROM books WHERE id = ?1 AND {}",
            scope_clause(scope)
        );
        self.query_one(&sql, id, book_from_row)
    }

    fn insert_book(&self, new: &NewBook) -> StoreResult<Book> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO books (title, author, restricted) VALUES (?1, ?2, ?3)",
            params![new.title, new.author, new.restricted],
        )?;
        Ok(Book {
            id: conn.last_insert_rowid(),
            title: new.title.clone(),
            author: new.author.clone(),
            restricted: new.restricted,
        })
    }

    fn update_book(&self, id: i64, new: &NewBook) -> StoreResult<Option<Book>> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE books SET title = ?1, author = ?2, restricted = ?3 WHERE id = ?4",
            params![new.title, new.author, new.restricted, id],
        )?;
        Ok((changed > 0).then(|| Book {
            id,
            title: new.title.clone(),
            author: new.author.clone(),
            restricted: new.restricted,
        }))
    }

    fn delete_book(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("books", id)
    }

    fn list_people(&self) -> StoreResult<Vec<Person>> {
        self.query_all("SELECT id, first, last, title FROM people ORDER BY id", person_from_row)
    }

    fn insert_person(&self, new: &NewPerson) -> StoreResult<Person> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO people (first, last, title) VALUES (?1, ?2, ?3)",
            params![new.first, new.last, new.title],
        )?;
        Ok(Person {
            id: conn.last_insert_rowid(),
            first: new.first.clone(),
            last: new.last.clone(),
            title: new.title.clone(),
        })
    }

    fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>> {
        self.query_all("SELECT id, name FROM vehicles ORDER BY id", vehicle_from_row)
    }

    fn get_vehicle(&self, id: i64) -> StoreResult<Option<Vehicle>> {
        self.query_one("SELECT id, name FROM vehicles WHERE id = ?1", id, vehicle_from_row)
    }

    fn insert_vehicle(&self, new: &NewVehicle) -> StoreResult<Vehicle> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO vehicles (name) VALUES (?1)", params![new.name])?;
        Ok(Vehicle {
            id: conn.last_insert_rowid(),
            name: new.name.clone(),
        })
    }

    fn update_vehicle(&self, id: i64, new: &NewVehicle) -> StoreResult<Option<Vehicle>> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE vehicles SET name = ?1 WHERE id = ?2",
            params![new.name, id],
        )?;
        Ok((changed > 0).then(|| Vehicle { id, name: new.name.clone() }))
    }

    fn delete_vehicle(&self, id: i64) -> StoreResult<bool> {
        // parts go with it via ON DELETE CASCADE
        self.delete_by_id("vehicles", id)
    }

    fn list_parts(&self) -> StoreResult<Vec<Part>> {
        self.query_all("SELECT id, name, make, vehicle_id FROM parts ORDER BY id", part_from_row)
    }

    fn get_part(&self, id: i64) -> StoreResult<Option<Part>> {
        self.query_one(
            "SELECT id, name, make, vehicle_id FROM parts WHERE id = ?1",
            id,
            part_from_row,
        )
    }

    fn insert_part(&self, new: &NewPart) -> StoreResult<Part> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO parts (name, make, vehicle_id) VALUES (?1, ?2, ?3)",
            params![new.name, new.make, new.vehicle],
        )
        .map_err(|e| part_write_error(e, new.vehicle))?;
        Ok(Part {
            id: conn.last_insert_rowid(),
            name: new.name.clone(),
            make: new.make.clone(),
            vehicle: new.vehicle,
        })
    }

    fn update_part(&self, id: i64, new: &NewPart) -> StoreResult<Option<Part>> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE parts SET name = ?1, make = ?2, vehicle_id = ?3 WHERE id = ?4",
                params![new.name, new.make, new.vehicle, id],
            )
            .map_err(|e| part_write_error(e, new.vehicle))?;
        Ok((changed > 0).then(|| Part {
            id,
            name: new.name.clone(),
            make: new.make.clone(),
            vehicle: new.vehicle,
        }))
    }

    fn delete_part(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("parts", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_setup_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        setup_database(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('artifacts', 'books', 'people', 'vehicles', 'parts')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 5);
    }

    #[test]
    fn test_artifact_crud() {
        let store = store();
        let lamp = store
            .insert_artifact(&NewArtifact { name: "Lamp".to_string(), shiny: true })
            .unwrap();

        assert_eq!(store.get_artifact(lamp.id).unwrap(), Some(lamp.clone()));

        let dull = store
            .update_artifact(lamp.id, &NewArtifact { name: "Lamp".to_string(), shiny: false })
            .unwrap()
            .unwrap();
        assert!(!dull.shiny);
        assert_eq!(store.list_artifacts().unwrap(), vec![dull]);

        assert!(store.delete_artifact(lamp.id).unwrap());
        assert!(!store.delete_artifact(lamp.id).unwrap());
        assert!(store.get_artifact(lamp.id).unwrap().is_none());
    }

    #[test]
    fn test_books_filtered_by_scope() {
        let store = store();
        let open = store
            .insert_book(&NewBook { title: "Emma".into(), author: "Austen".into(), restricted: false })
            .unwrap();
        let hidden = store
            .insert_book(&NewBook { title: "Ulysses".into(), author: "Joyce".into(), restricted: true })
            .unwrap();

        assert_eq!(store.list_books(BookScope::Unrestricted).unwrap(), vec![open.clone()]);
        assert_eq!(store.list_books(BookScope::All).unwrap(), vec![open, hidden.clone()]);
        assert!(store.get_book(hidden.id, BookScope::Unrestricted).unwrap().is_none());
        assert_eq!(store.get_book(hidden.id, BookScope::All).unwrap(), Some(hidden));
    }

    #[test]
    fn test_cascade_delete_parts() {
        let store = store();
        let car = store.insert_vehicle(&NewVehicle { name: "Car".into() }).unwrap();
        let boat = store.insert_vehicle(&NewVehicle { name: "Boat".into() }).unwrap();
        for name in ["Door", "Hood"] {
            store
                .insert_part(&NewPart { name: name.into(), make: "GM".into(), vehicle: car.id })
                .unwrap();
        }
        let prop = store
            .insert_part(&NewPart { name: "Prop".into(), make: "Yamaha".into(), vehicle: boat.id })
            .unwrap();

        assert!(store.delete_vehicle(car.id).unwrap());
        assert_eq!(store.list_parts().unwrap(), vec![prop]);
    }

    #[test]
    fn test_part_foreign_key_enforced() {
        let store = store();
        let err = store
            .insert_part(&NewPart { name: "Ghost".into(), make: "None".into(), vehicle: 42 })
            .unwrap_err();

        assert!(matches!(err, StoreError::MissingReference { id: 42, .. }));
    }

    #[test]
    fn test_people_listing_order() {
        let store = store();
        for (first, last) in [("Ada", "Lovelace"), ("Alan", "Turing")] {
            store
                .insert_person(&NewPerson {
                    first: first.into(),
                    last: last.into(),
                    title: "Dr".into(),
                })
                .unwrap();
        }

        let people = store.list_people().unwrap();
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].first, "Ada");
        assert_eq!(people[1].last, "Turing");
    }
}
