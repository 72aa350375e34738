// 🗄️ Storage Interface - what the catalog needs from persistence
//
// `SqliteStore` (db.rs) is the real backend; `MemoryStore` keeps the same
// semantics in process for tests and throwaway runs.

use crate::access::BookScope;
use crate::entities::{
    Artifact, Book, NewArtifact, NewBook, NewPart, NewPerson, NewVehicle, Part, Person, Vehicle,
};
use std::collections::BTreeMap;
use std::sync::RwLock;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A foreign key points at a record that does not exist
    #[error("{entity} {id} does not exist")]
    MissingReference { entity: &'static str, id: i64 },

    #[error("storage lock poisoned")]
    Poisoned,

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// CRUD over every persisted record type.
///
/// `update_*` returns `None` and `delete_*` returns `false` when the id is
/// unknown. Books are always read through a [`BookScope`].
pub trait Store: Send + Sync {
    fn list_artifacts(&self) -> StoreResult<Vec<Artifact>>;
    fn get_artifact(&self, id: i64) -> StoreResult<Option<Artifact>>;
    fn insert_artifact(&self, new: &NewArtifact) -> StoreResult<Artifact>;
    fn update_artifact(&self, id: i64, new: &NewArtifact) -> StoreResult<Option<Artifact>>;
    fn delete_artifact(&self, id: i64) -> StoreResult<bool>;

    fn list_books(&self, scope: BookScope) -> StoreResult<Vec<Book>>;
    fn get_book(&self, id: i64, scope: BookScope) -> StoreResult<Option<Book>>;
    fn insert_book(&self, new: &NewBook) -> StoreResult<Book>;
    fn update_book(&self, id: i64, new: &NewBook) -> StoreResult<Option<Book>>;
    fn delete_book(&self, id: i64) -> StoreResult<bool>;

    fn list_people(&self) -> StoreResult<Vec<Person>>;
    fn insert_person(&self, new: &NewPerson) -> StoreResult<Person>;

    fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>>;
    fn get_vehicle(&self, id: i64) -> StoreResult<Option<Vehicle>>;
    fn insert_vehicle(&self, new: &NewVehicle) -> StoreResult<Vehicle>;
    fn update_vehicle(&self, id: i64, new: &NewVehicle) -> StoreResult<Option<Vehicle>>;
    /// Also deletes every part of the vehicle
    fn delete_vehicle(&self, id: i64) -> StoreResult<bool>;

    fn list_parts(&self) -> StoreResult<Vec<Part>>;
    fn get_part(&self, id: i64) -> StoreResult<Option<Part>>;
    fn insert_part(&self, new: &NewPart) -> StoreResult<Part>;
    fn update_part(&self, id: i64, new: &NewPart) -> StoreResult<Option<Part>>;
    fn delete_part(&self, id: i64) -> StoreResult<bool>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// One table: rows keyed by id, ids handed out from 1 and never reused
#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Table { next_id: 1, rows: BTreeMap::new() }
    }

    fn insert(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn replace(&mut self, id: i64, build: impl FnOnce(i64) -> T) -> Option<T> {
        let slot = self.rows.get_mut(&id)?;
        *slot = build(id);
        Some(slot.clone())
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn remove(&mut self, id: i64) -> bool {
        self.rows.remove(&id).is_some()
    }
}

#[derive(Debug)]
struct Tables {
    artifacts: Table<Artifact>,
    books: Table<Book>,
    people: Table<Person>,
    vehicles: Table<Vehicle>,
    parts: Table<Part>,
}

pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            tables: RwLock::new(Tables {
                artifacts: Table::new(),
                books: Table::new(),
                people: Table::new(),
                vehicles: Table::new(),
                parts: Table::new(),
            }),
        }
    }

    fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> StoreResult<R> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&tables))
    }

    fn write<R>(&self, f: impl FnOnce(&mut Tables) -> StoreResult<R>) -> StoreResult<R> {
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        f(&mut tables)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn vehicle_must_exist(tables: &Tables, vehicle: i64) -> StoreResult<()> {
    if tables.vehicles.rows.contains_key(&vehicle) {
        Ok(())
    } else {
        Err(StoreError::MissingReference { entity: "vehicle", id: vehicle })
    }
}

impl Store for MemoryStore {
    fn list_artifacts(&self) -> StoreResult<Vec<Artifact>> {
        self.read(|t| t.artifacts.all())
    }

    fn get_artifact(&self, id: i64) -> StoreResult<Option<Artifact>> {
        self.read(|t| t.artifacts.get(id))
    }

    fn insert_artifact(&self, new: &NewArtifact) -> StoreResult<Artifact> {
        self.write(|t| {
            Ok(t.artifacts.insert(|id| Artifact {
                id,
                name: new.name.clone(),
                shiny: new.shiny,
            }))
        })
    }

    fn update_artifact(&self, id: i64, new: &NewArtifact) -> StoreResult<Option<Artifact>> {
        self.write(|t| {
            Ok(t.artifacts.replace(id, |id| Artifact {
                id,
                name: new.name.clone(),
                shiny: new.shiny,
            }))
        })
    }

    fn delete_artifact(&self, id: i64) -> StoreResult<bool> {
        self.write(|t| Ok(t.artifacts.remove(id)))
    }

    fn list_books(&self, scope: BookScope) -> StoreResult<Vec<Book>> {
        self.read(|t| t.books.all().into_iter().filter(|b| scope.admits(b)).collect())
    }

    fn get_book(&self, id: i64, scope: BookScope) -> StoreResult<Option<Book>> {
        self.read(|t| t.books.get(id).filter(|b| scope.admits(b)))
    }

    fn insert_book(&self, new: &NewBook) -> StoreResult<Book> {
        self.write(|t| {
            Ok(t.books.insert(|id| Book {
                id,
                title: new.title.clone(),
                author: new.author.clone(),
                restricted: new.restricted,
            }))
        })
    }

    fn update_book(&self, id: i64, new: &NewBook) -> StoreResult<Option<Book>> {
        self.write(|t| {
            Ok(t.books.replace(id, |id| Book {
                id,
                title: new.title.clone(),
                author: new.author.clone(),
                restricted: new.restricted,
            }))
        })
    }

    fn delete_book(&self, id: i64) -> StoreResult<bool> {
        self.write(|t| Ok(t.books.remove(id)))
    }

    fn list_people(&self) -> StoreResult<Vec<Person>> {
        self.read(|t| t.people.all())
    }

    fn insert_person(&self, new: &NewPerson) -> StoreResult<Person> {
        self.write(|t| {
            Ok(t.people.insert(|id| Person {
                id,
                first: new.first.clone(),
                last: new.last.clone(),
                title: new.title.clone(),
            }))
        })
    }

    fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>> {
        self.read(|t| t.vehicles.all())
    }

    fn get_vehicle(&self, id: i64) -> StoreResult<Option<Vehicle>> {
        self.read(|t| t.vehicles.get(id))
    }

    fn insert_vehicle(&self, new: &NewVehicle) -> StoreResult<Vehicle> {
        self.write(|t| Ok(t.vehicles.insert(|id| Vehicle { id, name: new.name.clone() })))
    }

    fn update_vehicle(&self, id: i64, new: &NewVehicle) -> StoreResult<Option<Vehicle>> {
        self.write(|t| Ok(t.vehicles.replace(id, |id| Vehicle { id, name: new.name.clone() })))
    }

    fn delete_vehicle(&self, id: i64) -> StoreResult<bool> {
        self.write(|t| {
            if !t.vehicles.remove(id) {
                return Ok(false);
            }
            t.parts.rows.retain(|_, part| part.vehicle != id);
            Ok(true)
        })
    }

    fn list_parts(&self) -> StoreResult<Vec<Part>> {
        self.read(|t| t.parts.all())
    }

    fn get_part(&self, id: i64) -> StoreResult<Option<Part>> {
        self.read(|t| t.parts.get(id))
    }

    fn insert_part(&self, new: &NewPart) -> StoreResult<Part> {
        self.write(|t| {
            vehicle_must_exist(t, new.vehicle)?;
            Ok(t.parts.insert(|id| Part {
                id,
                name: new.name.clone(),
                make: new.make.clone(),
                vehicle: new.vehicle,
            }))
        })
    }

    fn update_part(&self, id: i64, new: &NewPart) -> StoreResult<Option<Part>> {
        self.write(|t| {
            vehicle_must_exist(t, new.vehicle)?;
            Ok(t.parts.replace(id, |id| Part {
                id,
                name: new.name.clone(),
                make: new.make.clone(),
                vehicle: new.vehicle,
            }))
        })
    }

    fn delete_part(&self, id: i64) -> StoreResult<bool> {
        self.write(|t| Ok(t.parts.remove(id)))
    }
}

// ============================================================================
// TESTS
// ============================================================================
