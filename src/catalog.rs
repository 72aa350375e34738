// 📒 Catalog Service - validation + access policy over a Store
//
// Everything the HTTP layer and the CLI importer do to records goes through
// here. No HTTP types in this module.

use crate::access::{authorize, BookScope, Caller, Decision, DenyReason, Operation};
use crate::entities::{
    list_tools, Artifact, ArtifactDraft, Book, BookDraft, NewPart, Part, PartDraft, PeopleListing,
    Person, PersonDraft, ToolListing, Vehicle, VehicleDraft, WriteMode,
};
use crate::schema::{msg_missing_reference, ValidationErrors};
use crate::store::{Store, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("authentication required")]
    Unauthenticated,

    #[error("you do not have permission to {action} books")]
    Forbidden { action: &'static str },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Store(StoreError),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CatalogError::NotFound { entity, id: id.to_string() }
    }
}

impl From<ValidationErrors> for CatalogError {
    fn from(errors: ValidationErrors) -> Self {
        CatalogError::Validation(errors)
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingReference { entity, id } => {
                CatalogError::Validation(ValidationErrors::single(entity, msg_missing_reference(id)))
            }
            other => CatalogError::Store(other),
        }
    }
}

#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn Store>,
}

impl Catalog {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Catalog { store }
    }

    // ========================================================================
    // ARTIFACTS
    // ========================================================================

    pub fn list_artifacts(&self) -> CatalogResult<Vec<Artifact>> {
        Ok(self.store.list_artifacts()?)
    }

    pub fn get_artifact(&self, id: i64) -> CatalogResult<Artifact> {
        self.store
            .get_artifact(id)?
            .ok_or_else(|| CatalogError::not_found("artifact", id))
    }

    pub fn create_artifact(&self, draft: ArtifactDraft) -> CatalogResult<Artifact> {
        let new = draft.complete()?;
        let artifact = self.store.insert_artifact(&new)?;
        info!(artifact_id = artifact.id, "artifact created");
        Ok(artifact)
    }

    pub fn update_artifact(
        &self,
        id: i64,
        draft: ArtifactDraft,
        mode: WriteMode,
    ) -> CatalogResult<Artifact> {
        let current = self.get_artifact(id)?;
        let new = draft.apply(mode, &current)?;
        self.store
            .update_artifact(id, &new)?
            .ok_or_else(|| CatalogError::not_found("artifact", id))
    }

    pub fn delete_artifact(&self, id: i64) -> CatalogResult<()> {
        if !self.store.delete_artifact(id)? {
            return Err(CatalogError::not_found("artifact", id));
        }
        info!(artifact_id = id, "artifact deleted");
        Ok(())
    }

    // ========================================================================
    // BOOKS (access controlled)
    // ========================================================================

    fn check(&self, caller: &Caller, op: Operation) -> CatalogResult<()> {
        match authorize(caller, op) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => {
                warn!(
                    caller = caller.display_name(),
                    operation = op.as_str(),
                    ?reason,
                    "book access denied"
                );
                Err(match reason {
                    DenyReason::Unauthenticated => CatalogError::Unauthenticated,
                    DenyReason::InsufficientRole => CatalogError::Forbidden { action: op.as_str() },
                })
            }
        }
    }

    pub fn list_books(&self, caller: &Caller) -> CatalogResult<Vec<Book>> {
        self.check(caller, Operation::List)?;
        Ok(self.store.list_books(BookScope::for_caller(caller))?)
    }

    /// Restricted books are reported as missing to callers who cannot see them
    pub fn get_book(&self, caller: &Caller, id: i64) -> CatalogResult<Book> {
        self.check(caller, Operation::Retrieve)?;
        self.visible_book(caller, id)
    }

    fn visible_book(&self, caller: &Caller, id: i64) -> CatalogResult<Book> {
        self.store
            .get_book(id, BookScope::for_caller(caller))?
            .ok_or_else(|| CatalogError::not_found("book", id))
    }

    pub fn create_book(&self, caller: &Caller, draft: BookDraft) -> CatalogResult<Book> {
        self.check(caller, Operation::Create)?;
        let new = draft.complete()?;
        let book = self.store.insert_book(&new)?;
        info!(book_id = book.id, caller = caller.display_name(), "book created");
        Ok(book)
    }

    /// Permission first, then lookup within the caller's read scope
    pub fn update_book(
        &self,
        caller: &Caller,
        id: i64,
        draft: BookDraft,
        mode: WriteMode,
    ) -> CatalogResult<Book> {
        self.check(caller, Operation::Update)?;
        let current = self.visible_book(caller, id)?;
        let new = draft.apply(mode, &current)?;
        let book = self
            .store
            .update_book(id, &new)?
            .ok_or_else(|| CatalogError::not_found("book", id))?;
        info!(book_id = id, caller = caller.display_name(), "book updated");
        Ok(book)
    }

    pub fn delete_book(&self, caller: &Caller, id: i64) -> CatalogResult<()> {
        self.check(caller, Operation::Delete)?;
        self.visible_book(caller, id)?;
        if !self.store.delete_book(id)? {
            return Err(CatalogError::not_found("book", id));
        }
        info!(book_id = id, caller = caller.display_name(), "book deleted");
        Ok(())
    }

    pub fn library_access(&self, caller: &Caller) -> CatalogResult<()> {
        self.check(caller, Operation::ViewLibrary)
    }

    // ========================================================================
    // PEOPLE
    // ========================================================================

    pub fn list_people(&self) -> CatalogResult<PeopleListing> {
        Ok(PeopleListing::from_people(self.store.list_people()?))
    }

    pub fn add_person(&self, draft: PersonDraft) -> CatalogResult<Person> {
        let new = draft.complete()?;
        Ok(self.store.insert_person(&new)?)
    }

    // ========================================================================
    // VEHICLES & PARTS
    // ========================================================================

    pub fn list_vehicles(&self) -> CatalogResult<Vec<Vehicle>> {
        Ok(self.store.list_vehicles()?)
    }

    pub fn get_vehicle(&self, id: i64) -> CatalogResult<Vehicle> {
        self.store
            .get_vehicle(id)?
            .ok_or_else(|| CatalogError::not_found("vehicle", id))
    }

    pub fn create_vehicle(&self, draft: VehicleDraft) -> CatalogResult<Vehicle> {
        let new = draft.complete()?;
        let vehicle = self.store.insert_vehicle(&new)?;
        info!(vehicle_id = vehicle.id, "vehicle created");
        Ok(vehicle)
    }

    pub fn update_vehicle(
        &self,
        id: i64,
        draft: VehicleDraft,
        mode: WriteMode,
    ) -> CatalogResult<Vehicle> {
        let current = self.get_vehicle(id)?;
        let new = draft.apply(mode, &current)?;
        self.store
            .update_vehicle(id, &new)?
            .ok_or_else(|| CatalogError::not_found("vehicle", id))
    }

    /// Deletes the vehicle and all of its parts
    pub fn delete_vehicle(&self, id: i64) -> CatalogResult<()> {
        if !self.store.delete_vehicle(id)? {
            return Err(CatalogError::not_found("vehicle", id));
        }
        info!(vehicle_id = id, "vehicle deleted with its parts");
        Ok(())
    }

    pub fn list_parts(&self) -> CatalogResult<Vec<Part>> {
        Ok(self.store.list_parts()?)
    }

    pub fn get_part(&self, id: i64) -> CatalogResult<Part> {
        self.store
            .get_part(id)?
            .ok_or_else(|| CatalogError::not_found("part", id))
    }

    fn vehicle_exists(&self, new: &NewPart) -> CatalogResult<()> {
        match self.store.get_vehicle(new.vehicle)? {
            Some(_) => Ok(()),
            None => Err(ValidationErrors::single("vehicle", msg_missing_reference(new.vehicle)).into()),
        }
    }

    pub fn create_part(&self, draft: PartDraft) -> CatalogResult<Part> {
        let new = draft.complete()?;
        self.vehicle_exists(&new)?;
        let part = self.store.insert_part(&new)?;
        info!(part_id = part.id, vehicle_id = part.vehicle, "part created");
        Ok(part)
    }

    pub fn update_part(&self, id: i64, draft: PartDraft, mode: WriteMode) -> CatalogResult<Part> {
        let current = self.get_part(id)?;
        let new = draft.apply(mode, &current)?;
        self.vehicle_exists(&new)?;
        self.store
            .update_part(id, &new)?
            .ok_or_else(|| CatalogError::not_found("part", id))
    }

    pub fn delete_part(&self, id: i64) -> CatalogResult<()> {
        if !self.store.delete_part(id)? {
            return Err(CatalogError::not_found("part", id));
        }
        Ok(())
    }

    // ========================================================================
    // TOOLS
    // ========================================================================

    pub fn list_tools(&self) -> ToolListing {
        list_tools()
    }
}

// ============================================================================
// TESTS
// ============================================================================
