// Fedora Catalog - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod schema;
pub mod entities;
pub mod access;
pub mod store;
pub mod db;
pub mod catalog;
pub mod import;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use access::{authorize, BookScope, Caller, Capabilities, Decision, DenyReason, Operation};
pub use catalog::{Catalog, CatalogError, CatalogResult};
pub use db::{open_database, setup_database, SqliteStore};
pub use entities::{
    list_tools, Artifact, ArtifactDraft, Book, BookDraft, Part, PartDraft, PeopleListing, Person,
    PersonDraft, PersonEntry, Tool, ToolListing, Vehicle, VehicleDraft, WriteMode,
};
pub use import::{import_artifacts, import_people, ImportReport};
pub use schema::ValidationErrors;
pub use store::{MemoryStore, Store, StoreError, StoreResult};

#[cfg(feature = "server")]
pub use api::{build_router, AppState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
