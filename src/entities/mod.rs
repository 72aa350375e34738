// Entity Models - the record catalog
//
// Each persisted entity has:
// - A store-assigned integer id
// - A `New*` value holding validated fields, ready for storage
// - A `*Draft` payload (all fields optional) that validates into `New*`,
//   either completely (create / replace) or on top of the current record (patch)

pub mod artifact;
pub mod book;
pub mod person;
pub mod vehicle;
pub mod tool;

pub use artifact::{Artifact, ArtifactDraft, NewArtifact};
pub use book::{Book, BookDraft, NewBook};
pub use person::{NewPerson, Person, PersonDraft, PersonEntry, PeopleListing};
pub use vehicle::{NewPart, NewVehicle, Part, PartDraft, Vehicle, VehicleDraft};
pub use tool::{list_tools, Tool, ToolListing};

/// How an update payload is applied to an existing record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Every required field must be present (PUT)
    Full,
    /// Missing fields keep their current value (PATCH)
    Partial,
}
