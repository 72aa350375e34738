// 🚗 Vehicle + Part Entities
//
// A Part belongs to exactly one Vehicle. Deleting the Vehicle deletes its
// Parts; a Part can only be stored against a Vehicle that exists (checked by
// the catalog and enforced again by the store).

use crate::entities::WriteMode;
use crate::schema::{required_id, required_text, ValidationErrors};
use serde::{Deserialize, Serialize};

pub const NAME_MAX_LEN: usize = 50;
pub const MAKE_MAX_LEN: usize = 50;

// ============================================================================
// VEHICLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleDraft {
    pub name: Option<String>,
}

impl VehicleDraft {
    pub fn complete(self) -> Result<NewVehicle, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", self.name, NAME_MAX_LEN);
        errors.into_result(NewVehicle { name })
    }

    pub fn apply(self, mode: WriteMode, current: &Vehicle) -> Result<NewVehicle, ValidationErrors> {
        match mode {
            WriteMode::Full => self.complete(),
            WriteMode::Partial => VehicleDraft {
                name: self.name.or_else(|| Some(current.name.clone())),
            }
            .complete(),
        }
    }
}

// ============================================================================
// PART
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: i64,
    pub name: String,
    pub make: String,
    /// Owning vehicle id
    pub vehicle: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPart {
    pub name: String,
    pub make: String,
    pub vehicle: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartDraft {
    pub name: Option<String>,
    pub make: Option<String>,
    pub vehicle: Option<i64>,
}

impl PartDraft {
    /// Field-level checks only; whether `vehicle` exists is the catalog's call.
    pub fn complete(self) -> Result<NewPart, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", self.name, NAME_MAX_LEN);
        let make = required_text(&mut errors, "make", self.make, MAKE_MAX_LEN);
        let vehicle = required_id(&mut errors, "vehicle", self.vehicle);

        errors.into_result(NewPart { name, make, vehicle })
    }

    pub fn apply(self, mode: WriteMode, current: &Part) -> Result<NewPart, ValidationErrors> {
        match mode {
            WriteMode::Full => self.complete(),
            WriteMode::Partial => PartDraft {
                name: self.name.or_else(|| Some(current.name.clone())),
                make: self.make.or_else(|| Some(current.make.clone())),
                vehicle: self.vehicle.or(Some(current.vehicle)),
            }
            .complete(),
        }
    }
}
