// 🏺 Artifact Entity - name + shiny flag

use crate::entities::WriteMode;
use crate::schema::{required_text, ValidationErrors};
use serde::{Deserialize, Serialize};

pub const NAME_MAX_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: i64,
    pub name: String,
    pub shiny: bool,
}

/// Validated artifact fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtifact {
    pub name: String,
    pub shiny: bool,
}

/// Inbound artifact payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtifactDraft {
    pub name: Option<String>,
    pub shiny: Option<bool>,
}

impl ArtifactDraft {
    pub fn complete(self) -> Result<NewArtifact, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", self.name, NAME_MAX_LEN);

        errors.into_result(NewArtifact {
            name,
            shiny: self.shiny.unwrap_or(false),
        })
    }

    pub fn apply(self, mode: WriteMode, current: &Artifact) -> Result<NewArtifact, ValidationErrors> {
        match mode {
            WriteMode::Full => self.complete(),
            WriteMode::Partial => ArtifactDraft {
                name: self.name.or_else(|| Some(current.name.clone())),
                shiny: self.shiny.or(Some(current.shiny)),
            }
            .complete(),
        }
    }
}
