// 📚 Book Entity - the one access-controlled record
//
// `restricted = true` hides a book from callers without elevated read
// (see access::BookScope).

use crate::entities::WriteMode;
use crate::schema::{required_text, ValidationErrors};
use serde::{Deserialize, Serialize};

pub const TITLE_MAX_LEN: usize = 100;
pub const AUTHOR_MAX_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub restricted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub restricted: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookDraft {
    pub title: Option<String>,
    pub author: Option<String>,
    pub restricted: Option<bool>,
}

impl BookDraft {
    pub fn complete(self) -> Result<NewBook, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = required_text(&mut errors, "title", self.title, TITLE_MAX_LEN);
        let author = required_text(&mut errors, "author", self.author, AUTHOR_MAX_LEN);

        errors.into_result(NewBook {
            title,
            author,
            restricted: self.restricted.unwrap_or(false),
        })
    }

    pub fn apply(self, mode: WriteMode, current: &Book) -> Result<NewBook, ValidationErrors> {
        match mode {
            WriteMode::Full => self.complete(),
            WriteMode::Partial => BookDraft {
                title: self.title.or_else(|| Some(current.title.clone())),
                author: self.author.or_else(|| Some(current.author.clone())),
                restricted: self.restricted.or(Some(current.restricted)),
            }
            .complete(),
        }
    }
}
