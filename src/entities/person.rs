// 👤 Person Entity - first / last / title

use crate::schema::{required_text, ValidationErrors};
use serde::{Deserialize, Serialize};

pub const FIRST_MAX_LEN: usize = 50;
pub const LAST_MAX_LEN: usize = 50;
pub const TITLE_MAX_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub first: String,
    pub last: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub first: String,
    pub last: String,
    pub title: String,
}

/// Inbound person payload (API or CSV row)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonDraft {
    pub first: Option<String>,
    pub last: Option<String>,
    pub title: Option<String>,
}

impl PersonDraft {
    pub fn complete(self) -> Result<NewPerson, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let first = required_text(&mut errors, "first", self.first, FIRST_MAX_LEN);
        let last = required_text(&mut errors, "last", self.last, LAST_MAX_LEN);
        let title = required_text(&mut errors, "title", self.title, TITLE_MAX_LEN);

        errors.into_result(NewPerson { first, last, title })
    }
}

/// One entry of the people listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonEntry {
    pub first: String,
    pub last: String,
    pub title: String,
}

impl From<Person> for PersonEntry {
    fn from(person: Person) -> Self {
        Self {
            first: person.first,
            last: person.last,
            title: person.title,
        }
    }
}

/// Body of `GET /people/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeopleListing {
    pub people: Vec<PersonEntry>,
}

impl PeopleListing {
    pub fn from_people(people: Vec<Person>) -> Self {
        Self {
            people: people.into_iter().map(PersonEntry::from).collect(),
        }
    }
}
