use crate::domain::{Centre, LocationName};

/// A project location as published in the locations document.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Location {
    pub name: LocationName,
    pub human_readable_name: String,
    pub centre: Centre,
}

/// Body of `GET /locations.json`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LocationsDocument {
    pub locations: Vec<Location>,
}

impl LocationsDocument {
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
