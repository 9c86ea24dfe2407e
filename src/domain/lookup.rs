use crate::domain::{Location, LocationName};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// In-memory index of fetched locations, keyed by name.
#[derive(Debug, Default)]
pub struct LocationLookup {
    locations: HashMap<LocationName, Location>,
}

impl LocationLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a location, refusing to overwrite an existing key.
    ///
    /// On conflict the rejected location is handed back.
    pub fn insert(&mut self, location: Location) -> Result<(), Location> {
        match self.locations.entry(location.name.clone()) {
            Entry::Occupied(_) => Err(location),
            Entry::Vacant(entry) => {
                entry.insert(location);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Location> {
        self.locations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.locations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
