use std::collections::HashMap;

use crate::base_types::{Idx, StationIdx};
use crate::error::MalformedTimetable;

/// The terminal stations of the timetable. Stations are indexed in the order in which they are
/// declared in the instance; the name is the identifier used in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Stations {
    names: Vec<String>,
    idx_of: HashMap<String, StationIdx>,
}

// static functions
impl Stations {
    pub fn new(names: Vec<String>) -> Result<Stations, MalformedTimetable> {
        let mut idx_of = HashMap::new();
        for (i, name) in names.iter().enumerate() {
            if idx_of
                .insert(name.clone(), StationIdx::from(i as Idx))
                .is_some()
            {
                return Err(MalformedTimetable::DuplicateStation(name.clone()));
            }
        }
        Ok(Stations { names, idx_of })
    }
}

// methods
impl Stations {
    pub fn get(&self, name: &str) -> Option<StationIdx> {
        self.idx_of.get(name).copied()
    }

    pub fn name(&self, station: StationIdx) -> &str {
        &self.names[station.idx()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StationIdx> + '_ {
        (0..self.names.len()).map(|i| StationIdx::from(i as Idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_station_is_rejected() {
        let result = Stations::new(vec!["Retiro".to_string(), "Retiro".to_string()]);
        assert_eq!(
            result,
            Err(MalformedTimetable::DuplicateStation("Retiro".to_string()))
        );
    }

    #[test]
    fn stations_are_indexed_in_declaration_order() {
        let stations = Stations::new(vec!["Retiro".to_string(), "Tigre".to_string()]).unwrap();
        assert_eq!(stations.get("Tigre"), Some(StationIdx::from(1)));
        assert_eq!(stations.name(StationIdx::from(0)), "Retiro");
        assert_eq!(stations.get("Victoria"), None);
        assert_eq!(stations.iter().count(), 2);
    }
}
