use std::fmt;

use crate::base_types::{EventIdx, FlowValue, ServiceIdx, StationIdx, Time};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventRole {
    Departure,
    Arrival,
}

/// A departure or an arrival of a service; a node of the event network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    idx: EventIdx,
    service: ServiceIdx,
    role: EventRole,
    station: StationIdx,
    time: Time,
    supply: FlowValue,
}

// methods
impl Event {
    pub fn idx(&self) -> EventIdx {
        self.idx
    }

    pub fn service(&self) -> ServiceIdx {
        self.service
    }

    pub fn role(&self) -> EventRole {
        self.role
    }

    pub fn station(&self) -> StationIdx {
        self.station
    }

    pub fn time(&self) -> Time {
        self.time
    }

    /// net outflow the event has to produce (positive: source, negative: sink)
    pub fn supply(&self) -> FlowValue {
        self.supply
    }
}

// static functions
impl Event {
    pub(crate) fn new(
        service: ServiceIdx,
        role: EventRole,
        station: StationIdx,
        time: Time,
        supply: FlowValue,
    ) -> Event {
        let idx = match role {
            EventRole::Departure => service.departure(),
            EventRole::Arrival => service.arrival(),
        };
        Event {
            idx,
            service,
            role,
            station,
            time,
            supply,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let role = match self.role {
            EventRole::Departure => "D",
            EventRole::Arrival => "A",
        };
        write!(f, "{}_{}@{}", self.service, role, self.time)
    }
}
