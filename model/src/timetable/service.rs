use crate::base_types::{PassengerCount, ServiceIdx, StationIdx, Time, VehicleCount};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stop {
    station: StationIdx,
    time: Time,
}

impl Stop {
    pub fn new(station: StationIdx, time: Time) -> Stop {
        Stop { station, time }
    }

    pub fn station(&self) -> StationIdx {
        self.station
    }

    pub fn time(&self) -> Time {
        self.time
    }
}

/// One scheduled trip from its departure stop to its arrival stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    idx: ServiceIdx,
    id: String,
    departure: Stop,
    arrival: Stop,
    demand: PassengerCount,
    required_units: VehicleCount,
}

// methods
impl Service {
    pub fn idx(&self) -> ServiceIdx {
        self.idx
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn departure(&self) -> Stop {
        self.departure
    }

    pub fn arrival(&self) -> Stop {
        self.arrival
    }

    pub fn demand(&self) -> PassengerCount {
        self.demand
    }

    /// minimum number of units that must run this service together
    pub fn required_units(&self) -> VehicleCount {
        self.required_units
    }
}

// static functions
impl Service {
    pub(crate) fn new(
        idx: ServiceIdx,
        id: String,
        departure: Stop,
        arrival: Stop,
        demand: PassengerCount,
        unit_capacity: PassengerCount,
    ) -> Service {
        Service {
            idx,
            id,
            departure,
            arrival,
            demand,
            required_units: demand.div_ceil(unit_capacity),
        }
    }
}
