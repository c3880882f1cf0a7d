use derive_more::Display;
use derive_more::From;

pub type Idx = u32;

#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationIdx(Idx);

#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceIdx(Idx);

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "ev{}", _0)]
pub struct EventIdx(Idx);

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "e{}", _0)]
pub struct EdgeIdx(Idx);

impl StationIdx {
    pub fn idx(&self) -> usize {
        self.0 as usize
    }
}

impl ServiceIdx {
    pub fn idx(&self) -> usize {
        self.0 as usize
    }

    pub fn departure(&self) -> EventIdx {
        EventIdx(2 * self.0)
    }

    pub fn arrival(&self) -> EventIdx {
        EventIdx(2 * self.0 + 1)
    }
}

impl EventIdx {
    pub fn idx(&self) -> usize {
        self.0 as usize
    }

    pub fn service(&self) -> ServiceIdx {
        ServiceIdx(self.0 / 2)
    }

    pub fn from_usize(idx: usize) -> EventIdx {
        EventIdx(idx as Idx)
    }
}

impl EdgeIdx {
    pub fn idx(&self) -> usize {
        self.0 as usize
    }

    pub fn from_usize(idx: usize) -> EdgeIdx {
        EdgeIdx(idx as Idx)
    }
}

/// time of day in integer ticks (the unit is whatever the timetable uses, e.g. minutes)
pub type Time = u32;

pub type VehicleCount = u32;
pub type PassengerCount = u32;

/// integer amount of flow on an edge (number of units)
pub type FlowValue = i64;

/// fixed-point cost, see [`crate::config::Config::scaled_cost`]
pub type Cost = i64;
