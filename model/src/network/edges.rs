use std::fmt;

use crate::base_types::{Cost, EdgeIdx, EventIdx, FlowValue, ServiceIdx, StationIdx};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// departure -> arrival of the same service
    Trip(ServiceIdx),
    /// consecutive events of a station's chain
    Transfer(StationIdx),
    /// last event of a station back to its first event
    Overnight(StationIdx),
}

/// Directed edge `[lower, upper], cost`. An upper bound of None is unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    idx: EdgeIdx,
    kind: EdgeKind,
    tail: EventIdx,
    head: EventIdx,
    lower: FlowValue,
    upper: Option<FlowValue>,
    cost: Cost,
}

// methods
impl Edge {
    pub fn idx(&self) -> EdgeIdx {
        self.idx
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn tail(&self) -> EventIdx {
        self.tail
    }

    pub fn head(&self) -> EventIdx {
        self.head
    }

    pub fn lower(&self) -> FlowValue {
        self.lower
    }

    pub fn upper(&self) -> Option<FlowValue> {
        self.upper
    }

    /// cost per unit of flow
    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn admits(&self, flow: FlowValue) -> bool {
        self.lower <= flow && self.upper.map_or(true, |upper| flow <= upper)
    }

    pub fn is_trip(&self) -> bool {
        matches!(self.kind, EdgeKind::Trip(_))
    }

    pub fn is_overnight(&self) -> bool {
        matches!(self.kind, EdgeKind::Overnight(_))
    }
}

// static functions
impl Edge {
    pub(crate) fn new(
        idx: EdgeIdx,
        kind: EdgeKind,
        tail: EventIdx,
        head: EventIdx,
        lower: FlowValue,
        upper: Option<FlowValue>,
        cost: Cost,
    ) -> Edge {
        Edge {
            idx,
            kind,
            tail,
            head,
            lower,
            upper,
            cost,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upper {
            Some(upper) => write!(f, "[{},{}] {}", self.lower, upper, self.cost),
            None => write!(f, "[{},inf] {}", self.lower, self.cost),
        }
    }
}
