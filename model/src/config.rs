use std::collections::HashMap;

use crate::base_types::{Cost, StationIdx, VehicleCount};
use crate::error::MalformedTimetable;

/// Default fixed-point scale: costs are stored in thousandths.
pub const DEFAULT_COST_SCALE: Cost = 1000;

/// Parameters of an optimization run that are not part of the timetable itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    cost_scale: Cost,
    // stations without an entry can park an unbounded number of units overnight
    overnight_capacities: HashMap<StationIdx, VehicleCount>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cost_scale: DEFAULT_COST_SCALE,
            overnight_capacities: HashMap::new(),
        }
    }
}

// static functions
impl Config {
    pub fn new(
        cost_scale: Cost,
        overnight_capacities: HashMap<StationIdx, VehicleCount>,
    ) -> Result<Config, MalformedTimetable> {
        if cost_scale <= 0 {
            return Err(MalformedTimetable::InvalidCostScale(cost_scale));
        }
        Ok(Config {
            cost_scale,
            overnight_capacities,
        })
    }
}

// methods
impl Config {
    pub fn cost_scale(&self) -> Cost {
        self.cost_scale
    }

    /// None means no limit.
    pub fn overnight_capacity(&self, station: StationIdx) -> Option<VehicleCount> {
        self.overnight_capacities.get(&station).copied()
    }

    pub fn overnight_capacities(&self) -> impl Iterator<Item = (StationIdx, VehicleCount)> + '_ {
        self.overnight_capacities.iter().map(|(s, c)| (*s, *c))
    }

    /// returns a copy of this config where the station's overnight capacity is replaced
    /// (None removes the limit)
    pub fn with_overnight_capacity(
        &self,
        station: StationIdx,
        capacity: Option<VehicleCount>,
    ) -> Config {
        let mut overnight_capacities = self.overnight_capacities.clone();
        match capacity {
            Some(capacity) => overnight_capacities.insert(station, capacity),
            None => overnight_capacities.remove(&station),
        };
        Config {
            cost_scale: self.cost_scale,
            overnight_capacities,
        }
    }

    /// Converts a cost in the instance's currency into fixed-point cost units. None if the result
    /// does not fit into [`Cost`] or a non-zero cost would round to zero.
    pub fn scaled_cost(&self, cost: f64) -> Option<Cost> {
        let scaled = (cost * self.cost_scale as f64).round();
        if !scaled.is_finite() || scaled.abs() >= Cost::MAX as f64 || (scaled == 0.0 && cost != 0.0)
        {
            return None;
        }
        Some(scaled as Cost)
    }

    /// converts fixed-point cost units back into the instance's currency
    pub fn unscaled_cost(&self, cost: Cost) -> f64 {
        cost as f64 / self.cost_scale as f64
    }
}
