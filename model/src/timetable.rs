pub mod service;

use std::collections::HashMap;

use itertools::Itertools;

use crate::base_types::{Idx, PassengerCount, ServiceIdx, StationIdx, Time, VehicleCount};
use crate::error::MalformedTimetable;
use crate::stations::Stations;
use service::{Service, Stop};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingStockInfo {
    capacity: PassengerCount,
    max_units: VehicleCount,
}

impl RollingStockInfo {
    pub fn new(
        capacity: PassengerCount,
        max_units: VehicleCount,
    ) -> Result<RollingStockInfo, MalformedTimetable> {
        if capacity == 0 {
            return Err(MalformedTimetable::ZeroUnitCapacity);
        }
        Ok(RollingStockInfo {
            capacity,
            max_units,
        })
    }

    /// passengers per unit
    pub fn capacity(&self) -> PassengerCount {
        self.capacity
    }

    /// maximal number of units coupled on one service
    pub fn max_units(&self) -> VehicleCount {
        self.max_units
    }
}

/// Unvalidated service as it comes out of an instance document. Stops are (station name, time).
#[derive(Debug, Clone)]
pub struct ServiceDraft {
    pub id: String,
    pub stops: Vec<(String, i64)>,
    pub demand: Vec<i64>,
}

/// Validated timetable. Services are indexed by ascending service id.
#[derive(Debug, Clone, PartialEq)]
pub struct Timetable {
    stations: Stations,
    rolling_stock: RollingStockInfo,
    overnight_costs: Vec<f64>,
    services: Vec<Service>,
}

// static functions
impl Timetable {
    pub fn new(
        stations: Stations,
        rolling_stock: RollingStockInfo,
        overnight_costs: &HashMap<String, f64>,
        drafts: Vec<ServiceDraft>,
    ) -> Result<Timetable, MalformedTimetable> {
        let overnight_costs = stations
            .iter()
            .map(|station| {
                let name = stations.name(station);
                match overnight_costs.get(name) {
                    None => Err(MalformedTimetable::MissingOvernightCost(name.to_string())),
                    Some(&cost) if !cost.is_finite() || cost < 0.0 => {
                        Err(MalformedTimetable::InvalidOvernightCost {
                            station: name.to_string(),
                            cost,
                        })
                    }
                    Some(&cost) => Ok(cost),
                }
            })
            .collect::<Result<Vec<f64>, MalformedTimetable>>()?;

        let drafts: Vec<ServiceDraft> = drafts
            .into_iter()
            .sorted_by(|a, b| a.id.cmp(&b.id))
            .collect();
        if let Some((draft, _)) = drafts.iter().tuple_windows().find(|(a, b)| a.id == b.id) {
            return Err(MalformedTimetable::DuplicateService(draft.id.clone()));
        }

        let services = drafts
            .into_iter()
            .enumerate()
            .map(|(i, draft)| {
                validate_service(
                    ServiceIdx::from(i as Idx),
                    draft,
                    &stations,
                    rolling_stock.capacity(),
                )
            })
            .collect::<Result<Vec<Service>, MalformedTimetable>>()?;

        Ok(Timetable {
            stations,
            rolling_stock,
            overnight_costs,
            services,
        })
    }
}

// methods
impl Timetable {
    pub fn stations(&self) -> &Stations {
        &self.stations
    }

    pub fn rolling_stock(&self) -> RollingStockInfo {
        self.rolling_stock
    }

    /// cost of parking one unit overnight at the station (in the instance's currency)
    pub fn overnight_cost(&self, station: StationIdx) -> f64 {
        self.overnight_costs[station.idx()]
    }

    pub fn service(&self, service: ServiceIdx) -> &Service {
        &self.services[service.idx()]
    }

    pub fn services(&self) -> impl Iterator<Item = &Service> + '_ {
        self.services.iter()
    }

    pub fn number_of_services(&self) -> usize {
        self.services.len()
    }

    pub fn find_service(&self, id: &str) -> Option<&Service> {
        self.services
            .binary_search_by(|s| s.id().cmp(id))
            .ok()
            .map(|i| &self.services[i])
    }
}

fn validate_service(
    idx: ServiceIdx,
    draft: ServiceDraft,
    stations: &Stations,
    unit_capacity: PassengerCount,
) -> Result<Service, MalformedTimetable> {
    if draft.stops.len() != 2 {
        return Err(MalformedTimetable::WrongStopCount {
            service: draft.id,
            count: draft.stops.len(),
        });
    }

    let mut stops = Vec::with_capacity(2);
    for (station_name, time) in draft.stops.iter() {
        let station =
            stations
                .get(station_name)
                .ok_or_else(|| MalformedTimetable::UnknownStation {
                    service: draft.id.clone(),
                    station: station_name.clone(),
                })?;
        if *time < 0 {
            return Err(MalformedTimetable::NegativeTime {
                service: draft.id.clone(),
                time: *time,
            });
        }
        let time = Time::try_from(*time).map_err(|_| {
            MalformedTimetable::InvalidDocument(format!(
                "time {} of service '{}' is out of range",
                time, draft.id
            ))
        })?;
        stops.push(Stop::new(station, time));
    }
    let (departure, arrival) = (stops[0], stops[1]);
    if arrival.time() <= departure.time() {
        return Err(MalformedTimetable::ArrivalNotAfterDeparture {
            service: draft.id,
            departure: departure.time() as i64,
            arrival: arrival.time() as i64,
        });
    }

    let demand = match draft.demand.first() {
        None => return Err(MalformedTimetable::MissingDemand { service: draft.id }),
        Some(&d) if d < 0 => {
            return Err(MalformedTimetable::NegativeDemand {
                service: draft.id,
                demand: d,
            })
        }
        Some(&d) => PassengerCount::try_from(d).map_err(|_| {
            MalformedTimetable::InvalidDocument(format!(
                "demand {} of service '{}' is out of range",
                d, draft.id
            ))
        })?,
    };

    Ok(Service::new(
        idx,
        draft.id,
        departure,
        arrival,
        demand,
        unit_capacity,
    ))
}
