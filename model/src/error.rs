use thiserror::Error;

/// Rejected timetable input. Raised while loading or while building the event network, always
/// before any solve is attempted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedTimetable {
    #[error("invalid instance document: {0}")]
    InvalidDocument(String),

    #[error("station '{0}' is declared more than once")]
    DuplicateStation(String),

    #[error("service '{service}' references unknown station '{station}'")]
    UnknownStation { service: String, station: String },

    #[error("service '{service}' has {count} stops, expected exactly 2")]
    WrongStopCount { service: String, count: usize },

    #[error("service '{0}' is declared more than once")]
    DuplicateService(String),

    #[error("service '{service}' has negative time {time}")]
    NegativeTime { service: String, time: i64 },

    #[error("service '{service}' has negative demand {demand}")]
    NegativeDemand { service: String, demand: i64 },

    #[error("service '{service}' has an empty demand list")]
    MissingDemand { service: String },

    #[error("service '{service}' arrives at {arrival} which is not after its departure {departure}")]
    ArrivalNotAfterDeparture {
        service: String,
        departure: i64,
        arrival: i64,
    },

    #[error("rolling stock capacity must be positive")]
    ZeroUnitCapacity,

    #[error("station '{0}' has no overnight cost")]
    MissingOvernightCost(String),

    #[error("overnight cost for station '{station}' must be finite and non-negative, got {cost}")]
    InvalidOvernightCost { station: String, cost: f64 },

    #[error("overnight cost {cost} for station '{station}' cannot be represented with cost scale {cost_scale}")]
    OvernightCostOutOfRange {
        station: String,
        cost: f64,
        cost_scale: i64,
    },

    #[error("parameter refers to unknown station '{0}'")]
    UnknownParameterStation(String),

    #[error("cost scale must be positive, got {0}")]
    InvalidCostScale(i64),
}
