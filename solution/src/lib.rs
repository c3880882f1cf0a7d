pub mod circulation;
pub mod error;
pub mod fleet_report;
pub mod json_serialisation;
pub mod test_utilities;

pub use circulation::Circulation;
pub use fleet_report::FleetReport;
