pub mod base_types;
pub mod config;
pub mod error;
pub mod json_serialisation;
pub mod network;
pub mod stations;
pub mod timetable;
