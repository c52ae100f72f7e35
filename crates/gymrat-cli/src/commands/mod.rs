pub mod config;
pub mod routine;
pub mod timer;
pub mod workout;
