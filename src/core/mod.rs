//! Core simulation types: bodies, scheduled events, and the driver.

pub mod body;
pub mod event;
pub mod sim;

pub use body::Body;
pub use event::{Event, EventKind};
pub use sim::{SimConfig, Simulation};
