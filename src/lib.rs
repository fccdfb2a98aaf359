//! disksim: an event-driven simulator of elastic disk collisions in the
//! unit square.
//!
//! Instead of stepping time on a fixed grid, the simulation keeps a
//! min-priority schedule of predicted collisions and advances straight to
//! the next one. Bodies move ballistically between events; predictions made
//! obsolete by an intervening collision are filtered lazily when popped.
//!
//! ```no_run
//! use disksim::{NullCanvas, SimConfig, Simulation};
//!
//! let config = SimConfig {
//!     count: 20,
//!     seed: Some(42),
//!     ..SimConfig::default()
//! };
//! let mut sim = Simulation::new(&config)?;
//! sim.run_until(10.0, &mut NullCanvas)?;
//! # Ok::<(), disksim::Error>(())
//! ```

pub mod core;
pub mod draw;
pub mod error;

pub use crate::core::{Body, Event, EventKind, SimConfig, Simulation};
pub use crate::draw::{Canvas, NullCanvas};
pub use crate::error::{Error, Result};
