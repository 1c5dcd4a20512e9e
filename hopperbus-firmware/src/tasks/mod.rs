//! Embassy async tasks
//!
//! Each task runs independently and shares state through `channels`.

pub mod bus;
pub mod hopper;

pub use bus::bus_task;
pub use hopper::hopper_task;
