//! Background tasks that back the runtime orchestration.
//!
//! The tick worker periodically runs the bulk effect tick. Stopping it aborts
//! the task; no timer state survives a restart.

mod ticker;

pub use ticker::TickWorker;
