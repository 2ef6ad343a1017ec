//! Background services

pub mod presence_sweeper;

pub use presence_sweeper::{start_presence_sweeper, sweep_once};
