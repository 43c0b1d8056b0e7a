//! # MediQueue Core
//!
//! Domain types and pure logic for the MediQueue appointment service: the
//! slot generator, time-label formatting, appointment filtering, and the
//! fixtures served in demo mode. Nothing in this crate performs I/O.

pub mod demo;
pub mod errors;
pub mod mode;
pub mod models;
pub mod slots;
pub mod time_label;
