//! Auto Compass - Car Preference Wizard Controller
//!
//! This crate implements the client-side selection and synchronization layer
//! of a sequential car preference wizard: per-step selections, the gate on
//! the continue control, acknowledged saves to a remote store, and favorites
//! over the scored recommendation list.

pub mod adapters;
pub mod application;
pub mod config;
pub mod context;
pub mod domain;
pub mod ports;
pub mod telemetry;
