//! Core library for the `clima` weather viewer.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - The Tomorrow.io realtime-weather client
//! - The observable three-state load machine (loading / loaded / failed)
//! - Condition-code lookup tables
//!
//! It is used by `clima-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod condition;
pub mod config;
pub mod model;
pub mod state;

pub use client::{FetchError, TomorrowClient, WeatherClient};
pub use config::Config;
pub use model::{Coordinates, RequestKey, WeatherReading};
pub use state::{LoadState, WeatherLoader};
