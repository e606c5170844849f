//! Core types and service wiring for the mesero ordering flow.

/// Daily specials and menu board images.
pub mod board;
/// Customer details remembered between orders.
pub mod cache;
/// Cart lines and editing operations.
pub mod cart;
/// Loaded menu and browsing filters.
pub mod catalog;
/// Step-by-step checkout state machine.
pub mod checkout;
/// Restaurant configuration and defaults.
pub mod config;
/// Domain models shared by all crates.
pub mod model;
/// WhatsApp order message formatting and parsing.
pub mod order;
/// Bundle of a menu backend and its fallback catalog.
pub mod plugin;
/// Traits describing the menu backend.
pub mod ports;
/// Line prices, delivery zones, and totals.
pub mod pricing;
/// Opening hours and service availability.
pub mod schedule;
/// High-level service facade used by clients.
pub mod service;

pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use service::*;
