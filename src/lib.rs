//! Pagekeeper - Personal Reading Tracker Core
//!
//! This crate implements the reading-session lifecycle, pause-time
//! accounting, book page-progress reconciliation, and periodic reading
//! goals. Transport, authentication, and persistence belong to the
//! hosting service and reach the core through the `ports` contracts.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
