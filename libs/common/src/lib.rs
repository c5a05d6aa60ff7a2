//! Common library for the Menú del Día services
//!
//! This crate provides shared functionality used by the auth and API
//! services: database connectivity and migrations, database error
//! classification, JWT handling, layered configuration, tracing setup and
//! graceful shutdown.

pub mod database;
pub mod error;
pub mod jwt;
pub mod settings;
pub mod shutdown;
pub mod telemetry;
