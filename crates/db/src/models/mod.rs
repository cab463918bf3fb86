//! Row types for database tables.

pub mod bean;
