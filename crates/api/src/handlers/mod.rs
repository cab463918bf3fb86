//! Request handlers.
//!
//! Handlers delegate to the [`beans_core::catalog::BeanCatalog`] held in
//! application state and map errors via [`crate::error::AppError`].

pub mod bean;
