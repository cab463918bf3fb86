//! Bean catalog domain crate.
//!
//! Holds the bean model, the error taxonomy, the [`store::BeanStore`]
//! capability trait and the [`catalog::BeanCatalog`] service that implements
//! bean-of-the-day selection. Nothing in here performs I/O directly; storage
//! engines live behind the store trait.

pub mod bean;
pub mod catalog;
pub mod error;
pub mod in_memory;
pub mod store;
pub mod types;
