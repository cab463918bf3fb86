//! Query functions grouped per table.

pub mod bean_repo;

pub use bean_repo::BeanRepo;
