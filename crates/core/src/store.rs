//! Storage capability for bean records.
//!
//! The catalog talks to persistence only through [`BeanStore`]. Any engine
//! (PostgreSQL, in-memory for tests) implements it.

use async_trait::async_trait;

use crate::bean::{Bean, BeanSearch};
use crate::error::CoreResult;
use crate::types::WinnerDate;

/// Durable table of bean records keyed by their caller-assigned id, plus the
/// per-record bean-of-the-day state.
#[async_trait]
pub trait BeanStore: Send + Sync {
    /// Point lookup by id.
    async fn get_by_id(&self, id: &str) -> CoreResult<Option<Bean>>;

    /// Every record, ordered by `index` then `id`.
    async fn get_all(&self) -> CoreResult<Vec<Bean>>;

    /// Case-insensitive substring search; see [`BeanSearch`].
    async fn search(&self, filter: &BeanSearch) -> CoreResult<Vec<Bean>>;

    /// Insert a new record. An existing id yields `CoreError::Conflict`.
    async fn insert(&self, bean: &Bean) -> CoreResult<Bean>;

    /// Insert a batch of records.
    ///
    /// Engines that can do so should insert the batch atomically.
    async fn insert_many(&self, beans: &[Bean]) -> CoreResult<Vec<Bean>> {
        let mut inserted = Vec::with_capacity(beans.len());
        for bean in beans {
            inserted.push(self.insert(bean).await?);
        }
        Ok(inserted)
    }

    /// Clear the current holder and insert `beans` as one unit.
    ///
    /// Used when a new record arrives already flagged as bean of the day. On
    /// any error, including an id collision, the previous holder keeps the
    /// flag and nothing is inserted.
    async fn insert_replacing_botd(&self, beans: &[Bean]) -> CoreResult<Vec<Bean>>;

    /// Overwrite the catalog fields of an existing record.
    ///
    /// Bean-of-the-day state is not written. A missing id yields
    /// `CoreError::NotFound`.
    async fn update(&self, bean: &Bean) -> CoreResult<Bean>;

    /// Delete a record, returning whether a row was removed.
    async fn delete(&self, id: &str) -> CoreResult<bool>;

    /// The record currently flagged as bean of the day, if any.
    async fn get_current_botd(&self) -> CoreResult<Option<Bean>>;

    /// Clear the flag on whichever record holds it. Idempotent.
    async fn clear_all_botd(&self) -> CoreResult<()>;

    /// Flag `id` as bean of the day and stamp its winner date.
    async fn set_botd(&self, id: &str, date: WinnerDate) -> CoreResult<()>;

    /// Clear the current holder, then flag `id`.
    ///
    /// Engines with transactions should override this so both steps commit
    /// together.
    async fn replace_botd(&self, id: &str, date: WinnerDate) -> CoreResult<()> {
        self.clear_all_botd().await?;
        self.set_botd(id, date).await
    }

    /// Reachability check used by the health endpoint.
    async fn health_check(&self) -> CoreResult<()> {
        Ok(())
    }
}
