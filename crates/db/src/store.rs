//! [`BeanStore`] backed by PostgreSQL.

use async_trait::async_trait;
use beans_core::bean::{Bean, BeanSearch};
use beans_core::error::{CoreError, CoreResult};
use beans_core::store::BeanStore;
use beans_core::types::WinnerDate;

use crate::error::classify;
use crate::repositories::BeanRepo;
use crate::DbPool;

#[derive(Clone)]
pub struct PgBeanStore {
    pool: DbPool,
}

impl PgBeanStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BeanStore for PgBeanStore {
    async fn get_by_id(&self, id: &str) -> CoreResult<Option<Bean>> {
        let row = BeanRepo::find_by_id(&self.pool, id).await.map_err(classify)?;
        Ok(row.map(Bean::from))
    }

    async fn get_all(&self) -> CoreResult<Vec<Bean>> {
        let rows = BeanRepo::list(&self.pool).await.map_err(classify)?;
        Ok(rows.into_iter().map(Bean::from).collect())
    }

    async fn search(&self, filter: &BeanSearch) -> CoreResult<Vec<Bean>> {
        let rows = BeanRepo::search(&self.pool, filter)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(Bean::from).collect())
    }

    async fn insert(&self, bean: &Bean) -> CoreResult<Bean> {
        let row = BeanRepo::create(&self.pool, bean)
            .await
            .map_err(|e| match classify(e) {
                CoreError::Conflict(_) => CoreError::duplicate_ids(&[&bean.id]),
                other => other,
            })?;
        Ok(row.into())
    }

    async fn insert_many(&self, beans: &[Bean]) -> CoreResult<Vec<Bean>> {
        let rows = BeanRepo::create_many(&self.pool, beans)
            .await
            .map_err(classify)?;
        tracing::debug!(count = rows.len(), "Inserted bean batch");
        Ok(rows.into_iter().map(Bean::from).collect())
    }

    async fn insert_replacing_botd(&self, beans: &[Bean]) -> CoreResult<Vec<Bean>> {
        let rows = BeanRepo::create_replacing_botd(&self.pool, beans)
            .await
            .map_err(classify)?;
        tracing::debug!(count = rows.len(), "Inserted beans replacing bean of the day");
        Ok(rows.into_iter().map(Bean::from).collect())
    }

    async fn update(&self, bean: &Bean) -> CoreResult<Bean> {
        BeanRepo::update(&self.pool, bean)
            .await
            .map_err(classify)?
            .map(Bean::from)
            .ok_or_else(|| CoreError::bean_not_found(&bean.id))
    }

    async fn delete(&self, id: &str) -> CoreResult<bool> {
        BeanRepo::delete(&self.pool, id).await.map_err(classify)
    }

    async fn get_current_botd(&self) -> CoreResult<Option<Bean>> {
        let row = BeanRepo::find_botd(&self.pool).await.map_err(classify)?;
        Ok(row.map(Bean::from))
    }

    async fn clear_all_botd(&self) -> CoreResult<()> {
        let cleared = BeanRepo::clear_botd(&self.pool).await.map_err(classify)?;
        tracing::debug!(cleared, "Cleared bean of the day flag");
        Ok(())
    }

    async fn set_botd(&self, id: &str, date: WinnerDate) -> CoreResult<()> {
        if BeanRepo::set_botd(&self.pool, id, date)
            .await
            .map_err(classify)?
        {
            Ok(())
        } else {
            Err(CoreError::bean_not_found(id))
        }
    }

    async fn replace_botd(&self, id: &str, date: WinnerDate) -> CoreResult<()> {
        if BeanRepo::replace_botd(&self.pool, id, date)
            .await
            .map_err(classify)?
        {
            Ok(())
        } else {
            Err(CoreError::bean_not_found(id))
        }
    }

    async fn health_check(&self) -> CoreResult<()> {
        crate::health_check(&self.pool).await.map_err(classify)
    }
}
