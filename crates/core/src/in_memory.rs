//! In-process [`BeanStore`] backed by an ordered map.
//!
//! Used by tests and as the fallback backend when no database is configured.
//! Every operation takes the map lock once, so multi-step operations
//! (`insert_many`, `insert_replacing_botd`, `replace_botd`) are atomic with
//! respect to each other.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::bean::{Bean, BeanSearch};
use crate::error::{CoreError, CoreResult};
use crate::store::BeanStore;
use crate::types::{BeanId, WinnerDate};

#[derive(Debug, Default)]
pub struct InMemoryBeanStore {
    beans: RwLock<BTreeMap<BeanId, Bean>>,
}

impl InMemoryBeanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store. Later duplicates of an id replace earlier ones.
    pub fn with_beans(beans: impl IntoIterator<Item = Bean>) -> Self {
        let map = beans.into_iter().map(|b| (b.id.clone(), b)).collect();
        Self {
            beans: RwLock::new(map),
        }
    }
}

/// Reject `batch` if any id repeats within it or is already stored.
fn ensure_ids_free(stored: &BTreeMap<BeanId, Bean>, batch: &[Bean]) -> CoreResult<()> {
    let mut seen = BTreeSet::new();
    let duplicates: BTreeSet<&str> = batch
        .iter()
        .map(|b| b.id.as_str())
        .filter(|id| stored.contains_key(*id) || !seen.insert(*id))
        .collect();
    if duplicates.is_empty() {
        return Ok(());
    }
    let ids: Vec<&str> = duplicates.into_iter().collect();
    Err(CoreError::duplicate_ids(&ids))
}

fn ordered<'a>(beans: impl Iterator<Item = &'a Bean>) -> Vec<Bean> {
    let mut out: Vec<Bean> = beans.cloned().collect();
    out.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.id.cmp(&b.id)));
    out
}

#[async_trait]
impl BeanStore for InMemoryBeanStore {
    async fn get_by_id(&self, id: &str) -> CoreResult<Option<Bean>> {
        Ok(self.beans.read().await.get(id).cloned())
    }

    async fn get_all(&self) -> CoreResult<Vec<Bean>> {
        Ok(ordered(self.beans.read().await.values()))
    }

    async fn search(&self, filter: &BeanSearch) -> CoreResult<Vec<Bean>> {
        let beans = self.beans.read().await;
        Ok(ordered(beans.values().filter(|b| filter.matches(b))))
    }

    async fn insert(&self, bean: &Bean) -> CoreResult<Bean> {
        let mut beans = self.beans.write().await;
        if beans.contains_key(&bean.id) {
            return Err(CoreError::duplicate_ids(&[&bean.id]));
        }
        beans.insert(bean.id.clone(), bean.clone());
        Ok(bean.clone())
    }

    async fn insert_many(&self, batch: &[Bean]) -> CoreResult<Vec<Bean>> {
        let mut beans = self.beans.write().await;
        ensure_ids_free(&beans, batch)?;

        for bean in batch {
            beans.insert(bean.id.clone(), bean.clone());
        }
        Ok(batch.to_vec())
    }

    async fn insert_replacing_botd(&self, batch: &[Bean]) -> CoreResult<Vec<Bean>> {
        let mut beans = self.beans.write().await;
        ensure_ids_free(&beans, batch)?;

        for bean in beans.values_mut() {
            bean.is_botd = false;
        }
        for bean in batch {
            beans.insert(bean.id.clone(), bean.clone());
        }
        Ok(batch.to_vec())
    }

    async fn update(&self, bean: &Bean) -> CoreResult<Bean> {
        let mut beans = self.beans.write().await;
        let stored = beans
            .get_mut(&bean.id)
            .ok_or_else(|| CoreError::bean_not_found(&bean.id))?;
        stored.copy_catalog_fields_from(bean);
        Ok(stored.clone())
    }

    async fn delete(&self, id: &str) -> CoreResult<bool> {
        Ok(self.beans.write().await.remove(id).is_some())
    }

    async fn get_current_botd(&self) -> CoreResult<Option<Bean>> {
        Ok(self.beans.read().await.values().find(|b| b.is_botd).cloned())
    }

    async fn clear_all_botd(&self) -> CoreResult<()> {
        for bean in self.beans.write().await.values_mut() {
            bean.is_botd = false;
        }
        Ok(())
    }

    async fn set_botd(&self, id: &str, date: WinnerDate) -> CoreResult<()> {
        let mut beans = self.beans.write().await;
        let bean = beans
            .get_mut(id)
            .ok_or_else(|| CoreError::bean_not_found(id))?;
        bean.is_botd = true;
        bean.previous_winner_date = Some(date);
        Ok(())
    }

    async fn replace_botd(&self, id: &str, date: WinnerDate) -> CoreResult<()> {
        let mut beans = self.beans.write().await;
        if !beans.contains_key(id) {
            return Err(CoreError::bean_not_found(id));
        }
        for bean in beans.values_mut() {
            bean.is_botd = bean.id == id;
            if bean.is_botd {
                bean.previous_winner_date = Some(date);
            }
        }
        Ok(())
    }
}
