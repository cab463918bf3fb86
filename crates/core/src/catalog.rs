//! Bean catalog service.
//!
//! Sits between the transport layer and a [`BeanStore`]. Owns no persistent
//! state itself; it validates input, enforces id uniqueness before writes and
//! runs bean-of-the-day (BOTD) selection.
//!
//! All BOTD writes (selection and creating a bean pre-flagged as BOTD) happen
//! while holding the `selector` mutex, so concurrent callers observe a
//! serialized sequence of BOTD changes.

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use validator::Validate;

use crate::bean::{Bean, BeanSearch, CreateBean, UpdateBean};
use crate::error::{CoreError, CoreResult};
use crate::store::BeanStore;
use crate::types::{today_utc, WinnerDate};

pub struct BeanCatalog<R = StdRng> {
    store: Arc<dyn BeanStore>,
    /// Randomness source for selection. The mutex doubles as the BOTD
    /// critical section.
    selector: Mutex<R>,
    clock: fn() -> WinnerDate,
}

impl BeanCatalog<StdRng> {
    /// Catalog with an OS-seeded random source.
    pub fn new(store: Arc<dyn BeanStore>) -> Self {
        Self::with_rng(store, StdRng::from_os_rng())
    }

    /// Catalog whose selection sequence is reproducible from `seed`.
    pub fn seeded(store: Arc<dyn BeanStore>, seed: u64) -> Self {
        Self::with_rng(store, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> BeanCatalog<R> {
    pub fn with_rng(store: Arc<dyn BeanStore>, rng: R) -> Self {
        Self {
            store,
            selector: Mutex::new(rng),
            clock: today_utc,
        }
    }

    /// Replace the date source used to stamp winners.
    pub fn with_clock(mut self, clock: fn() -> WinnerDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Arc<dyn BeanStore> {
        &self.store
    }

    pub async fn get_all(&self) -> CoreResult<Vec<Bean>> {
        self.store.get_all().await
    }

    pub async fn get_by_id(&self, id: &str) -> CoreResult<Bean> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::bean_not_found(id))
    }

    pub async fn search(&self, filter: BeanSearch) -> CoreResult<Vec<Bean>> {
        let filter = filter.normalized();
        if filter.is_unconstrained() {
            return self.store.get_all().await;
        }
        self.store.search(&filter).await
    }

    /// Create a bean. Fails with `Conflict` when the id is taken.
    pub async fn add(&self, input: CreateBean) -> CoreResult<Bean> {
        input.validate()?;
        let bean = Bean::from(input);

        let created = if bean.is_botd {
            let _botd = self.selector.lock().await;
            self.ensure_ids_free(&[bean.id.as_str()]).await?;
            let mut created = self
                .store
                .insert_replacing_botd(std::slice::from_ref(&bean))
                .await?;
            created.pop().unwrap_or(bean)
        } else {
            self.ensure_ids_free(&[bean.id.as_str()]).await?;
            self.store.insert(&bean).await?
        };

        tracing::info!(bean_id = %created.id, is_botd = created.is_botd, "Bean added");
        Ok(created)
    }

    /// Create a batch of beans.
    ///
    /// Every id collision, whether within the batch or against stored
    /// records, is reported in a single `Conflict` before anything is
    /// written.
    pub async fn add_many(&self, inputs: Vec<CreateBean>) -> CoreResult<Vec<Bean>> {
        if inputs.is_empty() {
            return Err(CoreError::Validation(
                "At least one bean is required".into(),
            ));
        }
        for (position, input) in inputs.iter().enumerate() {
            input
                .validate()
                .map_err(|e| CoreError::Validation(format!("beans[{position}]: {e}")))?;
        }

        let beans: Vec<Bean> = inputs.into_iter().map(Bean::from).collect();

        let flagged = beans.iter().filter(|b| b.is_botd).count();
        if flagged > 1 {
            return Err(CoreError::Validation(format!(
                "At most one bean may be flagged as bean of the day, got {flagged}"
            )));
        }

        let ids: Vec<&str> = beans.iter().map(|b| b.id.as_str()).collect();
        let created = if flagged == 1 {
            let _botd = self.selector.lock().await;
            self.ensure_ids_free(&ids).await?;
            self.store.insert_replacing_botd(&beans).await?
        } else {
            self.ensure_ids_free(&ids).await?;
            self.store.insert_many(&beans).await?
        };

        tracing::info!(count = created.len(), "Bean batch added");
        Ok(created)
    }

    /// Fail with one `Conflict` naming every id that repeats within `ids` or
    /// is already stored.
    async fn ensure_ids_free(&self, ids: &[&str]) -> CoreResult<()> {
        let mut seen = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for id in ids {
            if !seen.insert(*id) {
                duplicates.insert(*id);
            }
        }
        for id in &seen {
            if self.store.get_by_id(id).await?.is_some() {
                duplicates.insert(*id);
            }
        }
        if duplicates.is_empty() {
            return Ok(());
        }
        let ids: Vec<&str> = duplicates.into_iter().collect();
        tracing::warn!(?ids, "Rejected beans with duplicate ids");
        Err(CoreError::duplicate_ids(&ids))
    }

    /// Merge `patch` over the stored bean and persist the result.
    pub async fn update(&self, id: &str, patch: UpdateBean) -> CoreResult<Bean> {
        patch.validate()?;
        let mut bean = self.get_by_id(id).await?;
        if patch.is_empty() {
            return Ok(bean);
        }

        patch.apply_to(&mut bean);
        let updated = self.store.update(&bean).await?;
        tracing::debug!(bean_id = %updated.id, "Bean updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> CoreResult<bool> {
        self.get_by_id(id).await?;
        if !self.store.delete(id).await? {
            // Removed by someone else between the lookup and the delete.
            return Err(CoreError::bean_not_found(id));
        }
        tracing::info!(bean_id = %id, "Bean deleted");
        Ok(true)
    }

    pub async fn current_bean_of_the_day(&self) -> CoreResult<Option<Bean>> {
        self.store.get_current_botd().await
    }

    /// Pick a new bean of the day uniformly at random, never re-picking the
    /// current holder.
    ///
    /// Fails with `NoEligibleWinner` (and writes nothing) when no bean other
    /// than the current holder exists.
    pub async fn pick_bean_of_the_day(&self) -> CoreResult<Bean> {
        let mut rng = self.selector.lock().await;

        let beans = self.store.get_all().await?;
        let current = self.store.get_current_botd().await?;
        let current_id = current.as_ref().map(|b| b.id.as_str());

        let mut eligible: Vec<Bean> = beans
            .into_iter()
            .filter(|b| Some(b.id.as_str()) != current_id)
            .collect();

        if eligible.is_empty() {
            let reason = match current_id {
                Some(id) => format!("only the current bean of the day ({id}) is available"),
                None => "the catalog is empty".to_string(),
            };
            tracing::warn!(%reason, "Bean of the day selection has no candidates");
            return Err(CoreError::NoEligibleWinner(reason));
        }

        let pick = rng.random_range(0..eligible.len());
        let mut winner = eligible.swap_remove(pick);
        let today = (self.clock)();

        self.store.replace_botd(&winner.id, today).await?;

        winner.is_botd = true;
        winner.previous_winner_date = Some(today);

        tracing::info!(
            bean_id = %winner.id,
            previous = ?current_id,
            candidates = eligible.len() + 1,
            %today,
            "Bean of the day selected"
        );
        Ok(winner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use super::*;
    use crate::in_memory::InMemoryBeanStore;

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn bean(id: &str, name: &str, is_botd: bool) -> Bean {
        Bean {
            id: id.to_string(),
            index: 0,
            is_botd,
            cost: Decimal::new(250, 2),
            image: None,
            colour: None,
            name: name.to_string(),
            description: None,
            country: None,
            previous_winner_date: None,
        }
    }

    fn create(id: &str, name: &str) -> CreateBean {
        CreateBean {
            id: id.to_string(),
            index: 0,
            is_botd: false,
            cost: Decimal::new(275, 2),
            image: None,
            colour: Some("Black".into()),
            name: name.to_string(),
            description: Some("Strong coffee".into()),
            country: Some("USA".into()),
        }
    }

    fn fixed_day() -> WinnerDate {
        WinnerDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn catalog_with(beans: Vec<Bean>) -> (Arc<InMemoryBeanStore>, BeanCatalog) {
        let store = Arc::new(InMemoryBeanStore::with_beans(beans));
        let catalog = BeanCatalog::seeded(store.clone(), 42).with_clock(fixed_day);
        (store, catalog)
    }

    async fn botd_holders(store: &InMemoryBeanStore) -> Vec<String> {
        store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .filter(|b| b.is_botd)
            .map(|b| b.id)
            .collect()
    }

    /// Wraps the in-memory store and counts BOTD writes.
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryBeanStore,
        botd_writes: AtomicUsize,
    }

    #[async_trait]
    impl BeanStore for CountingStore {
        async fn get_by_id(&self, id: &str) -> CoreResult<Option<Bean>> {
            self.inner.get_by_id(id).await
        }
        async fn get_all(&self) -> CoreResult<Vec<Bean>> {
            self.inner.get_all().await
        }
        async fn search(&self, filter: &BeanSearch) -> CoreResult<Vec<Bean>> {
            self.inner.search(filter).await
        }
        async fn insert(&self, bean: &Bean) -> CoreResult<Bean> {
            self.inner.insert(bean).await
        }
        async fn insert_replacing_botd(&self, beans: &[Bean]) -> CoreResult<Vec<Bean>> {
            self.botd_writes.fetch_add(1, Ordering::SeqCst);
            self.inner.insert_replacing_botd(beans).await
        }
        async fn update(&self, bean: &Bean) -> CoreResult<Bean> {
            self.inner.update(bean).await
        }
        async fn delete(&self, id: &str) -> CoreResult<bool> {
            self.inner.delete(id).await
        }
        async fn get_current_botd(&self) -> CoreResult<Option<Bean>> {
            self.inner.get_current_botd().await
        }
        async fn clear_all_botd(&self) -> CoreResult<()> {
            self.botd_writes.fetch_add(1, Ordering::SeqCst);
            self.inner.clear_all_botd().await
        }
        async fn set_botd(&self, id: &str, date: WinnerDate) -> CoreResult<()> {
            self.botd_writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set_botd(id, date).await
        }
    }

    /// Wraps the in-memory store; every insert fails as if the disk were full.
    struct FullDiskStore {
        inner: InMemoryBeanStore,
    }

    fn disk_full() -> CoreError {
        CoreError::Store("disk full".into())
    }

    #[async_trait]
    impl BeanStore for FullDiskStore {
        async fn get_by_id(&self, id: &str) -> CoreResult<Option<Bean>> {
            self.inner.get_by_id(id).await
        }
        async fn get_all(&self) -> CoreResult<Vec<Bean>> {
            self.inner.get_all().await
        }
        async fn search(&self, filter: &BeanSearch) -> CoreResult<Vec<Bean>> {
            self.inner.search(filter).await
        }
        async fn insert(&self, _bean: &Bean) -> CoreResult<Bean> {
            Err(disk_full())
        }
        async fn insert_many(&self, _beans: &[Bean]) -> CoreResult<Vec<Bean>> {
            Err(disk_full())
        }
        async fn insert_replacing_botd(&self, _beans: &[Bean]) -> CoreResult<Vec<Bean>> {
            Err(disk_full())
        }
        async fn update(&self, bean: &Bean) -> CoreResult<Bean> {
            self.inner.update(bean).await
        }
        async fn delete(&self, id: &str) -> CoreResult<bool> {
            self.inner.delete(id).await
        }
        async fn get_current_botd(&self) -> CoreResult<Option<Bean>> {
            self.inner.get_current_botd().await
        }
        async fn clear_all_botd(&self) -> CoreResult<()> {
            self.inner.clear_all_botd().await
        }
        async fn set_botd(&self, id: &str, date: WinnerDate) -> CoreResult<()> {
            self.inner.set_botd(id, date).await
        }
    }

    fn flagged(id: &str, name: &str) -> CreateBean {
        let mut input = create(id, name);
        input.is_botd = true;
        input
    }

    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn get_all_on_empty_store_is_empty() {
        let (_, catalog) = catalog_with(vec![]);
        assert!(catalog.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn added_bean_round_trips_through_get_by_id() {
        let (_, catalog) = catalog_with(vec![]);
        let added = catalog.add(create("125", "Americano")).await.unwrap();
        let fetched = catalog.get_by_id("125").await.unwrap();
        assert_eq!(added, fetched);
        assert_eq!(fetched.name, "Americano");
        assert!(!fetched.is_botd);
    }

    #[tokio::test]
    async fn add_with_existing_id_conflicts_without_mutation() {
        let (store, catalog) = catalog_with(vec![bean("1", "Espresso", false)]);
        let err = catalog.add(create("1", "Imposter")).await.unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
        assert_eq!(store.get_by_id("1").await.unwrap().unwrap().name, "Espresso");
    }

    #[tokio::test]
    async fn add_rejects_blank_name() {
        let (_, catalog) = catalog_with(vec![]);
        let err = catalog.add(create("1", "  ")).await.unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[tokio::test]
    async fn add_flagged_bean_takes_over_botd() {
        let (store, catalog) = catalog_with(vec![bean("old", "Espresso", true)]);
        let mut input = create("new", "Latte");
        input.is_botd = true;

        let added = catalog.add(input).await.unwrap();
        assert!(added.is_botd);
        assert_eq!(botd_holders(&store).await, ["new"]);
    }

    #[tokio::test]
    async fn failed_flagged_add_keeps_current_holder() {
        let store = Arc::new(FullDiskStore {
            inner: InMemoryBeanStore::with_beans([bean("A", "Espresso", true)]),
        });
        let catalog = BeanCatalog::seeded(store.clone(), 1);

        let err = catalog.add(flagged("new", "Latte")).await.unwrap_err();
        assert_matches!(err, CoreError::Store(_));
        assert_eq!(botd_holders(&store.inner).await, ["A"]);

        let err = catalog
            .add_many(vec![create("x", "Mocha"), flagged("y", "Latte")])
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Store(_));
        assert_eq!(botd_holders(&store.inner).await, ["A"]);
        assert_eq!(store.inner.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn conflicting_flagged_add_keeps_current_holder() {
        let (store, catalog) =
            catalog_with(vec![bean("A", "Espresso", true), bean("B", "Latte", false)]);

        let err = catalog.add(flagged("B", "Imposter")).await.unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
        assert_eq!(botd_holders(&store).await, ["A"]);

        let err = catalog
            .add_many(vec![flagged("C", "Mocha"), create("B", "Imposter")])
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Conflict(msg) if msg.contains('B'));
        assert_eq!(botd_holders(&store).await, ["A"]);
        assert!(store.get_by_id("C").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn add_many_inserts_every_bean() {
        let (store, catalog) = catalog_with(vec![]);
        let added = catalog
            .add_many(vec![create("1", "Espresso"), create("2", "Latte")])
            .await
            .unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(store.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn add_many_with_duplicate_ids_in_batch_persists_nothing() {
        let (store, catalog) = catalog_with(vec![]);
        let err = catalog
            .add_many(vec![create("1", "Espresso"), create("1", "Latte")])
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Conflict(msg) if msg.contains('1'));
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_many_reports_all_colliding_ids_together() {
        let (store, catalog) =
            catalog_with(vec![bean("a", "Espresso", false), bean("b", "Mocha", false)]);
        let err = catalog
            .add_many(vec![create("a", "X"), create("c", "Y"), create("b", "Z")])
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Conflict(msg) if msg.contains("a, b"));
        assert!(store.get_by_id("c").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn add_many_rejects_empty_batch() {
        let (_, catalog) = catalog_with(vec![]);
        assert_matches!(
            catalog.add_many(vec![]).await,
            Err(CoreError::Validation(_))
        );
    }

    #[tokio::test]
    async fn add_many_rejects_two_flagged_beans() {
        let (store, catalog) = catalog_with(vec![]);
        let mut first = create("1", "Espresso");
        first.is_botd = true;
        let mut second = create("2", "Latte");
        second.is_botd = true;
        assert_matches!(
            catalog.add_many(vec![first, second]).await,
            Err(CoreError::Validation(_))
        );
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_merges_present_fields() {
        let (_, catalog) = catalog_with(vec![bean("123", "Espresso", false)]);
        let updated = catalog
            .update(
                "123",
                UpdateBean {
                    name: Some("Cappuccino".into()),
                    cost: Some(Decimal::new(300, 2)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Cappuccino");
        assert_eq!(updated.cost, Decimal::new(300, 2));
        assert_eq!(catalog.get_by_id("123").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_with_empty_patch_is_a_no_op() {
        let (_, catalog) = catalog_with(vec![bean("123", "Espresso", false)]);
        let before = catalog.get_by_id("123").await.unwrap();
        let after = catalog.update("123", UpdateBean::default()).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn update_missing_bean_is_not_found() {
        let (store, catalog) = catalog_with(vec![]);
        let err = catalog
            .update(
                "123",
                UpdateBean {
                    name: Some("Cappuccino".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::NotFound { entity: "Bean", ref id } if id == "123");
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_bean() {
        let (_, catalog) = catalog_with(vec![bean("123", "Espresso", false)]);
        assert!(catalog.delete("123").await.unwrap());
        assert_matches!(
            catalog.get_by_id("123").await,
            Err(CoreError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn delete_missing_bean_is_not_found() {
        let (store, catalog) = catalog_with(vec![bean("1", "Espresso", false)]);
        assert_matches!(
            catalog.delete("123").await,
            Err(CoreError::NotFound { .. })
        );
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn search_matches_case_insensitive_substring() {
        let (_, catalog) =
            catalog_with(vec![bean("1", "Espresso", false), bean("2", "Latte", false)]);
        let found = catalog
            .search(BeanSearch {
                name: Some("Esp".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Espresso");

        let none = catalog
            .search(BeanSearch {
                country: Some("Peru".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    // -----------------------------------------------------------------------
    // Bean of the day
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn first_pick_flags_exactly_one_bean() {
        let (store, catalog) = catalog_with(vec![
            bean("1", "Espresso", false),
            bean("2", "Latte", false),
            bean("3", "Mocha", false),
        ]);
        let winner = catalog.pick_bean_of_the_day().await.unwrap();
        assert!(winner.is_botd);
        assert_eq!(winner.previous_winner_date, Some(fixed_day()));
        assert_eq!(botd_holders(&store).await, [winner.id.clone()]);
        assert_eq!(catalog.get_by_id(&winner.id).await.unwrap(), winner);
    }

    #[tokio::test]
    async fn current_holder_never_wins_again() {
        let (store, catalog) =
            catalog_with(vec![bean("A", "Espresso", false), bean("B", "Latte", true)]);

        for _ in 0..20 {
            let before = catalog.current_bean_of_the_day().await.unwrap().map(|b| b.id);
            let winner = catalog.pick_bean_of_the_day().await.unwrap();
            assert_ne!(Some(winner.id.clone()), before);
            assert_eq!(botd_holders(&store).await, [winner.id]);
        }
    }

    #[tokio::test]
    async fn sole_holder_yields_no_eligible_winner_without_writes() {
        let store = Arc::new(CountingStore::default());
        store.inner.insert(&bean("B", "Latte", true)).await.unwrap();
        let catalog = BeanCatalog::seeded(store.clone(), 1);

        let err = catalog.pick_bean_of_the_day().await.unwrap_err();
        assert_matches!(err, CoreError::NoEligibleWinner(_));
        assert_eq!(store.botd_writes.load(Ordering::SeqCst), 0);
        assert!(store.inner.get_by_id("B").await.unwrap().unwrap().is_botd);
    }

    #[tokio::test]
    async fn empty_catalog_yields_no_eligible_winner() {
        let (_, catalog) = catalog_with(vec![]);
        assert_matches!(
            catalog.pick_bean_of_the_day().await,
            Err(CoreError::NoEligibleWinner(_))
        );
    }

    #[tokio::test]
    async fn default_replace_clears_before_setting() {
        let store = Arc::new(CountingStore::default());
        store.inner.insert(&bean("A", "Espresso", true)).await.unwrap();
        store.inner.insert(&bean("B", "Latte", false)).await.unwrap();
        let catalog = BeanCatalog::seeded(store.clone(), 3).with_clock(fixed_day);

        let winner = catalog.pick_bean_of_the_day().await.unwrap();
        assert_eq!(winner.id, "B");
        assert_eq!(store.botd_writes.load(Ordering::SeqCst), 2);
        assert_eq!(botd_holders(&store.inner).await, ["B"]);
    }

    #[tokio::test]
    async fn same_seed_gives_same_selection_sequence() {
        let beans: Vec<Bean> = (0..10).map(|i| bean(&i.to_string(), "Bean", false)).collect();
        let (_, first) = catalog_with(beans.clone());
        let (_, second) = catalog_with(beans);

        for _ in 0..5 {
            let a = first.pick_bean_of_the_day().await.unwrap();
            let b = second.pick_bean_of_the_day().await.unwrap();
            assert_eq!(a.id, b.id);
        }
    }

    #[tokio::test]
    async fn concurrent_picks_keep_a_single_holder() {
        let beans: Vec<Bean> = (0..5).map(|i| bean(&i.to_string(), "Bean", false)).collect();
        let store = Arc::new(InMemoryBeanStore::with_beans(beans));
        let catalog = Arc::new(BeanCatalog::seeded(store.clone(), 9));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                tokio::spawn(async move { catalog.pick_bean_of_the_day().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(botd_holders(&store).await.len(), 1);
    }

    #[tokio::test]
    async fn picks_racing_flagged_adds_keep_a_single_holder() {
        let beans: Vec<Bean> = (0..3).map(|i| bean(&i.to_string(), "Bean", false)).collect();
        let store = Arc::new(InMemoryBeanStore::with_beans(beans));
        let catalog = Arc::new(BeanCatalog::seeded(store.clone(), 11));

        let mut handles = Vec::new();
        for i in 0..8 {
            let picker = Arc::clone(&catalog);
            handles.push(tokio::spawn(async move {
                picker.pick_bean_of_the_day().await.map(|_| ())
            }));
            let adder = Arc::clone(&catalog);
            handles.push(tokio::spawn(async move {
                adder.add(flagged(&format!("new-{i}"), "Fresh")).await.map(|_| ())
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(botd_holders(&store).await.len(), 1);
        assert_eq!(store.get_all().await.unwrap().len(), 11);
    }
}
