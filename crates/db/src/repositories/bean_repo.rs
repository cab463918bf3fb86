//! Repository for the `beans` table.

use beans_core::bean::{Bean, BeanSearch};
use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};

use crate::models::bean::BeanRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, display_index, is_botd, cost, image, colour, name, \
                       description, country, previous_winner_date";

/// Key for the transaction-scoped advisory lock serializing BOTD changes
/// across processes sharing the database.
const BOTD_LOCK_KEY: i64 = 0x0B07_D000;

/// Provides CRUD and bean-of-the-day operations for beans.
pub struct BeanRepo;

impl BeanRepo {
    /// Insert a new bean, returning the created row.
    pub async fn create<'e, E>(executor: E, bean: &Bean) -> Result<BeanRow, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO beans \
                (id, display_index, is_botd, cost, image, colour, name, description, country, \
                 previous_winner_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BeanRow>(&query)
            .bind(&bean.id)
            .bind(bean.index)
            .bind(bean.is_botd)
            .bind(bean.cost)
            .bind(&bean.image)
            .bind(&bean.colour)
            .bind(&bean.name)
            .bind(&bean.description)
            .bind(&bean.country)
            .bind(bean.previous_winner_date)
            .fetch_one(executor)
            .await
    }

    /// Insert a batch of beans in one transaction.
    pub async fn create_many(pool: &PgPool, beans: &[Bean]) -> Result<Vec<BeanRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut rows = Vec::with_capacity(beans.len());
        for bean in beans {
            rows.push(Self::create(&mut *tx, bean).await?);
        }
        tx.commit().await?;
        Ok(rows)
    }

    /// Find a bean by its id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<BeanRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM beans WHERE id = $1");
        sqlx::query_as::<_, BeanRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all beans ordered by display index, then id.
    pub async fn list(pool: &PgPool) -> Result<Vec<BeanRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM beans ORDER BY display_index, id");
        sqlx::query_as::<_, BeanRow>(&query).fetch_all(pool).await
    }

    /// Case-insensitive substring search. `None` filters match everything.
    pub async fn search(pool: &PgPool, filter: &BeanSearch) -> Result<Vec<BeanRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM beans \
             WHERE ($1::text IS NULL OR name ILIKE $1) \
               AND ($2::text IS NULL OR description ILIKE $2) \
               AND ($3::text IS NULL OR country ILIKE $3) \
             ORDER BY display_index, id"
        );
        sqlx::query_as::<_, BeanRow>(&query)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.description.as_deref().map(contains_pattern))
            .bind(filter.country.as_deref().map(contains_pattern))
            .fetch_all(pool)
            .await
    }

    /// Overwrite the catalog columns of a bean. BOTD columns are untouched.
    ///
    /// Returns `None` if no row with the given id exists.
    pub async fn update(pool: &PgPool, bean: &Bean) -> Result<Option<BeanRow>, sqlx::Error> {
        let query = format!(
            "UPDATE beans SET \
                display_index = $2, \
                cost = $3, \
                image = $4, \
                colour = $5, \
                name = $6, \
                description = $7, \
                country = $8, \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BeanRow>(&query)
            .bind(&bean.id)
            .bind(bean.index)
            .bind(bean.cost)
            .bind(&bean.image)
            .bind(&bean.colour)
            .bind(&bean.name)
            .bind(&bean.description)
            .bind(&bean.country)
            .fetch_optional(pool)
            .await
    }

    /// Delete a bean. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM beans WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find the current bean of the day (if any).
    pub async fn find_botd(pool: &PgPool) -> Result<Option<BeanRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM beans WHERE is_botd = true");
        sqlx::query_as::<_, BeanRow>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Unflag every bean of the day. Returns the number of rows changed.
    pub async fn clear_botd<'e, E>(executor: E) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE beans SET is_botd = false, updated_at = now() WHERE is_botd = true",
        )
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Flag a bean as bean of the day. Returns `false` if the id is unknown.
    pub async fn set_botd<'e, E>(
        executor: E,
        id: &str,
        date: NaiveDate,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE beans SET is_botd = true, previous_winner_date = $2, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(date)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the current holder and flag `id` in one transaction.
    ///
    /// Returns `false` (and rolls back) if the id is unknown.
    pub async fn replace_botd(
        pool: &PgPool,
        id: &str,
        date: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::lock_botd(&mut *tx).await?;

        Self::clear_botd(&mut *tx).await?;

        if !Self::set_botd(&mut *tx, id, date).await? {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Clear the current holder and insert `beans` in one transaction.
    ///
    /// Any failure rolls back the clear along with the inserts.
    pub async fn create_replacing_botd(
        pool: &PgPool,
        beans: &[Bean],
    ) -> Result<Vec<BeanRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::lock_botd(&mut *tx).await?;
        Self::clear_botd(&mut *tx).await?;

        let mut rows = Vec::with_capacity(beans.len());
        for bean in beans {
            rows.push(Self::create(&mut *tx, bean).await?);
        }
        tx.commit().await?;
        Ok(rows)
    }

    /// Take the transaction-scoped BOTD advisory lock.
    async fn lock_botd<'e, E>(executor: E) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(BOTD_LOCK_KEY)
            .execute(executor)
            .await?;
        Ok(())
    }
}

/// Build an `ILIKE` pattern matching `value` anywhere, with LIKE
/// metacharacters escaped.
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
