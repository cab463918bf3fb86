//! Row mapping for the `beans` table.

use beans_core::bean::Bean;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A row from the `beans` table.
///
/// The display ordering hint lives in `display_index` since `index` is
/// awkward as a column name.
#[derive(Debug, Clone, FromRow)]
pub struct BeanRow {
    pub id: String,
    pub display_index: i32,
    pub is_botd: bool,
    pub cost: Decimal,
    pub image: Option<String>,
    pub colour: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub country: Option<String>,
    pub previous_winner_date: Option<NaiveDate>,
}

impl From<BeanRow> for Bean {
    fn from(row: BeanRow) -> Self {
        Bean {
            id: row.id,
            index: row.display_index,
            is_botd: row.is_botd,
            cost: row.cost,
            image: row.image,
            colour: row.colour,
            name: row.name,
            description: row.description,
            country: row.country,
            previous_winner_date: row.previous_winner_date,
        }
    }
}
