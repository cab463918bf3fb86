//! Bean entity model and DTOs.
//!
//! JSON keys follow the catalog's established wire format: camelCase fields,
//! `_id` for the identifier and `isBOTD` for the bean-of-the-day flag.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::types::{BeanId, WinnerDate};

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bean {
    #[serde(rename = "_id", alias = "id")]
    pub id: BeanId,
    pub index: i32,
    #[serde(rename = "isBOTD")]
    pub is_botd: bool,
    pub cost: Decimal,
    pub image: Option<String>,
    pub colour: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub country: Option<String>,
    /// Date this bean last won bean of the day.
    #[serde(default)]
    pub previous_winner_date: Option<WinnerDate>,
}

impl Bean {
    /// Overwrite the catalog fields with those of `other`.
    ///
    /// The id and the bean-of-the-day state are left alone; those only change
    /// through creation and selection.
    pub fn copy_catalog_fields_from(&mut self, other: &Bean) {
        self.index = other.index;
        self.cost = other.cost;
        self.image = other.image.clone();
        self.colour = other.colour.clone();
        self.name = other.name.clone();
        self.description = other.description.clone();
        self.country = other.country.clone();
    }
}

/// DTO for creating a new bean. The id is supplied by the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBean {
    #[serde(rename = "_id", alias = "id")]
    #[validate(custom(function = "not_blank"))]
    pub id: BeanId,
    #[serde(default)]
    pub index: i32,
    #[serde(default, rename = "isBOTD")]
    pub is_botd: bool,
    #[validate(custom(function = "valid_cost"))]
    pub cost: Decimal,
    pub image: Option<String>,
    pub colour: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub description: Option<String>,
    pub country: Option<String>,
}

impl From<CreateBean> for Bean {
    fn from(input: CreateBean) -> Self {
        Bean {
            id: input.id,
            index: input.index,
            is_botd: input.is_botd,
            cost: input.cost,
            image: input.image,
            colour: input.colour,
            name: input.name,
            description: input.description,
            country: input.country,
            previous_winner_date: None,
        }
    }
}

/// DTO for patching an existing bean. Absent or null fields are left unchanged.
///
/// Bean-of-the-day state is not patchable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBean {
    pub index: Option<i32>,
    #[validate(custom(function = "valid_cost"))]
    pub cost: Option<Decimal>,
    pub image: Option<String>,
    pub colour: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
}

impl UpdateBean {
    /// True when no field would change anything.
    pub fn is_empty(&self) -> bool {
        self.index.is_none()
            && self.cost.is_none()
            && self.image.is_none()
            && self.colour.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.country.is_none()
    }

    /// Merge every present field over `bean`.
    pub fn apply_to(self, bean: &mut Bean) {
        if let Some(index) = self.index {
            bean.index = index;
        }
        if let Some(cost) = self.cost {
            bean.cost = cost;
        }
        if let Some(name) = self.name {
            bean.name = name;
        }
        if self.image.is_some() {
            bean.image = self.image;
        }
        if self.colour.is_some() {
            bean.colour = self.colour;
        }
        if self.description.is_some() {
            bean.description = self.description;
        }
        if self.country.is_some() {
            bean.country = self.country;
        }
    }
}

/// Attribute filters for bean search.
///
/// Each present field must occur in the matching bean attribute as a
/// case-insensitive substring. Present fields are ANDed together.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BeanSearch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
}

impl BeanSearch {
    /// Drop blank filters so they impose no constraint.
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }
        BeanSearch {
            name: keep(self.name),
            description: keep(self.description),
            country: keep(self.country),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.country.is_none()
    }

    pub fn matches(&self, bean: &Bean) -> bool {
        contains_ci(Some(&bean.name), self.name.as_deref())
            && contains_ci(bean.description.as_deref(), self.description.as_deref())
            && contains_ci(bean.country.as_deref(), self.country.as_deref())
    }
}

fn contains_ci(haystack: Option<&str>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => haystack
            .is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase())),
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// Digits after the decimal point a stored cost keeps.
const COST_SCALE: u32 = 2;

/// Exclusive upper bound on cost, matching a `NUMERIC(12, 2)` column.
const COST_LIMIT: i64 = 10_000_000_000;

fn valid_cost(cost: &Decimal) -> Result<(), ValidationError> {
    if cost.is_sign_negative() && !cost.is_zero() {
        return Err(
            ValidationError::new("negative_cost").with_message("cost must not be negative".into())
        );
    }
    if cost.normalize().scale() > COST_SCALE {
        return Err(ValidationError::new("cost_scale")
            .with_message(format!("cost must have at most {COST_SCALE} decimal places").into()));
    }
    if *cost >= Decimal::from(COST_LIMIT) {
        return Err(ValidationError::new("cost_range")
            .with_message(format!("cost must be less than {COST_LIMIT}").into()));
    }
    Ok(())
}
