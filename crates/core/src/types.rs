use chrono::{NaiveDate, Utc};

/// Bean identifiers are caller-assigned strings.
pub type BeanId = String;

/// Bean-of-the-day dates carry no time component and are always UTC.
pub type WinnerDate = NaiveDate;

/// Today's date in UTC.
pub fn today_utc() -> WinnerDate {
    Utc::now().date_naive()
}
