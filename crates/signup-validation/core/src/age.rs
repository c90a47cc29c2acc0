//! Calendar age computation for the birthdate field

use chrono::{Datelike, NaiveDate};

/// Date format produced by `<input type="date">`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_birthdate(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Whole years between `birth` and `today`.
///
/// The year difference drops by one while today's month/day is still before
/// the birth month/day. Someone born on 29 February turns a year older on
/// 1 March in non-leap years. Birthdates after `today` give a negative age.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Today's date on the local calendar of the host
pub fn today_local() -> NaiveDate {
    chrono::Local::now().date_naive()
}
