//! Business-day calendar arithmetic.
//!
//! A business day is any weekday; exchange holidays are not modeled.
//! Shifting follows the pandas `BDay` offset convention so that windows line
//! up with price series built the same way.

use chrono::{Datelike, Days, NaiveDate, Weekday};

#[must_use]
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn next_business_day(date: NaiveDate) -> Option<NaiveDate> {
    let mut next = date.checked_add_days(Days::new(1))?;
    while !is_business_day(next) {
        next = next.checked_add_days(Days::new(1))?;
    }
    Some(next)
}

fn previous_business_day(date: NaiveDate) -> Option<NaiveDate> {
    let mut prev = date.checked_sub_days(Days::new(1))?;
    while !is_business_day(prev) {
        prev = prev.checked_sub_days(Days::new(1))?;
    }
    Some(prev)
}

/// Move `date` by `n` business days, or `None` if that leaves the calendar.
///
/// From a weekend, the first step lands on the adjacent business day in the
/// direction of travel (Saturday −1 is Friday, Saturday +1 is Monday), and a
/// zero shift rolls forward to Monday.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use earnings_corpus::bday::shift_business_days;
///
/// let wed = NaiveDate::from_ymd_opt(2013, 1, 16).unwrap();
/// assert_eq!(shift_business_days(wed, -4), NaiveDate::from_ymd_opt(2013, 1, 10));
/// assert_eq!(shift_business_days(NaiveDate::MAX, 1), None);
/// ```
#[must_use]
pub fn shift_business_days(date: NaiveDate, n: i64) -> Option<NaiveDate> {
    let mut current = date;
    if n == 0 {
        while !is_business_day(current) {
            current = current.checked_add_days(Days::new(1))?;
        }
        return Some(current);
    }

    let step = if n > 0 {
        next_business_day
    } else {
        previous_business_day
    };
    for _ in 0..n.unsigned_abs() {
        current = step(current)?;
    }
    Some(current)
}

/// `count` consecutive business days starting at `start` (rolled forward to
/// a business day if it falls on a weekend), or `None` if the range runs off
/// the calendar.
#[must_use]
pub fn business_days_from(start: NaiveDate, count: usize) -> Option<Vec<NaiveDate>> {
    let mut days = Vec::new();
    if count == 0 {
        return Some(days);
    }

    let mut current = shift_business_days(start, 0)?;
    days.push(current);
    while days.len() < count {
        current = next_business_day(current)?;
        days.push(current);
    }
    Some(days)
}
