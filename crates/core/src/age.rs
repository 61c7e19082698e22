//! Date-of-birth parsing and age rules.
//!
//! The date is parsed into a real calendar date before any arithmetic happens. A string such as
//! `2023-02-30` or `not-a-date` never reaches the age bounds, so it cannot slip through as
//! "no error".
//!
//! Age is computed against a `today` supplied by the caller for each evaluation. Nothing here
//! reads the clock, which keeps every function pure and lets long-lived sessions recompute after
//! midnight.

use chrono::{Datelike, NaiveDate};

/// Youngest age accepted for self-registration.
pub const MINIMUM_AGE: i32 = 18;

/// Oldest plausible age; anything above is treated as a typo in the year.
pub const MAXIMUM_AGE: i32 = 120;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a date of birth was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DateOfBirthError {
    #[error("date of birth is required")]
    Empty,
    #[error("please enter a valid date")]
    Unparseable,
    #[error("please enter a valid date")]
    InFuture,
    #[error("must be at least 18 years old")]
    Underage { age: i32 },
    #[error("enter a valid date of birth")]
    Implausible { age: i32 },
}

/// A checked date of birth together with the age it implied at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Age {
    pub birth_date: NaiveDate,
    pub years: i32,
}

/// Parses a strict ISO `YYYY-MM-DD` date of birth.
///
/// # Errors
///
/// Returns [`DateOfBirthError::Empty`] for blank input and [`DateOfBirthError::Unparseable`]
/// when the text is not a real calendar date.
pub fn parse_date_of_birth(input: &str) -> Result<NaiveDate, DateOfBirthError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateOfBirthError::Empty);
    }
    NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT).map_err(|_| DateOfBirthError::Unparseable)
}

/// Whole years between `birth` and `today`.
///
/// One year is subtracted while this year's birthday is still ahead, comparing `(month, day)`
/// pairs. Someone born on 29 February turns a year older on 1 March in non-leap years.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years
}

/// Parses `input` and applies the age bounds as of `today`.
///
/// # Errors
///
/// Returns the matching [`DateOfBirthError`] when the date is blank, not a real date, in the
/// future, under [`MINIMUM_AGE`] or over [`MAXIMUM_AGE`].
pub fn check_date_of_birth(input: &str, today: NaiveDate) -> Result<Age, DateOfBirthError> {
    let birth_date = parse_date_of_birth(input)?;
    if birth_date > today {
        return Err(DateOfBirthError::InFuture);
    }

    let years = age_on(birth_date, today);
    if years < MINIMUM_AGE {
        return Err(DateOfBirthError::Underage { age: years });
    }
    if years > MAXIMUM_AGE {
        return Err(DateOfBirthError::Implausible { age: years });
    }

    Ok(Age { birth_date, years })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn exactly_eighteen_today_is_accepted() {
        let today = date(2026, 10, 18);
        let age = check_date_of_birth("2008-10-18", today).expect("18th birthday is valid");
        assert_eq!(age.years, 18);
    }

    #[test]
    fn one_day_short_of_eighteen_is_rejected() {
        let today = date(2026, 10, 18);
        let err = check_date_of_birth("2008-10-19", today).expect_err("still 17");
        assert_eq!(err, DateOfBirthError::Underage { age: 17 });
        assert_eq!(err.to_string(), "must be at least 18 years old");
    }

    #[test]
    fn malformed_strings_are_invalid_dates() {
        let today = date(2026, 10, 18);
        for bad in ["not-a-date", "2023-02-30", "1990-13-01", "18.10.1990", "1990-1-"] {
            assert_eq!(
                check_date_of_birth(bad, today),
                Err(DateOfBirthError::Unparseable),
                "{bad} should be unparseable"
            );
        }
        assert_eq!(
            DateOfBirthError::Unparseable.to_string(),
            "please enter a valid date"
        );
    }

    #[test]
    fn blank_is_empty_not_invalid() {
        assert_eq!(parse_date_of_birth("   "), Err(DateOfBirthError::Empty));
    }

    #[test]
    fn future_birth_date_is_invalid() {
        let today = date(2026, 10, 18);
        assert_eq!(
            check_date_of_birth("2026-10-19", today),
            Err(DateOfBirthError::InFuture)
        );
    }

    #[test]
    fn implausible_age_is_rejected() {
        let today = date(2026, 10, 18);
        let err = check_date_of_birth("1900-01-01", today).expect_err("126 is implausible");
        assert_eq!(err, DateOfBirthError::Implausible { age: 126 });
        assert_eq!(err.to_string(), "enter a valid date of birth");

        assert!(check_date_of_birth("1906-10-18", today).is_ok(), "exactly 120 is fine");
    }

    #[test]
    fn leap_day_birthday_waits_for_march_in_common_years() {
        let birth = date(2004, 2, 29);
        assert_eq!(age_on(birth, date(2022, 2, 28)), 17);
        assert_eq!(age_on(birth, date(2022, 3, 1)), 18);
        assert_eq!(age_on(birth, date(2024, 2, 29)), 20);
    }

    #[test]
    fn age_is_a_pure_function_of_its_inputs() {
        let birth = date(1990, 6, 15);
        let today = date(2026, 6, 14);
        assert_eq!(age_on(birth, today), age_on(birth, today));
        assert_eq!(age_on(birth, today), 35);
        assert_eq!(age_on(birth, today.succ_opt().unwrap()), 36);
    }
}
