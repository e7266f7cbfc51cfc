use sea_orm::prelude::Decimal;
use thiserror::Error;

/// Rejections raised before a record is written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must fit {max_digits} digits with {scale} after the decimal point")]
    Precision {
        field: &'static str,
        max_digits: u32,
        scale: u32,
    },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("start date must not be after the end date")]
    DateRange,

    #[error("start time must not be after the end time")]
    TimeRange,

    #[error("a page cannot be moved beneath itself or one of its descendants")]
    TreeCycle,

    #[error("parent page belongs to a different course")]
    CrossCourseParent,

    #[error("attendance is not tracked for this activity")]
    AttendanceNotTracked,
}

/// Reject `value` when it is longer than `max` characters.
pub fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Like [`check_len`] but also rejects blank values.
pub fn check_required(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    check_len(field, value, max)
}

/// Reject `value` when it does not fit a `decimal(max_digits, scale)` column.
pub fn check_decimal(
    field: &'static str,
    value: Decimal,
    max_digits: u32,
    scale: u32,
) -> Result<(), ValidationError> {
    let value = value.normalize();
    let limit = Decimal::from(10u64.pow(max_digits.saturating_sub(scale)));
    if value.scale() > scale || value.abs() >= limit {
        return Err(ValidationError::Precision {
            field,
            max_digits,
            scale,
        });
    }
    Ok(())
}

/// Reject negative whole numbers.
pub fn check_non_negative(field: &'static str, value: i32) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_counted_in_characters() {
        assert!(check_len("name", "Māori", 5).is_ok());
        assert_eq!(
            check_len("name", "Mathematics", 4),
            Err(ValidationError::TooLong {
                field: "name",
                max: 4
            })
        );
    }

    #[test]
    fn required_rejects_blank() {
        assert_eq!(
            check_required("title", "   ", 10),
            Err(ValidationError::Empty { field: "title" })
        );
        assert!(check_required("title", "Sports day", 128).is_ok());
    }

    #[test]
    fn decimal_must_fit_column() {
        assert!(check_decimal("score", Decimal::new(75, 2), 10, 9).is_ok());
        assert!(check_decimal("score", Decimal::new(9_999_999_999, 9), 10, 9).is_ok());
        assert!(check_decimal("fulltime_equivalent", Decimal::new(10, 1), 3, 1).is_ok());
        assert!(check_decimal("fulltime_equivalent", Decimal::new(9990, 2), 3, 1).is_ok());

        let too_big = Err(ValidationError::Precision {
            field: "score",
            max_digits: 10,
            scale: 9,
        });
        assert_eq!(check_decimal("score", Decimal::new(12345, 0), 10, 9), too_big);
        assert_eq!(check_decimal("score", Decimal::new(-10, 0), 10, 9), too_big);
        assert_eq!(
            check_decimal("fulltime_equivalent", Decimal::new(12345, 2), 3, 1),
            Err(ValidationError::Precision {
                field: "fulltime_equivalent",
                max_digits: 3,
                scale: 1,
            })
        );
        assert!(check_decimal("fulltime_equivalent", Decimal::new(105, 2), 3, 1).is_err());
    }

    #[test]
    fn negative_rejected() {
        assert!(check_non_negative("duration", 0).is_ok());
        assert_eq!(
            check_non_negative("duration", -5),
            Err(ValidationError::Negative { field: "duration" })
        );
    }
}
