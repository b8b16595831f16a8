//! Villa request/response DTOs

use chrono::{Days, NaiveDate};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::ProposedStay;

/// Days shown when the calendar range is left open
pub const DEFAULT_CALENDAR_DAYS: u64 = 60;

/// Calendar range, inclusive on both ends
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    /// First day shown (default: today)
    pub from: Option<NaiveDate>,
    /// Last day shown (default: `from` + 59 days)
    pub to: Option<NaiveDate>,
}

impl CalendarQuery {
    pub fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let from = self.from.unwrap_or(today);
        let to = self.to.unwrap_or_else(|| {
            from.checked_add_days(Days::new(DEFAULT_CALENDAR_DAYS - 1))
                .unwrap_or(NaiveDate::MAX)
        });
        (from, to)
    }
}

/// Stay to price
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    #[schema(example = "2024-03-01")]
    pub check_in_date: NaiveDate,
    #[schema(example = "2024-03-04")]
    pub check_out_date: NaiveDate,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub people_count: u32,
}

impl QuoteRequest {
    pub fn stay(&self) -> ProposedStay {
        ProposedStay::new(self.check_in_date, self.check_out_date, self.people_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn open_range_defaults_to_sixty_days_from_today() {
        let (from, to) = CalendarQuery::default().resolve(date(2024, 3, 1));
        assert_eq!(from, date(2024, 3, 1));
        assert_eq!(to, date(2024, 4, 29));
    }

    #[test]
    fn explicit_bounds_win() {
        let query = CalendarQuery {
            from: Some(date(2024, 2, 1)),
            to: Some(date(2024, 2, 29)),
        };
        assert_eq!(
            query.resolve(date(2024, 3, 1)),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
    }
}
