use chrono::{DateTime, FixedOffset, NaiveDate};

use teller_core::Milliunits;

use crate::error::ParseError;

/// Raw amount substituted when a matched format carries no amount capture:
/// one dollar, before digit-stripping.
pub const DEFAULT_AMOUNT_RAW: &str = "$1.00";

/// Completes a yearless date and parses it as month/day/year.
///
/// Fewer than three delimited components means the notification omitted the
/// year, so the current calendar year is appended. Both `/` and `-`
/// separators and 1–2 digit day/month parts are accepted. Already-complete
/// dates pass through unchanged, making completion idempotent.
pub fn normalize_date(raw: &str, current_year: i32) -> Result<NaiveDate, ParseError> {
    let trimmed = raw.trim();
    let completed = if trimmed.split(['/', '-']).count() < 3 {
        format!("{trimmed}/{current_year}")
    } else {
        trimmed.to_string()
    };

    let parts: Vec<&str> = completed.split(['/', '-']).collect();
    let (month, day, year) = match parts.as_slice() {
        [m, d, y] => (*m, *d, *y),
        _ => return Err(ParseError::MalformedDate(raw.to_string())),
    };

    let month: u32 = month
        .parse()
        .map_err(|_| ParseError::MalformedDate(raw.to_string()))?;
    let day: u32 = day
        .parse()
        .map_err(|_| ParseError::MalformedDate(raw.to_string()))?;
    let year: i32 = year
        .parse()
        .map_err(|_| ParseError::MalformedDate(raw.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ParseError::MalformedDate(raw.to_string()))
}

/// Scales a captured currency string into signed ledger minor units.
///
/// Every non-digit is stripped, turning "$452.99" into 45299 hundredths,
/// and the ×10 shift lands on the ledger's thousandths convention. Captured
/// amounts are debits, hence the negation. An absent capture falls back to
/// [`DEFAULT_AMOUNT_RAW`].
///
/// Stripping the decimal point assumes exactly two fractional digits in the
/// source text; an amount printed with any other precision would come out
/// at the wrong magnitude.
pub fn normalize_amount(raw: Option<&str>) -> Result<Milliunits, ParseError> {
    let raw = raw.unwrap_or(DEFAULT_AMOUNT_RAW);
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(ParseError::MalformedAmount(raw.to_string()));
    }
    let hundredths: i64 = digits
        .parse()
        .map_err(|_| ParseError::MalformedAmount(raw.to_string()))?;
    Ok(Milliunits::new(-(hundredths * 10)))
}

/// Memo = wall-clock `HH:MM` in the service's fixed offset, one space, then
/// the raw `who` capture.
pub fn compose_memo(now: DateTime<FixedOffset>, who: &str) -> String {
    format!("{} {}", now.format("%H:%M"), who)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // ── normalize_date ───────────────────────────────────────────────────────

    #[test]
    fn complete_date_parses_as_month_day_year() {
        assert_eq!(
            normalize_date("8/5/1972", 2020).unwrap(),
            NaiveDate::from_ymd_opt(1972, 8, 5).unwrap()
        );
    }

    #[test]
    fn complete_date_ignores_current_year() {
        // Idempotent on already-complete dates, whatever the clock says.
        assert_eq!(
            normalize_date("12/31/1999", 2020).unwrap(),
            normalize_date("12/31/1999", 2024).unwrap()
        );
    }

    #[test]
    fn yearless_date_gets_current_year() {
        assert_eq!(
            normalize_date("08/05", 2020).unwrap(),
            NaiveDate::from_ymd_opt(2020, 8, 5).unwrap()
        );
    }

    #[test]
    fn dash_separators_accepted() {
        assert_eq!(
            normalize_date("8-5-1972", 2020).unwrap(),
            NaiveDate::from_ymd_opt(1972, 8, 5).unwrap()
        );
    }

    #[test]
    fn two_digit_parts_accepted() {
        assert_eq!(
            normalize_date("08/05/1972", 2020).unwrap(),
            NaiveDate::from_ymd_opt(1972, 8, 5).unwrap()
        );
    }

    #[test]
    fn nonsense_dates_are_malformed() {
        assert!(matches!(
            normalize_date("not/a/date", 2020),
            Err(ParseError::MalformedDate(_))
        ));
        assert!(matches!(
            normalize_date("13/40/2020", 2020),
            Err(ParseError::MalformedDate(_))
        ));
        assert!(matches!(
            normalize_date("1/2/3/4", 2020),
            Err(ParseError::MalformedDate(_))
        ));
    }

    // ── normalize_amount ─────────────────────────────────────────────────────

    #[test]
    fn dollar_amount_scales_to_negative_milliunits() {
        assert_eq!(normalize_amount(Some("$452.99")).unwrap().raw(), -452_990);
    }

    #[test]
    fn surrounding_markup_is_stripped() {
        assert_eq!(
            normalize_amount(Some("$452.99</p>")).unwrap().raw(),
            -452_990
        );
    }

    #[test]
    fn absent_amount_defaults_to_one_dollar() {
        assert_eq!(normalize_amount(None).unwrap().raw(), -1_000);
    }

    #[test]
    fn digitless_amount_is_malformed() {
        assert!(matches!(
            normalize_amount(Some("$--")),
            Err(ParseError::MalformedAmount(_))
        ));
    }

    // ── compose_memo ─────────────────────────────────────────────────────────

    #[test]
    fn memo_prefixes_who_with_wall_clock() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = offset.with_ymd_and_hms(2020, 4, 8, 18, 38, 36).unwrap();
        assert_eq!(compose_memo(now, "1234"), "18:38 1234");
    }

    #[test]
    fn memo_timestamp_is_zero_padded() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let now = offset.with_ymd_and_hms(2021, 1, 1, 7, 5, 0).unwrap();
        assert_eq!(compose_memo(now, "9876"), "07:05 9876");
    }
}
