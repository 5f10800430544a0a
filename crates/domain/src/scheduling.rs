use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Midnight of `date` in `tz` as an absolute instant.
///
/// A DST spring-forward can remove midnight from the calendar (some zones
/// shift at 00:00); in that case the instant rolls forward to the earliest
/// wall-clock time that exists on that date. An ambiguous midnight
/// (fall-back) resolves to the earlier of the two instants.
fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Tz> {
    let mut naive = date.and_time(NaiveTime::MIN);
    for _ in 0..24 {
        match tz.from_local_datetime(&naive).earliest() {
            Some(dt) => return dt,
            None => naive = naive + Duration::hours(1),
        }
    }
    // No zone skips an entire day; treat the date as UTC if it somehow does.
    tz.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// The absolute UTC instant (millis) at which a reminder with `days_before`
/// lead time fires for a document expiring on `expiration_date` in `tz`.
///
/// `days_before` is subtracted as calendar days, not as a fixed multiple of
/// 24 hours, so the fire instant tracks DST shifts between the fire date and
/// the expiration date. Whether the instant is already in the past is for
/// the caller to decide; an elapsed occurrence is skipped, not an error.
pub fn compute_fire_instant(expiration_date: NaiveDate, tz: Tz, days_before: u32) -> i64 {
    let fire_date = expiration_date - Duration::days(days_before as i64);
    local_midnight(fire_date, tz)
        .with_timezone(&Utc)
        .timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::{New_York, Santiago};
    use chrono_tz::{Tz, UTC};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc_millis(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn fires_at_local_midnight_days_before_expiration() {
        // EST in effect on Mar 3, UTC-5
        let fire = compute_fire_instant(date(2025, 3, 10), New_York, 7);
        assert_eq!(fire, utc_millis(2025, 3, 3, 5));
    }

    #[test]
    fn day_of_reminder_fires_at_expiration_midnight() {
        // DST began Mar 9, so Mar 10 midnight is EDT, UTC-4
        let fire = compute_fire_instant(date(2025, 3, 10), New_York, 0);
        assert_eq!(fire, utc_millis(2025, 3, 10, 4));
    }

    #[test]
    fn calendar_subtraction_crosses_dst_transition() {
        // Mar 14 is EDT but 7 calendar days earlier is Mar 7, still EST.
        // A fixed 7 * 24h subtraction would land at 03:00Z instead.
        let fire = compute_fire_instant(date(2025, 3, 14), New_York, 7);
        assert_eq!(fire, utc_millis(2025, 3, 7, 5));
    }

    #[test]
    fn utc_documents_fire_at_utc_midnight() {
        let fire = compute_fire_instant(date(2025, 6, 1), UTC, 3);
        assert_eq!(fire, utc_millis(2025, 5, 29, 0));
    }

    #[test]
    fn skipped_midnight_rolls_forward() {
        // Chile springs forward at midnight: Sep 8 2024 starts at 01:00 -03
        let fire = compute_fire_instant(date(2024, 9, 8), Santiago, 0);
        assert_eq!(fire, utc_millis(2024, 9, 8, 4));
    }

    #[test]
    fn local_midnight_matches_wall_clock() {
        let tz: Tz = "Europe/Oslo".parse().unwrap();
        let dt = local_midnight(date(2025, 1, 15), tz);
        assert_eq!(dt.time(), NaiveTime::MIN);
        assert_eq!(dt.date_naive(), date(2025, 1, 15));
    }
}
