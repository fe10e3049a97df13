//! Dashboard reporting models and the daily station rollup
//!
//! The rollup is pure over fetched rows; the backend supplies the stations
//! and the counts recorded inside the operational day.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::alerts::LowStockItem;
use super::counts::InventoryCount;
use super::station::Station;

/// Reporting completeness of one station for the day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationReportStatus {
    pub station_id: Uuid,
    pub station_name: String,
    pub reported: bool,
    /// Timestamp of the station's most recent count today, when reported
    pub reported_at: Option<DateTime<Utc>>,
    /// Distinct products this station counted today
    pub products_counted: usize,
}

/// Daily rollup of station submissions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub day: NaiveDate,
    pub stations_reported_today: usize,
    pub total_stations: usize,
    /// Distinct products with at least one count across all stations today
    pub products_counted_today: usize,
    pub stations: Vec<StationReportStatus>,
}

/// Full dashboard snapshot consumed by the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub summary: DashboardSummary,
    pub low_stock: Vec<LowStockItem>,
}

/// The operational day a timestamp falls into
///
/// Day boundaries follow the venue's configured UTC offset, not UTC
/// midnight, so late-shift counts land on the operational day they belong
/// to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDay {
    pub date: NaiveDate,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
}

/// Compute the local day window containing `now`
pub fn local_day_bounds(now: DateTime<Utc>, utc_offset_minutes: i32) -> LocalDay {
    let offset = Duration::minutes(utc_offset_minutes as i64);
    let date = (now + offset).date_naive();
    day_bounds_for_date(date, utc_offset_minutes)
}

/// Compute the UTC window of a given local date
pub fn day_bounds_for_date(date: NaiveDate, utc_offset_minutes: i32) -> LocalDay {
    let offset = Duration::minutes(utc_offset_minutes as i64);
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    let start_utc = DateTime::<Utc>::from_naive_utc_and_offset(midnight, Utc) - offset;
    LocalDay {
        date,
        start_utc,
        end_utc: start_utc + Duration::days(1),
    }
}

/// Roll today's counts up into the dashboard summary
///
/// A station counts as reported when it submitted at least one count today.
/// `products_counted_today` counts distinct products, not count rows, since
/// a product may be recounted during the day.
pub fn summarize_station_reports(
    stations: &[Station],
    todays_counts: &[InventoryCount],
    day: NaiveDate,
) -> DashboardSummary {
    let station_statuses: Vec<StationReportStatus> = stations
        .iter()
        .map(|station| {
            let mut reported_at: Option<DateTime<Utc>> = None;
            let mut products: Vec<Uuid> = Vec::new();
            for count in todays_counts.iter().filter(|c| c.station_id == station.id) {
                if reported_at.map_or(true, |ts| count.created_at > ts) {
                    reported_at = Some(count.created_at);
                }
                if !products.contains(&count.product_id) {
                    products.push(count.product_id);
                }
            }
            StationReportStatus {
                station_id: station.id,
                station_name: station.name.clone(),
                reported: reported_at.is_some(),
                reported_at,
                products_counted: products.len(),
            }
        })
        .collect();

    let mut distinct_products: Vec<Uuid> = Vec::new();
    for count in todays_counts {
        if !distinct_products.contains(&count.product_id) {
            distinct_products.push(count.product_id);
        }
    }

    DashboardSummary {
        day,
        stations_reported_today: station_statuses.iter().filter(|s| s.reported).count(),
        total_stations: station_statuses.len(),
        products_counted_today: distinct_products.len(),
        stations: station_statuses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn station(name: &str) -> Station {
        Station {
            id: Uuid::new_v4(),
            name: name.to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn count(station_id: Uuid, product_id: Uuid, at: DateTime<Utc>) -> InventoryCount {
        InventoryCount {
            id: Uuid::new_v4(),
            product_id,
            station_id,
            counted_quantity: Decimal::ONE,
            operator_id: Uuid::new_v4(),
            created_at: at,
        }
    }

    #[test]
    fn test_local_day_bounds_utc() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap();
        let day = local_day_bounds(now, 0);
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(day.start_utc, Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap());
        assert_eq!(day.end_utc, Utc.with_ymd_and_hms(2025, 3, 11, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_local_day_bounds_negative_offset_shifts_window() {
        // 01:00 UTC with a -240 offset is still the previous local day
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 1, 0, 0).unwrap();
        let day = local_day_bounds(now, -240);
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
        assert_eq!(day.start_utc, Utc.with_ymd_and_hms(2025, 3, 9, 4, 0, 0).unwrap());
        assert_eq!(day.end_utc, Utc.with_ymd_and_hms(2025, 3, 10, 4, 0, 0).unwrap());
    }

    #[test]
    fn test_day_bounds_for_date_matches_containing_window() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 1, 0, 0).unwrap();
        let day = local_day_bounds(now, -240);
        assert_eq!(day_bounds_for_date(day.date, -240), day);
    }

    #[test]
    fn test_window_covers_exactly_one_day() {
        let now = Utc::now();
        let day = local_day_bounds(now, -240);
        assert_eq!(day.end_utc - day.start_utc, Duration::days(1));
        assert!(now >= day.start_utc && now < day.end_utc);
    }

    #[test]
    fn test_summary_reported_flags() {
        let cold = station("Cocina fría");
        let grill = station("Parrilla");
        let now = Utc::now();
        let product = Uuid::new_v4();
        let counts = vec![count(cold.id, product, now)];

        let summary = summarize_station_reports(
            &[cold.clone(), grill.clone()],
            &counts,
            now.date_naive(),
        );

        assert_eq!(summary.total_stations, 2);
        assert_eq!(summary.stations_reported_today, 1);
        assert!(summary.stations[0].reported);
        assert_eq!(summary.stations[0].reported_at, Some(now));
        assert!(!summary.stations[1].reported);
        assert_eq!(summary.stations[1].reported_at, None);
    }

    #[test]
    fn test_recounted_product_counted_once() {
        let st = station("Barra");
        let now = Utc::now();
        let product = Uuid::new_v4();
        let counts = vec![
            count(st.id, product, now - Duration::hours(2)),
            count(st.id, product, now),
        ];

        let summary = summarize_station_reports(&[st], &counts, now.date_naive());

        assert_eq!(summary.products_counted_today, 1);
        assert_eq!(summary.stations[0].products_counted, 1);
        // reported_at is the most recent submission
        assert_eq!(summary.stations[0].reported_at, Some(now));
    }

    #[test]
    fn test_product_counted_at_two_stations_counted_once_globally() {
        let a = station("Cocina fría");
        let b = station("Parrilla");
        let now = Utc::now();
        let product = Uuid::new_v4();
        let counts = vec![count(a.id, product, now), count(b.id, product, now)];

        let summary = summarize_station_reports(&[a, b], &counts, now.date_naive());

        assert_eq!(summary.products_counted_today, 1);
        assert_eq!(summary.stations_reported_today, 2);
    }
}
