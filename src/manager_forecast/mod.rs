pub mod errors;
pub mod fallback;
pub mod models;

use std::collections::BTreeMap;
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info, warn};
use crate::manager_db::models::ForecastRow;
use crate::manager_db::TIMESTAMP_FORMAT;
use crate::manager_forecast::errors::RowParseError;
use crate::manager_forecast::fallback::fallback_forecast;
use crate::manager_forecast::models::{CurrentKp, DayForecast, ForecastResponse, ForecastSample, Series, StormStatus};
use crate::storm_level::{classify, warning, StormLevel};

/// Max number of days in a forecast
pub const MAX_DAYS: usize = 3;

/// Status storm level when the store holds no readings
pub const NO_DATA: &str = "No data";

/// Builds the day by day storm forecast from raw store rows
///
/// Rows dated before `now`'s date are dropped and so are rows that fail to parse.
/// Remaining rows are grouped per calendar date, keeping their order within the day,
/// and the first three dates are classified by their highest Kp value.
/// The placeholder forecast is returned when nothing usable remains.
///
/// # Arguments
///
/// * 'rows' - forecast rows in ascending timestamp order
/// * 'now' - the moment the forecast is built for
/// * 'location' - location label
pub fn build_forecast(rows: &[ForecastRow], now: NaiveDateTime, location: &str) -> ForecastResponse {
    let today = now.date();

    if rows.is_empty() {
        info!("no forecast rows available, serving fallback forecast");
        return fallback_forecast(today, location);
    }
    info!("processing {} forecast rows", rows.len());

    let mut by_date: BTreeMap<NaiveDate, Series> = BTreeMap::new();
    for row in rows {
        let sample = match parse_row(row) {
            Ok(sample) => sample,
            Err(e) => {
                warn!("skipping forecast row: {}", e);
                continue;
            }
        };

        let date = sample.timestamp.date();
        if date < today {
            continue;
        }

        by_date
            .entry(date)
            .or_default()
            .push(sample.timestamp.format("%H:%M").to_string(), sample.kp_index);
    }

    let days: Vec<DayForecast> = by_date
        .into_iter()
        .take(MAX_DAYS)
        .map(|(date, series)| {
            debug!("{}: {} samples", date, series.len());
            DayForecast {
                day_label: day_label(date, today),
                date,
                storm_level: series.max().map_or(StormLevel::Calm, classify),
                series,
            }
        })
        .collect();

    if days.is_empty() {
        warn!("no usable forecast rows on or after {}, serving fallback forecast", today);
        return fallback_forecast(today, location);
    }

    let current_storm = days.first().map_or(StormLevel::Calm, |d| d.storm_level);
    info!("built forecast for {} days, current storm: {}", days.len(), current_storm);

    ForecastResponse {
        location: location.to_string(),
        current_storm,
        warning: warning(current_storm).to_string(),
        days,
    }
}

/// Storm status of the newest stored reading, however old it is
///
/// A reading without a Kp value is reported as calm.
///
/// # Arguments
///
/// * 'latest' - the newest row in the store, if any
pub fn storm_status(latest: Option<ForecastRow>) -> StormStatus {
    match latest {
        None => StormStatus { current_kp: None, storm_level: NO_DATA.to_string() },
        Some(row) => {
            let storm_level = row.kp_index.map_or(StormLevel::Calm, classify);
            StormStatus {
                current_kp: Some(CurrentKp { timestamp: row.timestamp, kp_index: row.kp_index }),
                storm_level: storm_level.to_string(),
            }
        }
    }
}

/// Relative name of a date: Today, Tomorrow or its weekday
///
/// # Arguments
///
/// * 'date' - date to name
/// * 'today' - reference date
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if Some(date) == today.succ_opt() {
        "Tomorrow".to_string()
    } else {
        date.format("%A").to_string()
    }
}

fn parse_row(row: &ForecastRow) -> Result<ForecastSample, RowParseError> {
    let timestamp = NaiveDateTime::parse_from_str(&row.timestamp, TIMESTAMP_FORMAT)
        .map_err(|e| RowParseError::Timestamp(format!("'{}': {}", row.timestamp, e)))?;

    match row.kp_index {
        Some(kp_index) if kp_index.is_finite() => Ok(ForecastSample { timestamp, kp_index }),
        other => Err(RowParseError::KpIndex(format!("{:?} at {}", other, row.timestamp))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager_forecast::fallback::FALLBACK_WARNING;

    const LOCATION: &str = "Moscow";

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap().and_hms_opt(10, 30, 0).unwrap()
    }

    fn row(ts: &str, kp: f64) -> ForecastRow {
        ForecastRow { timestamp: ts.to_string(), kp_index: Some(kp) }
    }

    #[test]
    fn empty_input_gives_fallback() {
        let forecast = build_forecast(&[], now(), LOCATION);

        assert_eq!(forecast, fallback_forecast(now().date(), LOCATION));
        assert_eq!(forecast.days[0].day_label, "Today");
        assert_eq!(forecast.days[0].series.values, vec![3.0, 4.0, 5.0, 4.0, 3.0, 4.0, 3.0, 4.0]);
        assert_eq!(forecast.days[1].day_label, "Tomorrow");
        assert_eq!(forecast.days[1].series.values, vec![4.0, 3.0, 4.0, 5.0, 4.0, 3.0, 4.0, 3.0]);
        assert_eq!(forecast.warning, FALLBACK_WARNING);
    }

    #[test]
    fn single_sample_today() {
        let forecast = build_forecast(&[row("2024-05-10 12:00:00", 6.2)], now(), LOCATION);

        assert_eq!(forecast.current_storm, StormLevel::Moderate);
        assert_eq!(forecast.warning, "Attention! Moderate magnetic storm");
        assert_eq!(forecast.location, LOCATION);
        assert_eq!(forecast.days.len(), 1);
        assert_eq!(forecast.days[0].day_label, "Today");
        assert_eq!(forecast.days[0].series.times, vec!["12:00".to_string()]);
    }

    #[test]
    fn day_level_uses_max_not_average() {
        let rows = [
            row("2024-05-10 12:00:00", 3.0),
            row("2024-05-10 15:00:00", 9.0),
            row("2024-05-10 18:00:00", 2.0),
        ];
        let forecast = build_forecast(&rows, now(), LOCATION);

        assert_eq!(forecast.days[0].storm_level, StormLevel::Extreme);
        assert_eq!(forecast.current_storm.label(), "Extreme storm");
    }

    #[test]
    fn at_most_three_ascending_days() {
        let rows = [
            row("2024-05-10 21:00:00", 1.0),
            row("2024-05-11 00:00:00", 5.0),
            row("2024-05-12 00:00:00", 7.5),
            row("2024-05-13 00:00:00", 8.0),
            row("2024-05-14 00:00:00", 9.0),
        ];
        let forecast = build_forecast(&rows, now(), LOCATION);

        let dates: Vec<NaiveDate> = forecast.days.iter().map(|d| d.date).collect();
        assert_eq!(dates.len(), MAX_DAYS);
        assert!(dates.windows(2).all(|w| w[0] < w[1]));

        let labels: Vec<&str> = forecast.days.iter().map(|d| d.day_label.as_str()).collect();
        assert_eq!(labels, vec!["Today", "Tomorrow", "Sunday"]);

        let levels: Vec<StormLevel> = forecast.days.iter().map(|d| d.storm_level).collect();
        assert_eq!(levels, vec![StormLevel::Calm, StormLevel::Minor, StormLevel::Strong]);
        assert_eq!(forecast.current_storm, StormLevel::Calm);
        assert_eq!(forecast.warning, "Geomagnetic conditions are calm");
    }

    #[test]
    fn past_dates_never_appear() {
        let rows = [
            row("2024-05-09 23:00:00", 8.5),
            row("2024-05-10 00:00:00", 2.0),
            row("2024-05-11 03:00:00", 4.0),
        ];
        let forecast = build_forecast(&rows, now(), LOCATION);

        assert_eq!(forecast.days.len(), 2);
        assert!(forecast.days.iter().all(|d| d.date >= now().date()));
        assert!(forecast.days.iter().all(|d| !d.series.values.contains(&8.5)));
        assert_eq!(forecast.current_storm, StormLevel::Calm);
    }

    #[test]
    fn only_stale_rows_gives_fallback() {
        let rows = [row("2024-05-08 12:00:00", 5.0), row("2024-05-09 12:00:00", 6.0)];
        let forecast = build_forecast(&rows, now(), LOCATION);

        assert_eq!(forecast, fallback_forecast(now().date(), LOCATION));
    }

    #[test]
    fn series_keeps_order_and_duplicates() {
        let rows = [
            row("2024-05-11 03:00:00", 2.0),
            row("2024-05-11 03:00:00", 2.5),
            row("2024-05-11 06:00:00", 3.0),
        ];
        let forecast = build_forecast(&rows, now(), LOCATION);

        let day = &forecast.days[0];
        assert_eq!(day.day_label, "Tomorrow");
        assert_eq!(day.series.times, vec!["03:00", "03:00", "06:00"]);
        assert_eq!(day.series.values, vec![2.0, 2.5, 3.0]);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let rows = [
            row("not a timestamp", 9.0),
            row("2024-05-10T12:00:00Z", 9.0),
            ForecastRow { timestamp: "2024-05-10 15:00:00".to_string(), kp_index: None },
            row("2024-05-10 18:00:00", f64::NAN),
            row("2024-05-10 21:00:00", 5.0),
        ];
        let forecast = build_forecast(&rows, now(), LOCATION);

        assert_eq!(forecast.days.len(), 1);
        assert_eq!(forecast.days[0].series.values, vec![5.0]);
        assert_eq!(forecast.current_storm, StormLevel::Minor);
    }

    #[test]
    fn day_labels() {
        let today = now().date();
        assert_eq!(day_label(today, today), "Today");
        assert_eq!(day_label(today.succ_opt().unwrap(), today), "Tomorrow");
        assert_eq!(day_label(NaiveDate::from_ymd_opt(2024, 5, 13).unwrap(), today), "Monday");
    }

    #[test]
    fn empty_series_is_calm() {
        assert_eq!(Series::default().max().map_or(StormLevel::Calm, classify), StormLevel::Calm);
    }

    #[test]
    fn status_without_rows_is_no_data() {
        let status = storm_status(None);
        assert_eq!(status.current_kp, None);
        assert_eq!(status.storm_level, NO_DATA);

        let value = serde_json::to_value(&status).unwrap();
        assert!(value["currentKp"].is_null());
        assert_eq!(value["stormLevel"], "No data");
    }

    #[test]
    fn status_classifies_latest_row() {
        let status = storm_status(Some(row("2020-01-01 00:00:00", 8.0)));
        assert_eq!(status.storm_level, "Very strong storm");
        assert_eq!(status.current_kp.unwrap().timestamp, "2020-01-01 00:00:00");
    }

    #[test]
    fn status_with_null_kp_is_calm() {
        let status = storm_status(Some(ForecastRow { timestamp: "2024-05-10 00:00:00".to_string(), kp_index: None }));
        assert_eq!(status.storm_level, "Calm");
        assert_eq!(status.current_kp.unwrap().kp_index, None);
    }

    #[test]
    fn serialized_shape() {
        let forecast = build_forecast(&[row("2024-05-10 12:00:00", 6.2)], now(), LOCATION);
        let value = serde_json::to_value(&forecast).unwrap();

        assert_eq!(value["currentStorm"], "Moderate storm");
        assert_eq!(value["days"][0]["day"], "Today");
        assert_eq!(value["days"][0]["date"], "10 May");
        assert_eq!(value["days"][0]["stormLevel"], "Moderate storm");
        assert_eq!(value["days"][0]["data"]["values"][0], 6.2);
        assert_eq!(value["days"][0]["data"]["times"][0], "12:00");
    }
}
