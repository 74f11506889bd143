use chrono::NaiveDate;
use crate::manager_forecast::models::{DayForecast, ForecastResponse, OldForecast, OldForecastDay, Series};
use crate::storm_level::StormLevel;

pub const FALLBACK_WARNING: &str = "Data updating";

const FALLBACK_TIMES: [&str; 8] = ["06:00", "09:00", "12:00", "15:00", "18:00", "21:00", "00:00", "03:00"];

const FALLBACK_DAYS: [(&str, [f64; 8]); 2] = [
    ("Today", [3.0, 4.0, 5.0, 4.0, 3.0, 4.0, 3.0, 4.0]),
    ("Tomorrow", [4.0, 3.0, 4.0, 5.0, 4.0, 3.0, 4.0, 3.0]),
];

/// Placeholder forecast served when no usable data exists
///
/// # Arguments
///
/// * 'today' - date of the first placeholder day
/// * 'location' - location label
pub fn fallback_forecast(today: NaiveDate, location: &str) -> ForecastResponse {
    let mut date = today;
    let mut days: Vec<DayForecast> = Vec::with_capacity(FALLBACK_DAYS.len());

    for (label, values) in FALLBACK_DAYS {
        days.push(DayForecast {
            day_label: label.to_string(),
            date,
            storm_level: StormLevel::Weak,
            series: Series {
                values: values.to_vec(),
                times: FALLBACK_TIMES.iter().map(|t| t.to_string()).collect(),
            },
        });
        date = date.succ_opt().unwrap_or(date);
    }

    ForecastResponse {
        location: location.to_string(),
        current_storm: StormLevel::Weak,
        warning: FALLBACK_WARNING.to_string(),
        days,
    }
}

/// Fixed two day forecast kept for clients of the old API
///
/// # Arguments
///
/// * 'today' - date of the first day
pub fn old_forecast(today: NaiveDate) -> OldForecast {
    let tomorrow = today.succ_opt().unwrap_or(today);

    OldForecast {
        forecast: vec![
            OldForecastDay {
                day: "today",
                date: today.format("%Y-%m-%d").to_string(),
                kp_index: 3.0,
                storm_level: "calm",
            },
            OldForecastDay {
                day: "tomorrow",
                date: tomorrow.format("%Y-%m-%d").to_string(),
                kp_index: 5.0,
                storm_level: "weak",
            },
        ],
    }
}
