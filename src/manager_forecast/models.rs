use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use crate::storm_level::StormLevel;

/// A validated Kp reading
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ForecastSample {
    pub timestamp: NaiveDateTime,
    pub kp_index: f64,
}

/// Kp values of one day paired with their time of day, in insertion order
#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct Series {
    pub values: Vec<f64>,
    pub times: Vec<String>,
}

impl Series {
    pub fn push(&mut self, time: String, kp_index: f64) {
        self.times.push(time);
        self.values.push(kp_index);
    }

    /// Highest Kp value in the series, `None` when empty
    ///
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayForecast {
    #[serde(rename = "day")]
    pub day_label: String,
    #[serde(serialize_with = "day_month")]
    pub date: NaiveDate,
    pub storm_level: StormLevel,
    #[serde(rename = "data")]
    pub series: Series,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub location: String,
    pub current_storm: StormLevel,
    pub warning: String,
    pub days: Vec<DayForecast>,
}

#[derive(Serialize, Debug)]
pub struct OldForecastDay {
    pub day: &'static str,
    pub date: String,
    pub kp_index: f64,
    pub storm_level: &'static str,
}

#[derive(Serialize, Debug)]
pub struct OldForecast {
    pub forecast: Vec<OldForecastDay>,
}

/// Serializes a date as e.g. `17 October`
fn day_month<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.format("%d %B").to_string())
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentKp {
    pub timestamp: String,
    pub kp_index: Option<f64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StormStatus {
    pub current_kp: Option<CurrentKp>,
    pub storm_level: String,
}
