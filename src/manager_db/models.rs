use serde::Serialize;
use serde_with::skip_serializing_none;

/// One row of the forecast table as stored, before any parsing
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRow {
    pub timestamp: String,
    pub kp_index: Option<f64>,
}

#[skip_serializing_none]
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    pub tables: Vec<String>,
    pub forecast_count: Option<i64>,
    pub last5: Option<Vec<ForecastRow>>,
    pub error: Option<String>,
}
