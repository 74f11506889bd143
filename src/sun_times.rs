use serde::Serialize;

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SunTimes {
    pub dawn_start: &'static str,
    pub sunrise: &'static str,
    pub solar_noon: &'static str,
    pub sunset: &'static str,
    pub dusk_end: &'static str,
}

const WINTER: SunTimes = SunTimes {
    dawn_start: "07:30",
    sunrise: "08:45",
    solar_noon: "12:30",
    sunset: "16:15",
    dusk_end: "17:30",
};

const SUMMER: SunTimes = SunTimes {
    dawn_start: "04:30",
    sunrise: "05:45",
    solar_noon: "12:30",
    sunset: "19:15",
    dusk_end: "20:30",
};

/// Returns the approximate sun times for a month
///
/// October through February use the winter table, the rest of the year the summer table.
///
/// # Arguments
///
/// * 'month' - month number, 1-12
pub fn sun_times(month: u32) -> SunTimes {
    if month >= 10 || month <= 2 {
        WINTER
    } else {
        SUMMER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_boundaries() {
        assert_eq!(sun_times(10), WINTER);
        assert_eq!(sun_times(1), WINTER);
        assert_eq!(sun_times(2), WINTER);
        assert_eq!(sun_times(3), SUMMER);
        assert_eq!(sun_times(9), SUMMER);
    }

    #[test]
    fn wire_names() {
        let value = serde_json::to_value(sun_times(12)).unwrap();
        assert_eq!(value["dawnStart"], "07:30");
        assert_eq!(value["duskEnd"], "17:30");
        assert_eq!(value["solarNoon"], "12:30");
    }
}
