//! Encoding of raw observations into the classifier's feature vector.
//!
//! The layout below is the contract with the trained model: order and
//! formulas must not change without retraining.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::compass::CompassPoint;
use crate::error::EncodeError;
use crate::model::{FeatureVector, RawObservation};

/// Feature names in the exact order they appear in the vector.
pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = [
    "RainToday",
    "Year",
    "Month",
    "Day",
    "Weekday",
    "Duration",
    "WindGustDir_sin",
    "WindGustDir_cos",
    "WindDir9am_sin",
    "WindDir9am_cos",
    "WindDir3pm_sin",
    "WindDir3pm_cos",
    "MinTemp",
    "MaxTemp",
    "Rainfall",
    "Evaporation",
    "Sunshine",
    "WindGustSpeed",
    "WindSpeed9am",
    "WindSpeed3pm",
    "Humidity9am",
    "Humidity3pm",
    "Pressure9am",
    "Pressure3pm",
    "Cloud9am",
    "Cloud3pm",
    "Temp9am",
    "Temp3pm",
];

pub const FEATURE_COUNT: usize = 28;

/// Reference date for the `Duration` feature.
pub const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2008, 12, 1) {
    Some(date) => date,
    None => panic!("epoch is a valid calendar date"),
};

/// Calendar features derived from the observation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateFeatures {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Monday = 0 … Sunday = 6.
    pub weekday: u32,
    /// Days since [`EPOCH`]; negative before it.
    pub duration_days: i64,
}

/// `Yes` → 1.0, `No` → 0.0. Case-sensitive.
pub fn encode_rain_today(value: &str) -> Result<f64, EncodeError> {
    match value {
        "Yes" => Ok(1.0),
        "No" => Ok(0.0),
        other => Err(EncodeError::InvalidEnum {
            field: None,
            value: other.to_string(),
        }),
    }
}

/// `(sin, cos)` of the compass bearing.
pub fn encode_wind_direction(label: &str) -> Result<(f64, f64), EncodeError> {
    let radians = CompassPoint::try_from(label)?.degrees().to_radians();
    Ok((radians.sin(), radians.cos()))
}

pub fn encode_date(value: &str) -> Result<DateFeatures, EncodeError> {
    let invalid = || EncodeError::InvalidDate {
        value: value.to_string(),
    };

    // chrono alone accepts single-digit months/days and signed years.
    if !has_iso_date_shape(value) {
        return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())?;
    // Proleptic year 0 has no place in the Gregorian calendar the model saw.
    if date.year() < 1 {
        return Err(invalid());
    }

    Ok(DateFeatures {
        year: date.year(),
        month: date.month(),
        day: date.day(),
        weekday: date.weekday().num_days_from_monday(),
        duration_days: date.signed_duration_since(EPOCH).num_days(),
    })
}

fn has_iso_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Encode a full observation, in [`FEATURE_LAYOUT`] order.
pub fn build_feature_vector(raw: &RawObservation) -> Result<FeatureVector, EncodeError> {
    let rain_today = encode_rain_today(&raw.rain_today).map_err(|e| e.for_field("RainToday"))?;
    let date = encode_date(&raw.date)?;
    let (gust_sin, gust_cos) = encode_wind_direction(&raw.wind_gust_direction)
        .map_err(|e| e.for_field("WindGustDirection"))?;
    let (dir9am_sin, dir9am_cos) = encode_wind_direction(&raw.wind_direction_9am)
        .map_err(|e| e.for_field("WindDirection9am"))?;
    let (dir3pm_sin, dir3pm_cos) = encode_wind_direction(&raw.wind_direction_3pm)
        .map_err(|e| e.for_field("WindDirection3pm"))?;

    let mut features = Vec::with_capacity(FEATURE_COUNT);
    features.extend([
        rain_today,
        f64::from(date.year),
        f64::from(date.month),
        f64::from(date.day),
        f64::from(date.weekday),
        date.duration_days as f64,
        gust_sin,
        gust_cos,
        dir9am_sin,
        dir9am_cos,
        dir3pm_sin,
        dir3pm_cos,
    ]);
    features.extend(raw.measurements.values());

    FeatureVector::try_from(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Measurements;

    const EPS: f64 = 1e-12;

    /// Index of the first numeric measurement in the vector.
    const MEASUREMENTS_OFFSET: usize = FEATURE_COUNT - Measurements::FIELDS.len();

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_observation() -> RawObservation {
        RawObservation {
            date: "2024-12-31".into(),
            rain_today: "Yes".into(),
            wind_gust_direction: "E".into(),
            wind_direction_9am: "S".into(),
            wind_direction_3pm: "W".into(),
            measurements: Measurements::from_values(std::array::from_fn(|i| 100.0 + i as f64)),
        }
    }

    #[test]
    fn rain_today_encoding() {
        assert_eq!(encode_rain_today("Yes").unwrap(), 1.0);
        assert_eq!(encode_rain_today("No").unwrap(), 0.0);

        for bad in ["yes", "NO", "", " Yes", "Maybe"] {
            let err = encode_rain_today(bad).unwrap_err();
            assert!(matches!(err, EncodeError::InvalidEnum { .. }), "{bad:?}");
        }
    }

    #[test]
    fn cardinal_directions() {
        let cases = [
            ("N", 0.0, 1.0),
            ("E", 1.0, 0.0),
            ("S", 0.0, -1.0),
            ("W", -1.0, 0.0),
        ];
        for (label, sin, cos) in cases {
            let (s, c) = encode_wind_direction(label).unwrap();
            assert_close(s, sin);
            assert_close(c, cos);
        }
    }

    #[test]
    fn all_directions_match_angle_table() {
        for (i, label) in CompassPoint::labels().enumerate() {
            let angle = (i as f64 * 22.5).to_radians();
            let (s, c) = encode_wind_direction(label).unwrap();
            assert_close(s, angle.sin());
            assert_close(c, angle.cos());
            assert_close(s * s + c * c, 1.0);
        }

        let (s, c) = encode_wind_direction("NE").unwrap();
        assert_close(s, std::f64::consts::FRAC_1_SQRT_2);
        assert_close(c, std::f64::consts::FRAC_1_SQRT_2);
    }

    #[test]
    fn unknown_direction_fails() {
        for bad in ["", "North", "n", "NNNE"] {
            let err = encode_wind_direction(bad).unwrap_err();
            assert!(matches!(err, EncodeError::UnknownDirection { .. }), "{bad:?}");
        }
    }

    #[test]
    fn duration_is_signed_days_from_epoch() {
        assert_eq!(encode_date("2008-12-01").unwrap().duration_days, 0);
        assert_eq!(encode_date("2008-11-30").unwrap().duration_days, -1);
        assert_eq!(encode_date("2009-12-01").unwrap().duration_days, 365);
        assert_eq!(encode_date("2008-01-01").unwrap().duration_days, -335);
        assert_eq!(encode_date("2012-12-01").unwrap().duration_days, 1461);
    }

    #[test]
    fn date_components_and_weekday() {
        let d = encode_date("2024-12-31").unwrap();
        assert_eq!((d.year, d.month, d.day), (2024, 12, 31));
        assert_eq!(d.weekday, 1);

        // 2008-12-01 was a Monday, 2024-12-29 a Sunday.
        assert_eq!(encode_date("2008-12-01").unwrap().weekday, 0);
        assert_eq!(encode_date("2024-12-29").unwrap().weekday, 6);
    }

    #[test]
    fn first_year_of_the_calendar_is_accepted() {
        let d = encode_date("0001-01-01").unwrap();
        assert_eq!((d.year, d.month, d.day), (1, 1, 1));
        assert_eq!(d.weekday, 0);
    }

    #[test]
    fn leap_day_is_accepted_only_in_leap_years() {
        assert!(encode_date("2024-02-29").is_ok());
        assert!(encode_date("2023-02-29").is_err());
    }

    #[test]
    fn malformed_dates_fail() {
        for bad in [
            "31-12-2024",
            "2024/12/31",
            "",
            "2024-1-05",
            "2024-01-5",
            "2024-13-01",
            "2024-00-10",
            "2024-04-31",
            " 2024-12-31",
            "2024-12-31 ",
            "+2024-12-3",
            "2024-12-31T00:00",
            "0000-01-01",
            "0000-12-31",
        ] {
            let err = encode_date(bad).unwrap_err();
            assert!(matches!(err, EncodeError::InvalidDate { .. }), "{bad:?}");
            assert_eq!(err.field(), Some("Date"));
        }
    }

    #[test]
    fn feature_vector_layout() {
        let v = build_feature_vector(&sample_observation()).unwrap();
        let s = v.as_slice();

        assert_eq!(s.len(), FEATURE_COUNT);
        assert_eq!(&s[..6], &[1.0, 2024.0, 12.0, 31.0, 1.0, 5874.0]);
        assert_close(s[6], 1.0);
        assert_close(s[7], 0.0);
        assert_close(s[8], 0.0);
        assert_close(s[9], -1.0);
        assert_close(s[10], -1.0);
        assert_close(s[11], 0.0);

        assert_eq!(MEASUREMENTS_OFFSET, 12);
        for (i, value) in s[MEASUREMENTS_OFFSET..].iter().enumerate() {
            assert_eq!(*value, 100.0 + i as f64);
        }
    }

    #[test]
    fn layout_names_measurements_in_declared_order() {
        assert_eq!(&FEATURE_LAYOUT[MEASUREMENTS_OFFSET..], &Measurements::FIELDS);
    }

    #[test]
    fn numeric_fields_are_never_clamped() {
        let mut obs = sample_observation();
        obs.measurements.min_temp = -40.0;
        obs.measurements.max_temp = 75.5;
        let v = build_feature_vector(&obs).unwrap();
        assert_eq!(v.get(12), Some(-40.0));
        assert_eq!(v.get(13), Some(75.5));
    }

    #[test]
    fn encoding_is_deterministic() {
        let obs = sample_observation();
        let a = build_feature_vector(&obs).unwrap();
        let b = build_feature_vector(&obs).unwrap();

        let bits = |v: &FeatureVector| v.as_slice().iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn errors_name_the_offending_field() {
        let mut obs = sample_observation();
        obs.wind_direction_9am = "SOUTH".into();
        let err = build_feature_vector(&obs).unwrap_err();
        assert_eq!(err.field(), Some("WindDirection9am"));
        assert!(err.to_string().contains("WindDirection9am"));

        let mut obs = sample_observation();
        obs.rain_today = "yes".into();
        let err = build_feature_vector(&obs).unwrap_err();
        assert_eq!(err.field(), Some("RainToday"));

        let mut obs = sample_observation();
        obs.date = "2024/12/31".into();
        let err = build_feature_vector(&obs).unwrap_err();
        assert_eq!(err.field(), Some("Date"));
    }
}
