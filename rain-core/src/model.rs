use std::fmt;

use serde::{Deserialize, Serialize, ser::SerializeMap};

use crate::encoder::{FEATURE_COUNT, FEATURE_LAYOUT};
use crate::error::EncodeError;

/// One day's observations, as entered by the user.
///
/// Categorical fields stay raw strings; the encoder validates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawObservation {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `Yes` or `No`.
    pub rain_today: String,
    pub wind_gust_direction: String,
    pub wind_direction_9am: String,
    pub wind_direction_3pm: String,
    #[serde(flatten)]
    pub measurements: Measurements,
}

/// The 16 numeric observations, in the order the model consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Measurements {
    pub min_temp: f64,
    pub max_temp: f64,
    pub rainfall: f64,
    pub evaporation: f64,
    pub sunshine: f64,
    pub wind_gust_speed: f64,
    pub wind_speed_9am: f64,
    pub wind_speed_3pm: f64,
    pub humidity_9am: f64,
    pub humidity_3pm: f64,
    pub pressure_9am: f64,
    pub pressure_3pm: f64,
    pub cloud_9am: f64,
    pub cloud_3pm: f64,
    pub temp_9am: f64,
    pub temp_3pm: f64,
}

impl Measurements {
    pub const FIELDS: [&'static str; 16] = [
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

    /// Values in [`Measurements::FIELDS`] order.
    pub fn values(&self) -> [f64; 16] {
        [
            self.min_temp,
            self.max_temp,
            self.rainfall,
            self.evaporation,
            self.sunshine,
            self.wind_gust_speed,
            self.wind_speed_9am,
            self.wind_speed_3pm,
            self.humidity_9am,
            self.humidity_3pm,
            self.pressure_9am,
            self.pressure_3pm,
            self.cloud_9am,
            self.cloud_3pm,
            self.temp_9am,
            self.temp_3pm,
        ]
    }

    /// Build from values in [`Measurements::FIELDS`] order.
    pub fn from_values(v: [f64; 16]) -> Self {
        Self {
            min_temp: v[0],
            max_temp: v[1],
            rainfall: v[2],
            evaporation: v[3],
            sunshine: v[4],
            wind_gust_speed: v[5],
            wind_speed_9am: v[6],
            wind_speed_3pm: v[7],
            humidity_9am: v[8],
            humidity_3pm: v[9],
            pressure_9am: v[10],
            pressure_3pm: v[11],
            cloud_9am: v[12],
            cloud_3pm: v[13],
            temp_9am: v[14],
            temp_3pm: v[15],
        }
    }
}

/// The ordered input to the classifier. Always exactly [`FEATURE_COUNT`] values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// `(name, value)` pairs in layout order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_LAYOUT.iter().copied().zip(self.0.iter().copied())
    }
}

impl TryFrom<Vec<f64>> for FeatureVector {
    type Error = EncodeError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        let actual = values.len();
        <[f64; FEATURE_COUNT]>::try_from(values)
            .map(FeatureVector)
            .map_err(|_| EncodeError::FeatureCountMismatch {
                expected: FEATURE_COUNT,
                actual,
            })
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.named() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prediction {
    NoRain,
    Rain,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Rain => f.write_str("Yes, it will rain tomorrow."),
            Prediction::NoRain => f.write_str("No, it won't rain tomorrow."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_uses_dataset_column_names() {
        let json = r#"{
            "Date": "2024-12-31", "RainToday": "No",
            "WindGustDirection": "W", "WindDirection9am": "NW", "WindDirection3pm": "SSE",
            "MinTemp": 12.5, "MaxTemp": 24.0, "Rainfall": 0.2, "Evaporation": 4.8,
            "Sunshine": 9.1, "WindGustSpeed": 39.0, "WindSpeed9am": 13.0,
            "WindSpeed3pm": 19.0, "Humidity9am": 70.0, "Humidity3pm": 45.0,
            "Pressure9am": 1013.2, "Pressure3pm": 1010.1, "Cloud9am": 3.0,
            "Cloud3pm": 5.0, "Temp9am": 16.4, "Temp3pm": 22.8
        }"#;

        let obs: RawObservation = serde_json::from_str(json).expect("valid observation");
        assert_eq!(obs.wind_direction_3pm, "SSE");
        assert_eq!(obs.measurements.wind_speed_9am, 13.0);
        assert_eq!(obs.measurements.temp_3pm, 22.8);
    }

    #[test]
    fn observation_missing_field_is_rejected() {
        let json = r#"{ "Date": "2024-12-31", "RainToday": "No" }"#;
        assert!(serde_json::from_str::<RawObservation>(json).is_err());
    }

    #[test]
    fn measurement_values_follow_field_order() {
        let values: [f64; 16] = std::array::from_fn(|i| i as f64);
        let m = Measurements::from_values(values);
        assert_eq!(m.evaporation, 3.0);
        assert_eq!(m.cloud_3pm, 13.0);
        assert_eq!(m.values(), values);
    }

    #[test]
    fn feature_vector_rejects_wrong_length() {
        let err = FeatureVector::try_from(vec![0.0; 27]).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::FeatureCountMismatch {
                expected: 28,
                actual: 27
            }
        ));

        assert!(FeatureVector::try_from(vec![0.0; 29]).is_err());
        assert!(FeatureVector::try_from(vec![0.0; 28]).is_ok());
    }

    #[test]
    fn feature_vector_serializes_in_layout_order() {
        let v = FeatureVector::try_from((0..28).map(f64::from).collect::<Vec<_>>())
            .expect("28 values");
        let json = serde_json::to_string(&v).expect("serializable");

        assert!(json.starts_with(r#"{"RainToday":0.0,"Year":1.0"#));
        assert!(json.ends_with(r#""Temp3pm":27.0}"#));
    }

    #[test]
    fn prediction_text() {
        assert_eq!(Prediction::Rain.to_string(), "Yes, it will rain tomorrow.");
        assert_eq!(Prediction::NoRain.to_string(), "No, it won't rain tomorrow.");
    }
}
