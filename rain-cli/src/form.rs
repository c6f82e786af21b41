use anyhow::Result;
use inquire::{CustomType, Select, Text, validator::Validation};
use rain_core::{CompassPoint, Measurements, RawObservation, encoder::encode_date};

/// Fields entered with a temperature-style bounded prompt.
const TEMPERATURE_FIELDS: [&str; 4] = ["MinTemp", "MaxTemp", "Temp9am", "Temp3pm"];
const TEMPERATURE_RANGE: (f64, f64) = (-10.0, 50.0);
const TEMPERATURE_DEFAULT: f64 = 20.0;

const DEFAULT_DATE: &str = "2024-12-31";

/// Prompt for every observation field, in the order the model consumes them.
pub fn collect_observation() -> Result<RawObservation> {
    let date = Text::new("Date (YYYY-MM-DD):")
        .with_default(DEFAULT_DATE)
        .with_validator(|s: &str| {
            Ok(match encode_date(s) {
                Ok(_) => Validation::Valid,
                Err(e) => Validation::Invalid(e.to_string().into()),
            })
        })
        .prompt()?;

    let rain_today = Select::new("Rain Today (Yes/No):", vec!["Yes", "No"]).prompt()?;

    let wind_gust_direction = direction("Wind Gust Direction:")?;
    let wind_direction_9am = direction("Wind Direction 9AM:")?;
    let wind_direction_3pm = direction("Wind Direction 3PM:")?;

    let mut values = [0.0; 16];
    for (slot, field) in values.iter_mut().zip(Measurements::FIELDS) {
        *slot = measurement(field)?;
    }

    Ok(RawObservation {
        date,
        rain_today: rain_today.to_string(),
        wind_gust_direction,
        wind_direction_9am,
        wind_direction_3pm,
        measurements: Measurements::from_values(values),
    })
}

fn direction(message: &str) -> Result<String> {
    let labels: Vec<&str> = CompassPoint::labels().collect();
    Ok(Select::new(message, labels).prompt()?.to_string())
}

fn measurement(field: &str) -> Result<f64> {
    let message = format!("{field}:");
    let prompt = CustomType::<f64>::new(&message).with_error_message("Please type a number");

    let value = if TEMPERATURE_FIELDS.contains(&field) {
        let (min, max) = TEMPERATURE_RANGE;
        prompt
            .with_default(TEMPERATURE_DEFAULT)
            .with_help_message("-10 to 50")
            .with_validator(move |v: &f64| {
                Ok(if (min..=max).contains(v) {
                    Validation::Valid
                } else {
                    Validation::Invalid(format!("Must be between {min} and {max}").into())
                })
            })
            .prompt()?
    } else {
        prompt.with_default(0.0).prompt()?
    };

    Ok(value)
}
