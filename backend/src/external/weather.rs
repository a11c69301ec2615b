//! Weather API client for fetching rainfall and temperature
//!
//! Integrates with the OpenWeatherMap 5 day / 3 hour forecast API. The forecast
//! slots are folded into the 24h and 72h rainfall totals the evaluator needs.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use shared::{GpsCoordinates, WeatherConditions};
use thiserror::Error;

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Forecast slots covering 24 hours
pub const SLOTS_PER_24H: usize = 8;

/// Forecast slots covering 72 hours
pub const SLOTS_PER_72H: usize = 24;

/// Failures reported by the weather collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    #[error("weather service unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected weather response: {0}")]
    InvalidResponse(String),

    #[error("no forecast available for {0}")]
    NoForecastForDate(NaiveDate),
}

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// One 3-hour forecast slot
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSlot {
    pub timestamp: DateTime<Utc>,
    pub temperature_celsius: f64,
    pub rain_3h_mm: f64,
}

/// OpenWeatherMap API response for forecast
#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    #[serde(default)]
    list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    dt: i64,
    main: OWMMain,
    rain: Option<OWMForecastRain>,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OWMForecastRain {
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

impl WeatherClient {
    /// Create a new WeatherClient
    pub fn new(api_key: String, timeout: Duration) -> reqwest::Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), timeout)
    }

    /// Create a new WeatherClient with custom base URL (for testing)
    pub fn with_base_url(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url,
        })
    }

    /// Fetch the 3-hourly forecast by GPS coordinates
    pub async fn get_forecast(
        &self,
        location: GpsCoordinates,
    ) -> Result<Vec<ForecastSlot>, WeatherError> {
        let url = format!("{}/forecast", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", location.latitude.to_string()),
                ("lon", location.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            // The URL carries the API key
            .map_err(|e| WeatherError::Unavailable(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Unavailable(format!(
                "weather API returned {}",
                status
            )));
        }

        let data: OWMForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidResponse(e.without_url().to_string()))?;

        convert_forecast_response(data)
    }
}

#[axum::async_trait]
impl WeatherProvider for WeatherClient {
    async fn conditions(
        &self,
        location: GpsCoordinates,
        date: NaiveDate,
    ) -> Result<WeatherConditions, WeatherError> {
        let forecast = self.get_forecast(location).await?;
        aggregate_forecast(&forecast, date)
    }
}

/// Convert OpenWeatherMap forecast response to our format
fn convert_forecast_response(data: OWMForecastResponse) -> Result<Vec<ForecastSlot>, WeatherError> {
    data.list
        .into_iter()
        .map(|item| {
            let timestamp = DateTime::from_timestamp(item.dt, 0).ok_or_else(|| {
                WeatherError::InvalidResponse(format!("invalid forecast timestamp {}", item.dt))
            })?;
            Ok(ForecastSlot {
                timestamp,
                temperature_celsius: item.main.temp,
                rain_3h_mm: item.rain.and_then(|r| r.three_hour).unwrap_or(0.0),
            })
        })
        .collect()
}

/// Fold forecast slots into the readings for `date`
///
/// The first slot falling on `date` (UTC) anchors the window: its temperature
/// is reported, and rain is summed over the next 8 and 24 slots (the anchor
/// included). Windows running past the end of the forecast are truncated.
///
/// The forecast starts at the next 3-hour boundary, so late in the day (or
/// for a user behind UTC) the requested date can be the day before the first
/// slot. That date anchors on the first slot.
pub fn aggregate_forecast(
    slots: &[ForecastSlot],
    date: NaiveDate,
) -> Result<WeatherConditions, WeatherError> {
    let anchor = slots
        .iter()
        .position(|slot| slot.timestamp.date_naive() == date)
        .or_else(|| {
            let first = slots.first()?.timestamp.date_naive();
            (date.succ_opt() == Some(first)).then_some(0)
        })
        .ok_or(WeatherError::NoForecastForDate(date))?;

    let rain_over = |count: usize| -> f64 {
        slots[anchor..]
            .iter()
            .take(count)
            .map(|slot| slot.rain_3h_mm.max(0.0))
            .sum()
    };

    Ok(WeatherConditions {
        rainfall_24h_mm: rain_over(SLOTS_PER_24H),
        rainfall_72h_mm: rain_over(SLOTS_PER_72H),
        temperature_celsius: slots[anchor].temperature_celsius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slots(start: DateTime<Utc>, rain: &[f64]) -> Vec<ForecastSlot> {
        rain.iter()
            .enumerate()
            .map(|(i, mm)| ForecastSlot {
                timestamp: start + chrono::Duration::hours(3 * i as i64),
                temperature_celsius: 20.0 + i as f64,
                rain_3h_mm: *mm,
            })
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_aggregate_anchors_on_first_slot_of_date() {
        // Forecast starts at 18:00 on May 1, so May 2 begins at slot 2
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap();
        let forecast = slots(start, &[9.0; 40]);

        let conditions = aggregate_forecast(&forecast, date(2024, 5, 2)).unwrap();
        assert_eq!(conditions.temperature_celsius, 22.0);
        assert_eq!(conditions.rainfall_24h_mm, 72.0);
        assert_eq!(conditions.rainfall_72h_mm, 216.0);
    }

    #[test]
    fn test_aggregate_truncates_at_end_of_forecast() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let forecast = slots(start, &[1.0, 2.0, 0.0, 3.0]);

        let conditions = aggregate_forecast(&forecast, date(2024, 5, 1)).unwrap();
        assert_eq!(conditions.rainfall_24h_mm, 6.0);
        assert_eq!(conditions.rainfall_72h_mm, 6.0);
        assert_eq!(conditions.temperature_celsius, 20.0);
    }

    #[test]
    fn test_aggregate_day_before_forecast_start_uses_first_slot() {
        // After 21:00 UTC the forecast already starts on the next day
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let forecast = slots(start, &[2.0; 40]);

        let conditions = aggregate_forecast(&forecast, date(2024, 5, 1)).unwrap();
        assert_eq!(conditions.temperature_celsius, 20.0);
        assert_eq!(conditions.rainfall_24h_mm, 16.0);
        assert_eq!(conditions.rainfall_72h_mm, 48.0);

        assert_eq!(
            aggregate_forecast(&forecast, date(2024, 4, 30)),
            Err(WeatherError::NoForecastForDate(date(2024, 4, 30)))
        );
    }

    #[test]
    fn test_aggregate_date_outside_forecast() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let forecast = slots(start, &[1.0; 8]);

        assert_eq!(
            aggregate_forecast(&forecast, date(2024, 5, 9)),
            Err(WeatherError::NoForecastForDate(date(2024, 5, 9)))
        );
        assert!(aggregate_forecast(&[], date(2024, 5, 1)).is_err());
    }

    #[test]
    fn test_convert_missing_rain_is_zero() {
        let data: OWMForecastResponse = serde_json::from_str(
            r#"{
                "cod": "200",
                "list": [
                    {"dt": 1714521600, "main": {"temp": 18.5}, "dt_txt": "2024-05-01 00:00:00"},
                    {"dt": 1714532400, "main": {"temp": 17.0}, "rain": {"3h": 4.2}, "dt_txt": "2024-05-01 03:00:00"}
                ]
            }"#,
        )
        .unwrap();

        let forecast = convert_forecast_response(data).unwrap();
        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast[0].rain_3h_mm, 0.0);
        assert_eq!(forecast[1].rain_3h_mm, 4.2);
        assert_eq!(forecast[0].timestamp.date_naive(), date(2024, 5, 1));
    }
}
