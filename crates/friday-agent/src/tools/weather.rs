use super::{required_str, Tool, ToolError};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::{json, Value};
use std::time::Duration;

const WEATHER_TIMEOUT: Duration = Duration::from_secs(10);

/// Current weather for a city, as a one-line summary.
#[derive(Debug, Clone)]
pub struct GetWeather {
    http: reqwest::Client,
    base_url: String,
}

impl GetWeather {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Builds `{base}/{city}?format=3` with the city as one encoded segment.
    fn city_url(&self, city: &str) -> Result<Url, ToolError> {
        let unusable = |reason: String| {
            ToolError::Unavailable(format!(
                "weather endpoint '{}' is unusable: {}",
                self.base_url, reason
            ))
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| unusable(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| unusable("not a base URL".to_string()))?
            .pop_if_empty()
            .push(city);
        url.query_pairs_mut().append_pair("format", "3");
        Ok(url)
    }
}

#[async_trait]
impl Tool for GetWeather {
    fn name(&self) -> &'static str {
        "get_weather"
    }

    fn description(&self) -> &'static str {
        "Get the current weather for a given city."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {"type": "string", "description": "Name of the city"}
            },
            "required": ["city"]
        })
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let city = required_str(&args, "city")?;

        let response = self
            .http
            .get(self.city_url(city)?)
            .timeout(WEATHER_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ToolError::Status(response.status()));
        }

        Ok(response.text().await?.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> GetWeather {
        GetWeather::new(reqwest::Client::new(), "https://wttr.in/")
    }

    #[test]
    fn city_is_a_single_encoded_segment() {
        let cases = [
            ("Berlin", "https://wttr.in/Berlin?format=3"),
            ("Kansas City/MO", "https://wttr.in/Kansas%20City%2FMO?format=3"),
            ("Paris?format=j1", "https://wttr.in/Paris%3Fformat=j1?format=3"),
            ("Foo#bar", "https://wttr.in/Foo%23bar?format=3"),
        ];
        for (city, expected) in cases {
            assert_eq!(tool().city_url(city).unwrap().as_str(), expected);
        }
    }

    #[test]
    fn base_path_is_kept() {
        let tool = GetWeather::new(reqwest::Client::new(), "http://127.0.0.1:8080/weather");
        assert_eq!(
            tool.city_url("Oslo").unwrap().as_str(),
            "http://127.0.0.1:8080/weather/Oslo?format=3"
        );
    }

    #[test]
    fn unparsable_endpoint_is_unavailable() {
        let tool = GetWeather::new(reqwest::Client::new(), "not a url");
        assert!(matches!(
            tool.city_url("Oslo"),
            Err(ToolError::Unavailable(_))
        ));
    }
}
