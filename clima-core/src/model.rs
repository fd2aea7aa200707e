use serde::{Deserialize, Serialize};

/// Provider-accepted location encoding, e.g. `"20.2767,-97.960"` or a
/// place name. Opaque to this crate; the provider validates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinates(String);

impl Coordinates {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self(format!("{lat},{lon}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one weather request: location plus the display name shown
/// above the reading. A changed key supersedes any in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub location: Coordinates,
    pub name: String,
}

impl RequestKey {
    pub fn new(location: Coordinates, name: impl Into<String>) -> Self {
        Self { location, name: name.into() }
    }
}

/// Parsed numeric payload of one successful fetch. Values are taken from
/// the provider response as-is, no unit conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_kmh: f64,
    pub condition_code: i32,
}
