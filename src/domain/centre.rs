use thiserror::Error;

/// Geographic centre of a location.
///
/// On the wire this is a `[latitude, longitude]` pair, the order the map
/// view expects. Values are passed to the map as published; only
/// non-finite numbers are refused.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centre {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Error)]
pub enum CentreError {
    #[error("Coordinates must be finite numbers, got [{0}, {1}]")]
    NotFinite(f64, f64),
}

impl Centre {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CentreError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CentreError::NotFinite(latitude, longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Both coordinates as tuple (latitude, longitude)
    pub fn components(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

impl std::fmt::Display for Centre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl serde::Serialize for Centre {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        [self.latitude, self.longitude].serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Centre {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let [latitude, longitude] = <[f64; 2]>::deserialize(deserializer)?;
        Centre::new(latitude, longitude).map_err(serde::de::Error::custom)
    }
}
