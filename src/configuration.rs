use serde_aux::field_attributes::{
    deserialize_number_from_string, deserialize_option_number_from_string,
};
use std::time::Duration;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    #[serde(default)]
    pub map: MapSettings,
    #[serde(default)]
    pub list: ListSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub base_url: String,
    #[serde(default = "default_locations_path")]
    pub locations_path: String,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub timeout_seconds: Option<u64>,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct MapSettings {
    #[serde(
        default = "default_map_zoom",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub zoom: u8,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ListSettings {
    #[serde(default = "default_list_container_id")]
    pub container_id: String,
}

fn default_locations_path() -> String {
    "/locations.json".to_string()
}

fn default_map_zoom() -> u8 {
    11
}

fn default_list_container_id() -> String {
    "locations".to_string()
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom: default_map_zoom(),
        }
    }
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            container_id: default_list_container_id(),
        }
    }
}

impl ApplicationSettings {
    /// Full URL of the locations document.
    pub fn locations_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.locations_path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// The runtime environment for our application.
#[derive(Debug, PartialEq)]
pub enum Environment {
    Local,
    Production,
}
impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Production => "production",
        }
    }
}
impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not supported environment.\
                Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {e}"))
    })?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename))
                .required(false),
        )
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
