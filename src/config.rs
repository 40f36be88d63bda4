//! Configuration profiles, read from ~/.config/sedbuilder.yaml.

use std::{
    collections::BTreeMap,
    env,
    fs::File,
    io,
    path::{Path, PathBuf},
    time,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The public SED Builder deployment.
pub const DEFAULT_API_ENDPOINT: &str = "https://tools.ssdc.asi.it";

/// An error encountered while loading or resolving a configuration profile.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The config file exists but could not be read.
    #[error("Failed to load config file")]
    Io(#[from] io::Error),
    /// The config file is not valid YAML, or has the wrong shape.
    #[error("Invalid configuration")]
    Invalid(#[from] serde_yaml::Error),
    /// The requested profile is not in the config file.
    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),
    /// The timeout is not a whole number of seconds.
    #[error("Invalid timeout: {0:?}")]
    InvalidTimeout(String),
    /// The API endpoint is not a valid URI.
    #[error("Invalid URI")]
    InvalidUri(#[from] http::uri::InvalidUri),
}

/// A fully resolved configuration profile for talking to the SED Builder
/// service.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    /// The name of the profile.
    pub name: String,
    /// The base URL of the service. Any path component is kept as a prefix
    /// for request paths.
    #[serde(serialize_with = "serialize_uri")]
    pub api_endpoint: http::Uri,
    /// Global timeout for a single request, if any.
    #[serde(
        rename = "timeout",
        serialize_with = "serialize_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<time::Duration>,
    /// The user-agent used on requests. Intended for internal use.
    #[serde(skip)]
    pub user_agent: String,
    /// The config file this profile was loaded from, or the canonical one if
    /// no config file exists.
    #[serde(skip)]
    pub config_path: PathBuf,
}

/// A profile stored in the config file.
#[derive(Debug, Default, Clone, Deserialize)]
struct ConfigProfile {
    api_endpoint: Option<String>,
    timeout: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct Config {
    #[serde(default)]
    profiles: BTreeMap<String, ConfigProfile>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "default".to_owned(),
            api_endpoint: http::Uri::from_static(DEFAULT_API_ENDPOINT),
            timeout: None,
            user_agent: make_ua(None),
            config_path: PathBuf::new(),
        }
    }
}

impl Profile {
    /// Load the active profile from the configuration file (usually
    /// ~/.config/sedbuilder.yaml), with overrides from the environment.
    ///
    /// If `SEDBUILDER_PROFILE` is set, that will be used to select the
    /// profile. Otherwise the profile `default` will be used.
    ///
    /// See [Profile::from_env] for the recognized environment variables.
    pub fn from_default_env() -> Result<Self, Error> {
        if let Ok(s) = env::var("SEDBUILDER_PROFILE") {
            Self::from_env(&s)
        } else {
            Self::from_env("default")
        }
    }

    /// Load the given profile from the configuration file (usually
    /// ~/.config/sedbuilder.yaml). If no configuration file is present, then
    /// the configuration will be loaded solely from the environment, falling
    /// back to the public service.
    ///
    /// The following environment variables can override the corresponding
    /// values in the config file:
    ///
    /// | Environment Variable      | Config Value   |
    /// |---------------------------|----------------|
    /// | `SEDBUILDER_API_ENDPOINT` | `api_endpoint` |
    /// | `SEDBUILDER_TIMEOUT`      | `timeout`      |
    pub fn from_env(name: &str) -> Result<Self, Error> {
        let api_endpoint = env::var("SEDBUILDER_API_ENDPOINT").ok();
        let timeout = match env::var("SEDBUILDER_TIMEOUT") {
            Ok(s) => Some(s.parse().map_err(|_| Error::InvalidTimeout(s))?),
            Err(_) => None,
        };

        let config_path = find_config()?;
        let profile = match read_profile(&config_path, name) {
            Ok(p) => p,
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no config file found");
                Default::default()
            }
            // An empty config is fine, as long as nothing specific was asked for.
            Err(Error::ProfileNotFound(_)) if name == "default" => Default::default(),
            Err(e) => return Err(e),
        };

        let raw = ConfigProfile {
            api_endpoint: api_endpoint.or(profile.api_endpoint),
            timeout: timeout.or(profile.timeout),
        };

        Self::from_raw(raw, name.to_owned(), config_path)
    }

    /// Modifies the user-agent to have a different prefix. Intended for
    /// internal use.
    #[doc(hidden)]
    pub fn with_ua_product(self, ua_product: &str) -> Self {
        Self {
            user_agent: make_ua(Some(ua_product)),
            ..self
        }
    }

    /// Replace the request timeout.
    pub fn with_timeout(self, timeout: Option<time::Duration>) -> Self {
        Self { timeout, ..self }
    }

    /// Iterate through all profiles in the configuration file (usually
    /// ~/.config/sedbuilder.yaml). Does not read any environment variables.
    pub fn load_all() -> Result<impl Iterator<Item = Self>, Error> {
        let path = find_config()?;
        Self::read_all(path)
    }

    /// Load the given profile (or 'default') from the given file, which must
    /// be a valid configuration file. Does not read any environment
    /// variables.
    ///
    /// Usually, you will want to use [Profile::from_env] instead.
    pub fn read(path: impl AsRef<Path>, name: Option<&str>) -> Result<Self, Error> {
        let path = path.as_ref();
        let name = name.unwrap_or("default").to_owned();
        let profile = read_profile(path, &name)?;
        Self::from_raw(profile, name, path.to_owned())
    }

    /// Read all profiles from the given file, which must be a valid
    /// configuration file. Does not read any environment variables.
    pub fn read_all(path: impl AsRef<Path>) -> Result<impl Iterator<Item = Self>, Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;

        let profiles: Result<Vec<_>, Error> = config
            .profiles
            .into_iter()
            .map(|(name, raw)| Profile::from_raw(raw, name, path.to_owned()))
            .collect();

        Ok(profiles?.into_iter())
    }

    fn from_raw(raw: ConfigProfile, name: String, path: PathBuf) -> Result<Self, Error> {
        let ConfigProfile {
            api_endpoint,
            timeout,
        } = raw;

        let api_endpoint = api_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_API_ENDPOINT)
            .parse()?;

        Ok(Self {
            name,
            api_endpoint,
            // Zero means no timeout, same as leaving it out.
            timeout: timeout
                .filter(|&secs| secs > 0)
                .map(time::Duration::from_secs),
            user_agent: make_ua(None),
            config_path: path,
        })
    }
}

/// The canonical config location, or the first fallback that exists.
pub fn find_config() -> Result<PathBuf, Error> {
    let Some(home) = env::home_dir() else {
        return Err(Error::Io(io::Error::other(
            "No $HOME found for the current user",
        )));
    };

    let canonical = home.join(".config/sedbuilder.yaml");
    if canonical.exists() {
        return Ok(canonical);
    }

    // Try some fallback paths, and if that doesn't work, return the canonical
    // location.
    for fallback in [
        ".config/sedbuilder.yml",
        ".sedbuilder/config.yaml",
        ".sedbuilder/config.yml",
    ] {
        let path = home.join(fallback);
        if path.exists() {
            return Ok(path);
        }
    }

    Ok(canonical)
}

fn read_profile(p: &Path, name: &str) -> Result<ConfigProfile, Error> {
    let file = File::open(p)?;
    let config: Option<Config> = serde_yaml::from_reader(file).map_err(Error::Invalid)?;
    let Some(config_profile) = config.unwrap_or_default().profiles.remove(name) else {
        return Err(Error::ProfileNotFound(name.to_string()));
    };

    debug!(path = %p.display(), "loaded config file");

    Ok(config_profile)
}

fn make_ua(product: Option<&str>) -> String {
    format!(
        "{}/{}",
        product.unwrap_or("sedbuilder-rs"),
        env!("CARGO_PKG_VERSION")
    )
}

fn serialize_uri<S: serde::Serializer>(uri: &http::Uri, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(uri)
}

fn serialize_secs<S: serde::Serializer>(
    timeout: &Option<time::Duration>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match timeout {
        Some(d) => s.serialize_u64(d.as_secs()),
        None => s.serialize_none(),
    }
}
