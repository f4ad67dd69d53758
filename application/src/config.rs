//! [`Config`]-related definitions.

use std::{fs, io, path::PathBuf, sync::Arc, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use derive_more::{Display, Error as StdError};
use serde::{de::DeserializeOwned, Deserialize};
use service::domain::Catalog;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Service configuration.
    pub service: Service,

    /// Postgres configuration.
    pub postgres: Postgres,

    /// Redis configuration.
    pub redis: Redis,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// Maximum size of a request body in bytes, large enough for CSV
    /// imports.
    #[default(64 * 1024 * 1024)]
    pub body_limit: usize,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Service configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// Path to the JSON file with the chair search conditions.
    #[default("fixture/chair_condition.json".into())]
    pub chair_catalog: PathBuf,

    /// Path to the JSON file with the estate search conditions.
    #[default("fixture/estate_condition.json".into())]
    pub estate_catalog: PathBuf,

    /// SQL scripts resetting the listings, executed in order.
    ///
    /// Every path must point at an existing file, otherwise initialization
    /// fails.
    #[default(vec!["seed/reset.sql".into(), "seed/listings.sql".into()])]
    pub seed_scripts: Vec<PathBuf>,

    /// Service tasks configuration.
    pub tasks: Tasks,
}

impl Service {
    /// Converts this configuration into a [`service::Config`], loading the
    /// [`Catalog`] files.
    ///
    /// # Errors
    ///
    /// If any [`Catalog`] file cannot be read or parsed.
    pub fn load(self) -> Result<service::Config, CatalogError> {
        let Self {
            chair_catalog,
            estate_catalog,
            seed_scripts,
            tasks: Tasks { fill_estate_ids },
        } = self;

        Ok(service::Config {
            catalog: Arc::new(Catalog {
                chair: load_json(chair_catalog)?,
                estate: load_json(estate_catalog)?,
            }),
            fill_estate_ids: service::task::fill_estate_ids::Config {
                timeout: fill_estate_ids.timeout,
            },
            seed_scripts,
        })
    }
}

/// Loads a JSON file at the provided `path` into a `T`.
///
/// Keys are matched case-sensitively, as written in the file.
fn load_json<T>(path: PathBuf) -> Result<T, CatalogError>
where
    T: DeserializeOwned,
{
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => return Err(CatalogError::Read(path, e)),
    };
    serde_json::from_slice(&bytes).map_err(|e| CatalogError::Parse(path, e))
}

/// Error of loading a [`Catalog`] file.
#[derive(Debug, Display, StdError)]
pub enum CatalogError {
    /// File cannot be read.
    #[display("cannot read `{}`: {_1}", _0.display())]
    Read(PathBuf, #[error(source)] io::Error),

    /// File is not a valid JSON of the expected shape.
    #[display("cannot parse `{}`: {_1}", _0.display())]
    Parse(PathBuf, #[error(source)] serde_json::Error),
}

/// Service tasks configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Tasks {
    /// `FillEstateIds` task configuration.
    pub fill_estate_ids: Task,
}

/// Service task configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Task {
    /// Timeout of a single task job.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

/// Postgres configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Host to connect to.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port to connect to.
    #[default(5432)]
    pub port: u16,

    /// User to connect as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password to connect with.
    #[default("postgres".to_owned())]
    pub password: String,

    /// Database name to connect to.
    #[default("postgres".to_owned())]
    pub dbname: String,
}

impl From<Postgres> for service::infra::postgres::Config {
    fn from(value: Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
        } = value;

        Self {
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            dbname: Some(dbname),
            ..Self::default()
        }
    }
}

/// Redis configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Redis {
    /// URL to connect to.
    ///
    /// The database it points to is flushed on invalidation, so it must be
    /// dedicated to the cache.
    #[default("redis://127.0.0.1:6379/0".to_owned())]
    pub url: String,

    /// Maximum number of pooled connections.
    #[default(16)]
    pub pool_size: usize,
}

impl From<Redis> for service::infra::redis::Config {
    fn from(value: Redis) -> Self {
        let Redis { url, pool_size } = value;

        let mut conf = Self::from_url(url);
        conf.pool = Some(service::infra::redis::PoolConfig::new(pool_size));
        conf
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
