use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::jobs::JobDelays;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub jobs: JobsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    /// Built frontend to serve for non-API paths.
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct JobsConfig {
    pub epub_delay_secs: u64,
    pub export_pdf_delay_secs: u64,
    pub import_delay_secs: u64,
}

impl JobsConfig {
    pub fn delays(&self) -> JobDelays {
        JobDelays {
            epub: Duration::from_secs(self.epub_delay_secs),
            export_pdf: Duration::from_secs(self.export_pdf_delay_secs),
            import: Duration::from_secs(self.import_delay_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("unknown log format '{}', expected pretty or json", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Directory for daily rotated log files, in addition to stdout.
    pub dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 3000,
                host: "0.0.0.0".to_string(),
                cors_allowed_origins: vec!["*".to_string()],
                static_dir: None,
            },
            jobs: JobsConfig {
                epub_delay_secs: 10,
                export_pdf_delay_secs: 25,
                import_delay_secs: 60,
            },
            logging: LoggingConfig {
                format: LogFormat::Pretty,
                dir: None,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source, falling back to defaults
    /// for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            server: ServerConfig {
                port: parse_or(&lookup, "PORT", defaults.server.port)?,
                host: lookup("HOST").unwrap_or(defaults.server.host),
                cors_allowed_origins: lookup("ALLOWED_ORIGINS")
                    .map(|origins| {
                        origins
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or(defaults.server.cors_allowed_origins),
                static_dir: lookup("STATIC_DIR")
                    .filter(|dir| !dir.is_empty())
                    .map(PathBuf::from),
            },
            jobs: JobsConfig {
                epub_delay_secs: parse_or(
                    &lookup,
                    "EXPORT_EPUB_DELAY_SECS",
                    defaults.jobs.epub_delay_secs,
                )?,
                export_pdf_delay_secs: parse_or(
                    &lookup,
                    "EXPORT_PDF_DELAY_SECS",
                    defaults.jobs.export_pdf_delay_secs,
                )?,
                import_delay_secs: parse_or(
                    &lookup,
                    "IMPORT_DELAY_SECS",
                    defaults.jobs.import_delay_secs,
                )?,
            },
            logging: LoggingConfig {
                format: parse_or(&lookup, "LOG_FORMAT", defaults.logging.format)?,
                dir: lookup("LOG_DIR")
                    .filter(|dir| !dir.is_empty())
                    .map(PathBuf::from),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| anyhow::anyhow!("{}", e))
            .with_context(|| format!("invalid value for {}: '{}'", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.cors_allowed_origins, vec!["*"]);
        assert!(config.server.static_dir.is_none());
        assert_eq!(config.jobs.delays(), JobDelays::default());
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("ALLOWED_ORIGINS", "http://a.test, http://b.test"),
            ("STATIC_DIR", "dist"),
            ("EXPORT_EPUB_DELAY_SECS", "1"),
            ("IMPORT_DELAY_SECS", "2"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors_allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.server.static_dir, Some(PathBuf::from("dist")));
        assert_eq!(config.jobs.delays().epub, Duration::from_secs(1));
        assert_eq!(config.jobs.delays().export_pdf, Duration::from_secs(25));
        assert_eq!(config.jobs.delays().import, Duration::from_secs(2));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_value_names_the_variable() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(format!("{:#}", err).contains("PORT"));
    }
}
