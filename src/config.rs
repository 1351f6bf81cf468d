use std::{env, path::PathBuf};

use tracing::{info, warn};

use crate::error::{LookupError, Result};

pub const DEFAULT_GUESTS_CSV: &str = "guests.csv";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub guests_csv: PathBuf,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            guests_csv: PathBuf::from(DEFAULT_GUESTS_CSV),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key → value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            guests_csv: PathBuf::from(try_load(&lookup, "GUESTS_CSV", DEFAULT_GUESTS_CSV)?),
            log_filter: try_load(&lookup, "GUEST_LOOKUP_LOG", DEFAULT_LOG_FILTER)?,
        })
    }

    /// Command-line flags win over the environment
    pub fn with_guests_csv(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.guests_csv = path;
        }
        self
    }
}

fn try_load<F>(lookup: &F, key: &str, default: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if value.trim().is_empty() => {
            warn!("{key} is set but empty");
            Err(LookupError::Config(format!("{key} is empty")))
        }
        Some(value) => Ok(value.trim().to_string()),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(source(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.guests_csv, PathBuf::from("guests.csv"));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_environment_values() {
        let config = Config::from_lookup(source(&[
            ("GUESTS_CSV", " /srv/party/guests.csv "),
            ("GUEST_LOOKUP_LOG", "guest_lookup=debug"),
        ]))
        .unwrap();
        assert_eq!(config.guests_csv, PathBuf::from("/srv/party/guests.csv"));
        assert_eq!(config.log_filter, "guest_lookup=debug");
    }

    #[test]
    fn test_empty_value_is_error() {
        let err = Config::from_lookup(source(&[("GUESTS_CSV", "  ")])).unwrap_err();
        assert!(matches!(err, LookupError::Config(_)));
    }

    #[test]
    fn test_flag_overrides_environment() {
        let config = Config::from_lookup(source(&[("GUESTS_CSV", "env.csv")]))
            .unwrap()
            .with_guests_csv(Some(PathBuf::from("flag.csv")));
        assert_eq!(config.guests_csv, PathBuf::from("flag.csv"));

        let config = Config::default().with_guests_csv(None);
        assert_eq!(config.guests_csv, PathBuf::from("guests.csv"));
    }

    #[test]
    fn test_defaults_and_empty_values_are_logged() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            Config::from_lookup(source(&[("GUEST_LOOKUP_LOG", "debug")])).unwrap();
            Config::from_lookup(source(&[("GUESTS_CSV", "")])).unwrap_err();
        });

        let logs = captured.text();
        assert!(logs.contains("GUESTS_CSV not set, using default: guests.csv"));
        assert!(logs.contains("GUESTS_CSV is set but empty"));
        assert!(!logs.contains("GUEST_LOOKUP_LOG not set"));
    }
}
