//! Layered configuration loading.
//!
//! Sources are merged in this order, later sources overriding earlier ones:
//!
//! 1. the `Default` of the target type (via `#[serde(default)]`)
//! 2. an optional TOML file
//! 3. environment variables named `<PREFIX>__<SECTION>__<KEY>`
//!
//! ```no_run
//! use connect_infra_common::config;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize)]
//! #[serde(default)]
//! struct AppConfig {
//!     verbose: bool,
//! }
//!
//! # fn main() -> connect_infra_common::Result<()> {
//! let app: AppConfig = config::load(None, "MY_APP")?;
//! println!("verbose = {}", app.verbose);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use ::config::builder::DefaultState;
use serde::de::DeserializeOwned;

use crate::errors::{Error, Result};

/// Separator between the prefix, section and key of an environment variable
pub const ENV_SEPARATOR: &str = "__";

/// Load configuration from an optional TOML file plus environment overrides.
///
/// A file that is passed explicitly must exist.
pub fn load<T: DeserializeOwned>(file: Option<&Path>, env_prefix: &str) -> Result<T> {
    let mut builder = Config::builder();
    if let Some(path) = file {
        if !path.exists() {
            return Err(Error::Config(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }
        builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
    }
    finish(builder, env_prefix)
}

/// Load configuration from TOML text plus environment overrides.
pub fn load_from_str<T: DeserializeOwned>(toml: &str, env_prefix: &str) -> Result<T> {
    let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
    finish(builder, env_prefix)
}

fn finish<T: DeserializeOwned>(builder: ConfigBuilder<DefaultState>, env_prefix: &str) -> Result<T> {
    let settings = builder
        .add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        )
        .build()?;

    let loaded = settings.try_deserialize::<T>()?;
    tracing::debug!(env_prefix, "configuration loaded");
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default)]
    struct Sample {
        name: String,
        limit: Option<usize>,
        nested: Nested,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default)]
    struct Nested {
        enabled: bool,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                name: "default".to_string(),
                limit: None,
                nested: Nested::default(),
            }
        }
    }

    impl Default for Nested {
        fn default() -> Self {
            Self { enabled: true }
        }
    }

    #[test]
    fn test_defaults_when_no_sources() {
        let sample: Sample = load(None, "CONNECT_INFRA_TEST_EMPTY").unwrap();
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn test_toml_text_overrides_defaults() {
        let sample: Sample = load_from_str(
            "name = \"edge\"\nlimit = 8\n[nested]\nenabled = false\n",
            "CONNECT_INFRA_TEST_TEXT",
        )
        .unwrap();
        assert_eq!(sample.name, "edge");
        assert_eq!(sample.limit, Some(8));
        assert!(!sample.nested.enabled);
    }

    #[test]
    fn test_toml_file_source() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "name = \"from-file\"").unwrap();

        let sample: Sample = load(Some(file.path()), "CONNECT_INFRA_TEST_FILE").unwrap();
        assert_eq!(sample.name, "from-file");
        assert_eq!(sample.limit, None);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result: Result<Sample> = load(
            Some(Path::new("/definitely/not/here.toml")),
            "CONNECT_INFRA_TEST_MISSING",
        );
        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("not found")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_environment_overrides_file() {
        std::env::set_var("CONNECT_INFRA_TEST_ENV__NAME", "from-env");
        let sample: Sample =
            load_from_str("name = \"from-text\"\n", "CONNECT_INFRA_TEST_ENV").unwrap();
        std::env::remove_var("CONNECT_INFRA_TEST_ENV__NAME");
        assert_eq!(sample.name, "from-env");
    }
}
