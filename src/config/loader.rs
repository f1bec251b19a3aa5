//! Configuration loading from the command line, environment and disk.

use clap::Parser;
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::DevServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Command line arguments.
///
/// Every flag is optional so that a TOML file (or the built-in defaults)
/// can fill in whatever is not given here.
#[derive(Debug, Default, Parser)]
#[command(name = "devrelay")]
#[command(about = "Serve static files and relay an API prefix to an upstream server", long_about = None)]
pub struct Cli {
    /// Port to listen on (default 8080)
    pub port: Option<u16>,

    /// Upstream API base URL
    #[arg(long, env = "ACE_STEP_URL")]
    pub upstream: Option<String>,

    /// Path prefix relayed to the upstream
    #[arg(long)]
    pub prefix: Option<String>,

    /// Directory to serve static files from
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Upstream inactivity timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Layer the arguments over `base`. Unset arguments leave `base` untouched.
    pub fn apply(&self, mut base: DevServerConfig) -> DevServerConfig {
        if let Some(port) = self.port {
            base.listener.port = port;
        }
        if let Some(bind) = self.bind {
            base.listener.bind_address = bind;
        }
        if let Some(upstream) = &self.upstream {
            base.upstream.base_url = upstream.clone();
        }
        if let Some(prefix) = &self.prefix {
            base.upstream.prefix = prefix.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            base.upstream.timeout_secs = timeout;
        }
        if let Some(root) = &self.root {
            base.static_files.root = root.clone();
        }
        if let Some(level) = &self.log_level {
            base.observability.log_level = level.clone();
        }
        base
    }
}

/// Build the effective configuration: defaults, then the optional file,
/// then environment and command line.
pub fn load_from_cli(cli: &Cli) -> Result<DevServerConfig, ConfigError> {
    let base = match &cli.config {
        Some(path) => read_config_file(path)?,
        None => DevServerConfig::default(),
    };

    let config = cli.apply(base);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<DevServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn positional_port_and_flags() {
        let cli = Cli::try_parse_from([
            "devrelay",
            "9000",
            "--upstream",
            "http://127.0.0.1:7000",
            "--prefix",
            "/api/",
        ])
        .unwrap();

        let config = cli.apply(DevServerConfig::default());
        assert_eq!(config.listener.port, 9000);
        assert_eq!(config.upstream.base_url, "http://127.0.0.1:7000");
        assert_eq!(config.upstream.prefix, "/api/");
        assert_eq!(config.upstream.timeout_secs, 600);
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        assert!(Cli::try_parse_from(["devrelay", "eighty"]).is_err());
    }

    #[test]
    fn cli_overrides_file() {
        let root = tempfile::tempdir().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[listener]\nport = 3000\n\n[upstream]\nbase_url = \"http://10.1.1.1:8001\"\ntimeout_secs = 30\n\n[static_files]\nroot = {:?}\n",
            root.path().display().to_string()
        )
        .unwrap();

        let cli = Cli {
            port: Some(4000),
            config: Some(file.path().to_path_buf()),
            ..Cli::default()
        };

        let config = load_from_cli(&cli).unwrap();
        assert_eq!(config.listener.port, 4000);
        assert_eq!(config.upstream.base_url, "http://10.1.1.1:8001");
        assert_eq!(config.upstream.timeout_secs, 30);
    }

    #[test]
    fn missing_file_is_io_error() {
        let cli = Cli {
            config: Some("/no/such/devrelay.toml".into()),
            ..Cli::default()
        };
        let err = load_from_cli(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn https_upstream_is_accepted() {
        let cli = Cli {
            upstream: Some("https://gpu.example:8001".into()),
            root: Some(std::env::temp_dir()),
            ..Cli::default()
        };

        let config = load_from_cli(&cli).unwrap();
        assert_eq!(config.upstream.base_url, "https://gpu.example:8001");
    }

    #[test]
    fn validation_errors_surface() {
        let cli = Cli {
            upstream: Some("ftp://files.example".into()),
            root: Some(std::env::temp_dir()),
            ..Cli::default()
        };

        let err = load_from_cli(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref v) if v.len() == 1));
        assert!(err.to_string().starts_with("Validation failed: "));
    }
}
