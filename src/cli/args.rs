use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;

use crate::batch::DEFAULT_MAX_DEPTH;
use crate::config::ServerConfig;
use crate::store::StoreConfig;

#[derive(Parser, Debug)]
#[command(name = "embedql", version)]
#[command(about = "Resolve SQL queries embedded in JSON documents against a SQLite database")]
pub struct Args {
    /// SQLite database file, must end with `.db`
    #[arg(value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Same as FILE; takes precedence when both are given
    #[arg(short = 'f', long, env = "EMBEDQL_FILE")]
    pub file: Option<PathBuf>,

    #[arg(short = 'p', long, env = "EMBEDQL_PORT")]
    pub port: u16,

    /// Allowed CORS origin, repeatable; any origin when omitted
    #[arg(short = 'o', long = "origin", env = "EMBEDQL_ORIGIN", value_delimiter = ',')]
    pub origins: Vec<String>,

    #[arg(long, default_value = "0.0.0.0", env = "EMBEDQL_HOST")]
    pub host: String,

    /// Create a missing database file without asking
    #[arg(short = 'y', long)]
    pub yes: bool,

    #[arg(long, default_value_t = 5, env = "EMBEDQL_MAX_CONNECTIONS")]
    pub max_connections: u32,

    /// Deepest container accepted inside a request document
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, env = "EMBEDQL_MAX_DEPTH")]
    pub max_depth: usize,

    /// Give up on a request whose queries take longer than this
    #[arg(long, env = "EMBEDQL_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl Args {
    /// The database file, resolved against `cwd`
    pub fn database_path(&self, cwd: &Path) -> Result<PathBuf> {
        let Some(file) = self.file.as_ref().or(self.path.as_ref()) else {
            bail!("Missing file param");
        };

        if file.extension().and_then(|ext| ext.to_str()) != Some("db") {
            bail!("File must be a .db file: {}", file.display());
        }

        Ok(cwd.join(file))
    }

    pub fn server_config(&self) -> ServerConfig {
        let mut config = ServerConfig::new(self.port)
            .host(&self.host)
            .max_depth(self.max_depth);
        for origin in &self.origins {
            config = config.origin(origin);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.request_timeout(Duration::from_secs(secs));
        }
        config
    }

    pub fn store_config(&self, path: &Path) -> StoreConfig {
        StoreConfig::new(path).max_connections(self.max_connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("embedql").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_positional_file() {
        let args = parse(&["data/app.db", "-p", "8080"]);
        assert_eq!(
            args.database_path(Path::new("/srv")).unwrap(),
            PathBuf::from("/srv/data/app.db")
        );
        assert_eq!(args.server_config().address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_file_flag_wins() {
        let args = parse(&["ignored.db", "--file", "/abs/main.db", "--port", "80"]);
        assert_eq!(
            args.database_path(Path::new("/srv")).unwrap(),
            PathBuf::from("/abs/main.db")
        );
    }

    #[test]
    fn test_file_is_required() {
        let args = parse(&["-p", "8080"]);
        let err = args.database_path(Path::new("/srv")).unwrap_err();
        assert_eq!(err.to_string(), "Missing file param");
    }

    #[test]
    fn test_file_must_be_db() {
        let args = parse(&["notes.txt", "-p", "8080"]);
        assert!(args.database_path(Path::new("/srv")).is_err());
    }

    #[test]
    fn test_port_is_required() {
        assert!(Args::try_parse_from(["embedql", "app.db"]).is_err());
    }

    #[test]
    fn test_server_settings() {
        let args = parse(&[
            "app.db",
            "-p",
            "9000",
            "-o",
            "http://a.test",
            "--origin",
            "http://b.test",
            "--timeout-secs",
            "3",
            "--max-depth",
            "10",
            "--host",
            "127.0.0.1",
        ]);
        let config = args.server_config();

        assert_eq!(config.address(), "127.0.0.1:9000");
        assert_eq!(config.origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.max_depth, 10);
    }

    #[test]
    fn test_store_settings() {
        let args = parse(&["app.db", "-p", "1", "--max-connections", "2"]);
        let config = args.store_config(Path::new("/srv/app.db"));
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.path, PathBuf::from("/srv/app.db"));
    }
}
