use clap::Parser;
use nazoru::predictor::LoadPolicy;
use nazoru::{PredictError, DEFAULT_TOP_N};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::logging::LogFormat;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: String,
    pub graph_path: Option<PathBuf>,
    pub top_n: usize,
    pub max_body_bytes: usize,
    pub load_policy: LoadPolicy,
    pub cache_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
            graph_path: None,
            top_n: DEFAULT_TOP_N,
            max_body_bytes: 65_536,
            load_policy: LoadPolicy::Shared,
            cache_capacity: 0,
        }
    }
}

impl ServerConfig {
    /// Check the configuration and return the address to bind.
    pub fn validate(&self) -> Result<SocketAddr, PredictError> {
        if self.top_n == 0 {
            return Err(PredictError::configuration("top_n must be at least 1"));
        }
        if self.max_body_bytes == 0 {
            return Err(PredictError::configuration(
                "max_body_bytes must be at least 1",
            ));
        }
        self.listen.parse().map_err(|e| {
            PredictError::configuration(format!("invalid listen address {:?}: {e}", self.listen))
        })
    }
}

#[derive(Debug, Parser)]
#[command(name = "nazoru-server")]
#[command(about = "Keystroke-to-character prediction HTTP service")]
pub struct ServerArgs {
    #[arg(long, env = "NAZORU_LISTEN", default_value = "127.0.0.1:8080")]
    pub listen: String,

    /// Model artifact. Falls back to NAZORU_GRAPH_PATH, then data/nazoru.graph.json.
    #[arg(long)]
    pub graph_path: Option<PathBuf>,

    /// Maximum number of candidates per response
    #[arg(long, env = "NAZORU_TOP_N", default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    #[arg(long, env = "NAZORU_MAX_BODY_BYTES", default_value_t = 65_536)]
    pub max_body_bytes: usize,

    /// "shared" loads the model once; "per-request" re-reads it on every call
    #[arg(long, env = "NAZORU_LOAD_POLICY", default_value = "shared")]
    pub load_policy: LoadPolicy,

    /// Cached prediction outcomes; 0 disables the cache
    #[arg(long, env = "NAZORU_CACHE_CAPACITY", default_value_t = 0)]
    pub cache_capacity: usize,

    #[arg(long, default_value = "info")]
    pub log: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl From<&ServerArgs> for ServerConfig {
    fn from(args: &ServerArgs) -> Self {
        Self {
            listen: args.listen.clone(),
            graph_path: args.graph_path.clone(),
            top_n: args.top_n,
            max_body_bytes: args.max_body_bytes,
            load_policy: args.load_policy,
            cache_capacity: args.cache_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let addr = ServerConfig::default().validate().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn zero_top_n_rejected() {
        let cfg = ServerConfig {
            top_n: 0,
            ..ServerConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(PredictError::Configuration(_))
        ));
    }

    #[test]
    fn bad_listen_address_rejected() {
        let cfg = ServerConfig {
            listen: "localhost".to_string(),
            ..ServerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn args_map_onto_config() {
        let args = ServerArgs::try_parse_from([
            "nazoru-server",
            "--listen",
            "0.0.0.0:9000",
            "--graph-path",
            "/srv/graph.json",
            "--top-n",
            "3",
            "--load-policy",
            "per-request",
            "--cache-capacity",
            "128",
        ])
        .unwrap();

        let cfg = ServerConfig::from(&args);
        assert_eq!(cfg.listen, "0.0.0.0:9000");
        assert_eq!(cfg.graph_path, Some(PathBuf::from("/srv/graph.json")));
        assert_eq!(cfg.top_n, 3);
        assert_eq!(cfg.load_policy, LoadPolicy::PerRequest);
        assert_eq!(cfg.cache_capacity, 128);
    }

    #[test]
    fn unknown_load_policy_rejected_by_cli() {
        let parsed = ServerArgs::try_parse_from(["nazoru-server", "--load-policy", "lazy"]);
        assert!(parsed.is_err());
    }
}
