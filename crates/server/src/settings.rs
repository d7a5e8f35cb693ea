//! Runtime configuration.
//!
//! CLI arguments (with environment variable fallbacks) are parsed by clap and
//! converted into an explicit [`ServerSettings`] that is passed into the
//! constructors at startup. Compile-time limits live in
//! [`extknowledge_core::config`].

use crate::registry::KnowledgeStore;
use clap::Parser;
use extknowledge_core::config;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "extknowledge", about = "External knowledge retrieval API")]
pub struct Args {
    /// Address to bind
    #[arg(long, env = "EXTKNOWLEDGE_HOST", default_value = config::DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "EXTKNOWLEDGE_PORT", default_value_t = config::DEFAULT_PORT)]
    pub port: u16,

    /// Comma-separated bearer API keys (empty = no auth, dev mode)
    #[arg(long, env = "EXTKNOWLEDGE_API_KEYS", default_value = "")]
    pub api_keys: String,

    /// Base URL of the retrieval server backing the default knowledge base
    #[arg(long, env = "EXTKNOWLEDGE_ENGINE_URL")]
    pub engine_url: Option<String>,

    /// Extra knowledge bases as comma-separated id=url pairs
    #[arg(long, env = "EXTKNOWLEDGE_KNOWLEDGE_BASES")]
    pub knowledge_bases: Option<String>,

    /// Retrieval mode sent to the engine
    #[arg(long, env = "EXTKNOWLEDGE_QUERY_MODE", default_value = config::DEFAULT_QUERY_MODE)]
    pub query_mode: String,

    /// Timeout for a single engine call, in seconds
    #[arg(long, env = "EXTKNOWLEDGE_ENGINE_TIMEOUT_SECS", default_value_t = config::DEFAULT_ENGINE_TIMEOUT_SECS)]
    pub engine_timeout_secs: u64,

    /// Serve passages from a JSON fixture ({"kb_id": ["passage", ...]}) instead of an engine
    #[arg(long, env = "EXTKNOWLEDGE_FIXTURE")]
    pub fixture: Option<PathBuf>,
}

/// Invalid startup configuration.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("port must be > 0")]
    InvalidPort,
    #[error("engine timeout must be > 0 seconds")]
    InvalidEngineTimeout,
    #[error("invalid knowledge base entry '{0}', expected id=url")]
    InvalidKnowledgeBase(String),
    #[error("no knowledge base configured: set --engine-url, --knowledge-bases or --fixture")]
    NoKnowledgeBase,
    #[error("--fixture serves its own knowledge bases; drop --engine-url and --knowledge-bases")]
    FixtureWithEngineStores,
}

/// Where passages come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineSource {
    /// LightRAG-compatible HTTP servers, one endpoint per store.
    Http { mode: String, timeout: Duration },
    /// In-memory fixture file.
    Fixture(PathBuf),
}

/// Validated server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Accepted bearer keys; empty disables authentication.
    pub api_keys: Vec<String>,
    /// Stores registered at startup; the `default` entry comes from `--engine-url`.
    pub knowledge_bases: Vec<KnowledgeStore>,
    pub engine: EngineSource,
}

impl ServerSettings {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        if args.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        let mut knowledge_bases = Vec::new();
        if let Some(url) = args.engine_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            knowledge_bases.push(KnowledgeStore::new(config::DEFAULT_KNOWLEDGE_BASE, url));
        }
        if let Some(ref entries) = args.knowledge_bases {
            knowledge_bases.extend(parse_knowledge_bases(entries)?);
        }

        let engine = match args.fixture {
            Some(path) => {
                if !knowledge_bases.is_empty() {
                    return Err(ConfigError::FixtureWithEngineStores);
                }
                EngineSource::Fixture(path)
            }
            None => {
                if knowledge_bases.is_empty() {
                    return Err(ConfigError::NoKnowledgeBase);
                }
                if args.engine_timeout_secs == 0 {
                    return Err(ConfigError::InvalidEngineTimeout);
                }
                EngineSource::Http {
                    mode: args.query_mode,
                    timeout: Duration::from_secs(args.engine_timeout_secs),
                }
            }
        };

        Ok(Self {
            host: args.host,
            port: args.port,
            api_keys: parse_api_keys(&args.api_keys),
            knowledge_bases,
            engine,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Split a comma-separated key list, dropping blanks.
pub fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `id=url,id=url` into stores.
pub fn parse_knowledge_bases(raw: &str) -> Result<Vec<KnowledgeStore>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, url) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidKnowledgeBase(entry.to_string()))?;
            let (id, url) = (id.trim(), url.trim());
            if id.is_empty() || url.is_empty() {
                return Err(ConfigError::InvalidKnowledgeBase(entry.to_string()));
            }
            Ok(KnowledgeStore::new(id, url))
        })
        .collect()
}
