use anyhow::{Context, Result, bail};
use clap::Parser;
use std::{env, str::FromStr, time::Duration};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub region: String,
    pub account_id: String,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub max_upload_bytes: usize,
    pub bucket_check_attempts: u32,
    pub backoff_base_ms: u64,
    pub bucket_wait_secs: u64,
}

/// Region and account the provider calls are made against.
///
/// Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub region: String,
    pub account_id: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Static-site bucket provisioning API")]
pub struct Args {
    /// Host to bind to (overrides SITE_BUCKETS_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides SITE_BUCKETS_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Provider region (overrides SITE_BUCKETS_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Account id used to namespace bucket names (overrides SITE_BUCKETS_ACCOUNT_ID)
    #[arg(long)]
    pub account_id: Option<String>,

    /// Custom provider endpoint, e.g. a local S3-compatible server
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long)]
    pub force_path_style: bool,

    /// Largest accepted upload request body in bytes
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Bucket existence checks made before an upload gives up
    #[arg(long)]
    pub bucket_check_attempts: Option<u32>,

    /// Base delay between bucket existence checks, in milliseconds
    #[arg(long)]
    pub backoff_base_ms: Option<u64>,

    /// How long bucket creation waits for the provider to report the bucket
    #[arg(long)]
    pub bucket_wait_secs: Option<u64>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Merge already-parsed CLI args over the environment.
    pub fn from_args(args: Args) -> Result<Self> {
        let account_id = match args.account_id {
            Some(id) => id,
            None => env::var("SITE_BUCKETS_ACCOUNT_ID").unwrap_or_default(),
        };
        let account_id = account_id.trim().to_string();
        if account_id.is_empty() {
            bail!("SITE_BUCKETS_ACCOUNT_ID (or --account-id) must be set");
        }

        let cfg = Self {
            host: args
                .host
                .unwrap_or_else(|| env_string("SITE_BUCKETS_HOST", "0.0.0.0")),
            port: match args.port {
                Some(port) => port,
                None => env_parse("SITE_BUCKETS_PORT", 5000)?,
            },
            region: args
                .region
                .unwrap_or_else(|| env_string("SITE_BUCKETS_REGION", "ap-south-1")),
            account_id,
            endpoint_url: args
                .endpoint_url
                .or_else(|| env::var("SITE_BUCKETS_ENDPOINT_URL").ok())
                .filter(|url| !url.is_empty()),
            force_path_style: args.force_path_style
                || env_parse("SITE_BUCKETS_FORCE_PATH_STYLE", false)?,
            max_upload_bytes: match args.max_upload_bytes {
                Some(limit) => limit,
                None => env_parse("SITE_BUCKETS_MAX_UPLOAD_BYTES", 50 * 1024 * 1024)?,
            },
            bucket_check_attempts: match args.bucket_check_attempts {
                Some(attempts) => attempts,
                None => env_parse("SITE_BUCKETS_BUCKET_CHECK_ATTEMPTS", 10)?,
            },
            backoff_base_ms: match args.backoff_base_ms {
                Some(ms) => ms,
                None => env_parse("SITE_BUCKETS_BACKOFF_BASE_MS", 1000)?,
            },
            bucket_wait_secs: match args.bucket_wait_secs {
                Some(secs) => secs,
                None => env_parse("SITE_BUCKETS_BUCKET_WAIT_SECS", 100)?,
            },
        };

        if cfg.bucket_check_attempts == 0 {
            bail!("bucket check attempts must be at least 1");
        }

        Ok(cfg)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn provider(&self) -> ProviderConfig {
        ProviderConfig {
            region: self.region.clone(),
            account_id: self.account_id.clone(),
        }
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn bucket_wait(&self) -> Duration {
        Duration::from_secs(self.bucket_wait_secs)
    }
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.into())
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", name, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", name)),
    }
}
