use clap::Parser;
use std::net::SocketAddr;

/// Runtime settings. Every flag can also come from the environment or a `.env` file.
#[derive(Debug, Clone, Parser)]
#[command(name = "seat_distributor")]
#[command(about = "Distributes students from a spreadsheet into exam rooms", long_about = None)]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, env = "SEAT_DISTRIBUTOR_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Default log filter, used when RUST_LOG is not set
    #[arg(long, env = "SEAT_DISTRIBUTOR_LOG", default_value = "info")]
    pub log_level: String,

    /// Fixed shuffle seed; every run with the same input gives the same rooms
    #[arg(long, env = "SEAT_DISTRIBUTOR_SEED")]
    pub seed: Option<u64>,

    /// Largest accepted workbook upload, in megabytes
    #[arg(long, env = "SEAT_DISTRIBUTOR_MAX_UPLOAD_MB", default_value_t = 16)]
    pub max_upload_mb: usize,
}

impl Config {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_level: "info".to_string(),
            seed: None,
            max_upload_mb: 16,
        }
    }
}
