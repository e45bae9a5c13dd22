use clap::Parser;

use crate::session::DEFAULT_OUTBOUND_CAPACITY;
use crate::store::DEFAULT_FEED_CAPACITY;

#[derive(Debug, Parser)]
#[command(name = "rtsupport-server")]
#[command(about = "Real-time notification gateway for channels, users and messages")]
#[command(version)]
pub struct Args {
    /// Address to bind to
    #[arg(long, env = "RTSUPPORT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "RTSUPPORT_PORT", default_value_t = 4000)]
    pub port: u16,

    /// Messages buffered per client before new ones are dropped
    #[arg(long, env = "RTSUPPORT_OUTBOUND_CAPACITY", default_value_t = DEFAULT_OUTBOUND_CAPACITY)]
    pub outbound_capacity: usize,

    /// Changes a change feed may fall behind before it is ended
    #[arg(long, env = "RTSUPPORT_FEED_CAPACITY", default_value_t = DEFAULT_FEED_CAPACITY)]
    pub feed_capacity: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RTSUPPORT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub outbound_capacity: usize,
    pub feed_capacity: usize,
}

impl From<Args> for GatewayConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            outbound_capacity: args.outbound_capacity.max(1),
            feed_capacity: args.feed_capacity.max(1),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
            feed_capacity: DEFAULT_FEED_CAPACITY,
        }
    }
}

impl GatewayConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["rtsupport-server"]).unwrap();
        let config = GatewayConfig::from(args);
        assert_eq!(config.listen_addr(), "127.0.0.1:4000");
        assert_eq!(config.outbound_capacity, DEFAULT_OUTBOUND_CAPACITY);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let args = Args::try_parse_from([
            "rtsupport-server",
            "--port",
            "9000",
            "--outbound-capacity",
            "0",
        ])
        .unwrap();
        let config = GatewayConfig::from(args);
        assert_eq!(config.port, 9000);
        assert_eq!(config.outbound_capacity, 1);
    }
}
