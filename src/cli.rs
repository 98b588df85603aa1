// imgpress/src/cli.rs
use crate::core::ServiceConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "imgpress", version, about = "HTTP image resize and optimization service")]
pub struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// Scratch directory for transient input copies
    #[arg(long, default_value = "./input")]
    pub input_dir: PathBuf,

    /// Directory processed files are written to and served from
    #[arg(long, default_value = "./output")]
    pub output_dir: PathBuf,

    /// External base URL used in response locators (defaults to http://HOST:PORT)
    #[arg(long)]
    pub public_url: Option<String>,

    /// Origin allowed by CORS
    #[arg(long, default_value = "http://localhost:3000")]
    pub cors_origin: String,

    /// Maximum accepted upload body size, in MiB
    #[arg(long, default_value_t = 50)]
    pub max_upload_mb: usize,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn to_config(&self) -> ServiceConfig {
        ServiceConfig {
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            public_url: self
                .public_url
                .clone()
                .unwrap_or_else(|| format!("http://{}", self.bind_addr())),
            cors_origin: self.cors_origin.clone(),
            max_upload_bytes: self.max_upload_mb * 1024 * 1024,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_service_defaults() {
        let cli = Cli::parse_from(["imgpress"]);
        let config = cli.to_config();
        assert_eq!(cli.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.public_url, "http://127.0.0.1:5000");
        assert_eq!(config.input_dir, PathBuf::from("./input"));
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn explicit_public_url_wins() {
        let cli = Cli::parse_from(["imgpress", "--public-url", "https://img.example.com"]);
        assert_eq!(cli.to_config().public_url, "https://img.example.com");
    }
}
