use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::converter::ConverterConfig;
use crate::fonts::FontsConfig;
use crate::pipeline::PipelineConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub fonts: FontsConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.converter.convert_timeout_secs, 60);
        assert_eq!(config.fonts.download_timeout_secs, 30);
        assert_eq!(config.pipeline.probe_timeout_secs, 10);
    }

    #[test]
    fn test_deserialize_server_section() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_deserialize_converter_section() {
        let toml = r#"
[converter]
soffice_path = "/opt/libreoffice/soffice"
convert_timeout_secs = 120
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.converter.soffice_path.as_ref().unwrap().to_str(),
            Some("/opt/libreoffice/soffice")
        );
        assert_eq!(config.converter.convert_timeout_secs, 120);
        // Unspecified fields keep their defaults
        assert_eq!(config.converter.download_timeout_secs, 60);
    }

    #[test]
    fn test_deserialize_fonts_and_pipeline_sections() {
        let toml = r#"
[fonts]
cache_dir = "/var/cache/pressa/fonts"
install_dir = "/usr/share/fonts/pressa"

[pipeline]
output_dir = "/var/lib/pressa/output"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.fonts.cache_dir.to_str(),
            Some("/var/cache/pressa/fonts")
        );
        assert_eq!(
            config.fonts.install_dir.as_ref().unwrap().to_str(),
            Some("/usr/share/fonts/pressa")
        );
        assert_eq!(
            config.pipeline.output_dir.to_str(),
            Some("/var/lib/pressa/output")
        );
    }
}
