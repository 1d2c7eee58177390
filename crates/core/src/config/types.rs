use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub muxer: MuxerConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    /// Outgoing mail for contact/feedback notifications. Disabled when absent.
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the static HTML pages.
    #[serde(default = "default_pages_dir")]
    pub pages_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            pages_dir: default_pages_dir(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

fn default_pages_dir() -> PathBuf {
    PathBuf::from("web")
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("fetchflicks.db")
}

/// Download orchestration settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadConfig {
    /// Root under which every request gets its own scratch directory.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    /// Age after which the sweeper removes a leftover scratch directory.
    #[serde(default = "default_artifact_ttl")]
    pub artifact_ttl_secs: u64,
    /// Timeout for a single media fetch from the CDN.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// User agent sent when fetching media bytes.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            artifact_ttl_secs: default_artifact_ttl(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir().join("fetchflicks")
}

fn default_artifact_ttl() -> u64 {
    3600
}

fn default_request_timeout() -> u64 {
    600
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string()
}

/// External extractor (yt-dlp) settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractorConfig {
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,
    #[serde(default = "default_extractor_timeout")]
    pub timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: default_ytdlp_path(),
            timeout_secs: default_extractor_timeout(),
        }
    }
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_extractor_timeout() -> u64 {
    120
}

/// FFmpeg muxer settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MuxerConfig {
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
    #[serde(default = "default_mux_timeout")]
    pub timeout_secs: u64,
    /// Codec the audio track is transcoded to while the video is copied.
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,
    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for MuxerConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            timeout_secs: default_mux_timeout(),
            audio_codec: default_audio_codec(),
            log_level: default_log_level(),
        }
    }
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_mux_timeout() -> u64 {
    1800
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_log_level() -> String {
    "error".to_string()
}

/// Progress table retention
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProgressConfig {
    /// How long a finished download stays visible to pollers.
    #[serde(default = "default_retention")]
    pub retention_secs: u64,
    /// Interval of the background prune/sweep task.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            retention_secs: default_retention(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_retention() -> u64 {
    300
}

fn default_sweep_interval() -> u64 {
    60
}

/// SMTP notifier configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    /// Usually supplied through `FETCHFLICKS_SMTP_PASSWORD`.
    #[serde(default)]
    pub password: String,
    /// Envelope sender. Falls back to `username` when empty.
    #[serde(default)]
    pub sender: String,
    /// Mailbox that receives contact and feedback messages.
    pub recipient: String,
}

fn default_smtp_port() -> u16 {
    587
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub download: DownloadConfig,
    pub extractor: ExtractorConfig,
    pub muxer: MuxerConfig,
    pub progress: ProgressConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smtp: Option<SanitizedSmtpConfig>,
}

/// Sanitized SMTP config (password hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password_configured: bool,
    pub recipient: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            download: config.download.clone(),
            extractor: config.extractor.clone(),
            muxer: config.muxer.clone(),
            progress: config.progress.clone(),
            smtp: config.smtp.as_ref().map(|s| SanitizedSmtpConfig {
                host: s.host.clone(),
                port: s.port,
                username: s.username.clone(),
                password_configured: !s.password.is_empty(),
                recipient: s.recipient.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.server.pages_dir, PathBuf::from("web"));
        assert_eq!(config.database.path.to_str().unwrap(), "fetchflicks.db");
        assert_eq!(config.extractor.ytdlp_path, PathBuf::from("yt-dlp"));
        assert_eq!(config.muxer.audio_codec, "aac");
        assert_eq!(config.progress.retention_secs, 300);
        assert!(config.smtp.is_none());
    }

    #[test]
    fn test_deserialize_server_section() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
pages_dir = "/srv/pages"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.server.pages_dir, PathBuf::from("/srv/pages"));
    }

    #[test]
    fn test_deserialize_with_custom_database_path() {
        let toml = r#"
[database]
path = "/data/messages.sqlite"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.database.path.to_str().unwrap(),
            "/data/messages.sqlite"
        );
    }

    #[test]
    fn test_deserialize_tool_paths() {
        let toml = r#"
[extractor]
ytdlp_path = "/opt/bin/yt-dlp"
timeout_secs = 30

[muxer]
ffmpeg_path = "/opt/bin/ffmpeg"
audio_codec = "copy"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.extractor.ytdlp_path, PathBuf::from("/opt/bin/yt-dlp"));
        assert_eq!(config.extractor.timeout_secs, 30);
        assert_eq!(config.muxer.ffmpeg_path, PathBuf::from("/opt/bin/ffmpeg"));
        assert_eq!(config.muxer.audio_codec, "copy");
        assert_eq!(config.muxer.timeout_secs, 1800); // default
    }

    #[test]
    fn test_deserialize_smtp_requires_recipient() {
        let toml = r#"
[smtp]
host = "smtp.example.com"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_sanitized_config_hides_password() {
        let config = Config {
            smtp: Some(SmtpConfig {
                host: "smtp.example.com".to_string(),
                port: 587,
                username: "bot@example.com".to_string(),
                password: "app-password".to_string(),
                sender: String::new(),
                recipient: "inbox@example.com".to_string(),
            }),
            ..Default::default()
        };

        let sanitized = SanitizedConfig::from(&config);
        let smtp = sanitized.smtp.as_ref().unwrap();
        assert!(smtp.password_configured);
        assert_eq!(smtp.host, "smtp.example.com");

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("app-password"));
    }

    #[test]
    fn test_sanitized_config_without_smtp() {
        let sanitized = SanitizedConfig::from(&Config::default());
        assert_eq!(sanitized.server.port, 8080);
        assert!(sanitized.smtp.is_none());
    }
}
