pub mod config;
pub mod download;
pub mod fetcher;
pub mod intake;
pub mod messages;
pub mod metrics;
pub mod muxer;
pub mod notifier;
pub mod progress;
pub mod resolver;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use download::{
    sweep_stale, DownloadError, DownloadRequest, DownloadService, ServedFile, TempArtifact,
};
pub use fetcher::{FetchError, HttpFetcher, MediaFetcher};
pub use intake::{InputError, IntakeError, IntakeService, Submission};
pub use messages::{MessageKind, MessageStore, MessageStoreError, SqliteMessageStore, StoredMessage};
pub use muxer::{FfmpegMuxer, MuxError, Muxer};
pub use notifier::{NoopNotifier, Notifier, NotifyError, SmtpNotifier};
pub use progress::{ProgressState, ProgressTracker};
pub use resolver::{MediaExtractor, MediaListing, Platform, ResolveError, YtDlpExtractor};
