//! Wiring configuration into a running recorder.

use std::path::Path;
use std::sync::Arc;

use herodotus_config::{ConfigLoader, HerodotusConfig, ENV_PREFIX};
use herodotus_docs::{
    DocsResult, DocumentAggregator, DocumentHeader, DocumentWriter, FlushGuard, FlushOutcome,
    MetadataExtractor, MiddlewareRegistry, TrafficObserver,
};
use herodotus_middleware::stages::{DocumentationMiddleware, RouteTable, RoutingMiddleware};
use herodotus_middleware::PipelineBuilder;

use crate::error::HerodotusResult;

/// Default configuration file looked up by [`Recorder::load`].
pub const DEFAULT_CONFIG_FILE: &str = "herodotus.toml";

/// The documentation recorder: one aggregator, one observer, one writer.
///
/// Create it once at startup, put [`Recorder::pipeline`] in front of the
/// application's handlers and keep a [`Recorder::flush_guard`] alive until
/// the server stops.
///
/// ```rust,ignore
/// let recorder = Recorder::load(registry)?;
/// recorder.init_telemetry()?;
///
/// let pipeline = recorder
///     .pipeline(Arc::new(routes))
///     .add_pre_handler_stage(Authenticate)
///     .build();
///
/// let _guard = recorder.flush_guard();
/// serve(pipeline).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Recorder {
    config: HerodotusConfig,
    aggregator: Arc<DocumentAggregator>,
    extractor: Arc<MetadataExtractor>,
    observer: Arc<TrafficObserver>,
    writer: Arc<DocumentWriter>,
}

impl Recorder {
    /// Loads `.env`, `herodotus.toml` (if present) and `HERODOTUS__*`
    /// overrides, then builds the recorder.
    ///
    /// # Errors
    ///
    /// Returns `HerodotusError::Config` if loading or validation fails.
    pub fn load(registry: MiddlewareRegistry) -> HerodotusResult<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE, registry)
    }

    /// Like [`Self::load`] with an explicit configuration file.
    ///
    /// # Errors
    ///
    /// Returns `HerodotusError::Config` if loading or validation fails.
    pub fn load_from(path: impl AsRef<Path>, registry: MiddlewareRegistry) -> HerodotusResult<Self> {
        let config = ConfigLoader::new()
            .with_dotenv()?
            .with_optional_file(path)?
            .with_env_prefix(ENV_PREFIX)
            .load()?;
        Self::from_config(config, registry)
    }

    /// Builds the recorder from an already loaded configuration.
    ///
    /// Aliases and groups from `config.middleware` are added to `registry`;
    /// `config.middleware.global` applies to every route.
    ///
    /// # Errors
    ///
    /// Returns `HerodotusError::Config` if the configuration is invalid.
    pub fn from_config(
        config: HerodotusConfig,
        mut registry: MiddlewareRegistry,
    ) -> HerodotusResult<Self> {
        config.validate()?;

        for (alias, type_name) in &config.middleware.aliases {
            registry.alias(alias.as_str(), type_name.as_str());
        }
        for (group, members) in &config.middleware.groups {
            registry.group(group.as_str(), members.iter().map(String::as_str));
        }

        let extractor = Arc::new(MetadataExtractor::new(
            Arc::new(registry),
            config.middleware.global.clone(),
        ));
        let aggregator = Arc::new(DocumentAggregator::new());
        let observer = TrafficObserver::new(Arc::clone(&aggregator), Arc::clone(&extractor))
            .with_header_examples(config.documentation.capture_header_examples);
        let writer = DocumentWriter::new(document_header(&config), &config.documentation.output_path)
            .pretty(config.documentation.pretty);

        tracing::debug!(
            output_path = %config.documentation.output_path,
            enabled = config.documentation.enabled,
            "Documentation recorder ready"
        );

        Ok(Self {
            config,
            aggregator,
            extractor,
            observer: Arc::new(observer),
            writer: Arc::new(writer),
        })
    }

    /// Installs logging and describes metrics per `config.telemetry`.
    ///
    /// # Errors
    ///
    /// Returns `HerodotusError::Telemetry` if a global subscriber is already
    /// installed or the level directive is invalid.
    pub fn init_telemetry(&self) -> HerodotusResult<()> {
        herodotus_telemetry::init_telemetry(&self.config.telemetry_config())?;
        Ok(())
    }

    /// The configuration the recorder was built from.
    #[must_use]
    pub fn config(&self) -> &HerodotusConfig {
        &self.config
    }

    /// The shared document state.
    #[must_use]
    pub fn aggregator(&self) -> &Arc<DocumentAggregator> {
        &self.aggregator
    }

    /// The extractor resolving route middleware to parameters.
    #[must_use]
    pub fn extractor(&self) -> &Arc<MetadataExtractor> {
        &self.extractor
    }

    /// The shared observer.
    #[must_use]
    pub fn observer(&self) -> &Arc<TrafficObserver> {
        &self.observer
    }

    /// The writer used by [`Self::flush`].
    #[must_use]
    pub fn writer(&self) -> &Arc<DocumentWriter> {
        &self.writer
    }

    /// The documentation stage, or `None` when recording is disabled.
    #[must_use]
    pub fn documentation_middleware(&self) -> Option<DocumentationMiddleware> {
        self.config
            .documentation
            .enabled
            .then(|| DocumentationMiddleware::new(Arc::clone(&self.observer)))
    }

    /// A pipeline builder preloaded with the routing and documentation
    /// stages.
    ///
    /// Stages added to the returned builder run inside the documentation
    /// stage.
    #[must_use]
    pub fn pipeline(&self, routes: Arc<RouteTable>) -> PipelineBuilder {
        let builder = PipelineBuilder::new().add_pre_handler_stage(RoutingMiddleware::new(routes));

        match self.documentation_middleware() {
            Some(stage) => builder.add_pre_handler_stage(stage),
            None => builder,
        }
    }

    /// Writes the document now.
    ///
    /// # Errors
    ///
    /// Returns `DocsError` if serialization or the write fails.
    pub fn flush(&self) -> DocsResult<FlushOutcome> {
        self.writer.flush(&self.aggregator)
    }

    /// A guard that writes the document when dropped.
    #[must_use]
    pub fn flush_guard(&self) -> FlushGuard {
        FlushGuard::new(Arc::clone(&self.writer), Arc::clone(&self.aggregator))
    }
}

fn document_header(config: &HerodotusConfig) -> DocumentHeader {
    let info = &config.info;
    let mut header = DocumentHeader::new(info.title.as_str(), info.version.as_str());

    if info.contact_name.is_some() || info.contact_email.is_some() {
        header = header.contact(
            info.contact_name.clone().unwrap_or_default(),
            info.contact_email.clone().unwrap_or_default(),
        );
    }

    config.servers.iter().fold(header, |header, server| {
        header.server(server.url.as_str(), server.description.as_str())
    })
}
