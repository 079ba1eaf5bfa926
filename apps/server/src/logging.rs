//! Logging and OpenTelemetry initialization
//!
//! Console output in JSON or human-readable form, optional rotating log files,
//! and an optional OTLP trace exporter. `RUST_LOG` overrides the configured
//! level.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    trace::{Sampler, TracerProvider},
    Resource,
};
use std::fs;
use std::time::Duration;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Keeps the file writer and tracer provider alive. Hold it until exit.
pub struct TelemetryGuard {
    _file_guard: Option<WorkerGuard>,
}

pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<TelemetryGuard> {
    let mut otel_init_error: Option<String> = None;
    let tracer_provider = if config.opentelemetry_enabled {
        match init_tracer_provider(config, build_resource(config)) {
            Ok(provider) => Some(provider),
            Err(e) => {
                otel_init_error = Some(e.to_string());
                None
            }
        }
    } else {
        None
    };

    let env_filter = build_env_filter(config);

    let file_guard = if let Some(provider) = &tracer_provider {
        let otel_layer = tracing_opentelemetry::layer()
            .with_tracer(provider.tracer(config.service_name.clone()))
            .with_tracked_inactivity(true);
        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(otel_layer);
        init_output_layers(subscriber, config)?
    } else {
        let subscriber = tracing_subscriber::registry().with(env_filter);
        init_output_layers(subscriber, config)?
    };

    if let Some(provider) = tracer_provider {
        global::set_tracer_provider(provider);
    }

    if let Some(err) = otel_init_error {
        tracing::warn!(
            error = %err,
            "Failed to initialize OpenTelemetry tracer provider, continuing without it"
        );
    }

    tracing::info!(
        otel_enabled = config.opentelemetry_enabled,
        json = config.json,
        file_enabled = config.file_enabled,
        service_name = %config.service_name,
        "Logging initialized"
    );

    Ok(TelemetryGuard {
        _file_guard: file_guard,
    })
}

fn build_resource(config: &LoggingConfig) -> Resource {
    let service_version = config
        .service_version
        .clone()
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    Resource::new(vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", service_version),
        KeyValue::new(
            "deployment.environment",
            config.deployment_environment.clone(),
        ),
    ])
}

fn init_tracer_provider(
    config: &LoggingConfig,
    resource: Resource,
) -> anyhow::Result<TracerProvider> {
    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(&config.otlp_endpoint)
        .with_timeout(Duration::from_secs(config.otlp_timeout_seconds))
        .build_span_exporter()
        .map_err(|e| anyhow::anyhow!("Failed to create OTLP exporter: {}", e))?;

    let sampler = if config.trace_sample_ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if config.trace_sample_ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(
            config.trace_sample_ratio,
        )))
    };

    let trace_config = opentelemetry_sdk::trace::Config::default()
        .with_sampler(sampler)
        .with_resource(resource);

    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_config(trace_config)
        .build())
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // sqlx logs every statement at debug
        EnvFilter::new(default_directives(&config.level))
    })
}

fn default_directives(level: &str) -> String {
    format!("wasteless_server={level},wasteless={level},tower_http=info,sqlx=warn")
}

fn init_output_layers<S>(subscriber: S, config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>>
where
    S: SubscriberExt + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    if config.json {
        let console_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stdout);

        if config.file_enabled {
            let (writer, guard) = create_file_writer(config)?;
            let file_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(writer);
            subscriber.with(console_layer).with(file_layer).init();
            Ok(Some(guard))
        } else {
            subscriber.with(console_layer).init();
            Ok(None)
        }
    } else {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(std::io::stdout);

        if config.file_enabled {
            let (writer, guard) = create_file_writer(config)?;
            let file_layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer);
            subscriber.with(console_layer).with(file_layer).init();
            Ok(Some(guard))
        } else {
            subscriber.with(console_layer).init();
            Ok(None)
        }
    }
}

fn create_file_writer(config: &LoggingConfig) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(&config.file_directory)?;

    let dir = &config.file_directory;
    let prefix = &config.file_prefix;
    let appender = match config.file_rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(dir, prefix),
        "minutely" => tracing_appender::rolling::minutely(dir, prefix),
        "never" => tracing_appender::rolling::never(dir, format!("{prefix}.log")),
        _ => tracing_appender::rolling::daily(dir, prefix),
    };

    Ok(tracing_appender::non_blocking(appender))
}

/// Flush and shut down the global tracer provider.
pub fn shutdown_telemetry() {
    global::shutdown_tracer_provider();
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        shutdown_telemetry();
    }
}
