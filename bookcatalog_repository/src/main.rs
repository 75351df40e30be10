use std::sync::Arc;

use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use opentelemetry::global;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::runtime::TokioCurrentThread;
use paperclip::actix::OpenApiExt;
use tracing_actix_web::TracingLogger;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use bookcatalog_repository::app_config::{config_app, json_config, query_config};
use bookcatalog_repository::books_repository::{BookRepository, InMemoryBookRepository};
use bookcatalog_repository::sample_catalog;
use bookcatalog_repository::service_settings::ServiceSettings;

const APP_NAME: &str = "bookcatalog_repository";

// Based on https://github.com/LukeMathWalker/tracing-actix-web/blob/main/examples/opentelemetry/src/main.rs#L15
fn init_telemetry(settings: &ServiceSettings) -> anyhow::Result<()> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Spans are exported in batch to the jaeger agent only when enabled
    let telemetry = if settings.jaeger_enabled {
        #[allow(deprecated)]
        let tracer = opentelemetry_jaeger::new_agent_pipeline()
            .with_service_name(APP_NAME)
            .install_batch(TokioCurrentThread)
            .context("Failed to install OpenTelemetry tracer")?;
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    // Tunable via `RUST_LOG` env variable
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    let formatting_layer = BunyanFormattingLayer::new(APP_NAME.into(), std::io::stdout);
    let subscriber = Registry::default()
        .with(env_filter)
        .with(telemetry)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install `tracing` subscriber")
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = ServiceSettings::load()?;
    init_telemetry(&settings)?;

    let books_repository: Arc<dyn BookRepository> = Arc::new(InMemoryBookRepository::default());
    if settings.seed_sample_books {
        sample_catalog::seed(books_repository.as_ref()).await?;
    }

    tracing::info!(
        host = %settings.host,
        port = settings.port,
        "Starting HTTP server"
    );

    HttpServer::new(move || {
        App::new()
            .wrap_api()
            .app_data(Data::new(books_repository.clone()))
            .app_data(json_config())
            .app_data(query_config())
            .wrap(TracingLogger::default())
            .configure(config_app)
            .with_json_spec_at("/apispec/v2")
            .build()
    })
    .bind(settings.bind_address())
    .with_context(|| format!("Failed to bind {}:{}", settings.host, settings.port))?
    .run()
    .await
    .context("HTTP server failed")?;

    global::shutdown_tracer_provider();
    Ok(())
}
