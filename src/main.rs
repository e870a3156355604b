use std::io::Error;
use std::sync::Arc;
use std::time::Duration;

use poem::{EndpointExt, Server, listener::TcpListener, middleware::Tracing};
use tokio::{main, sync::RwLock};
use tracing::{info, warn};

use crate::{
    application::{
        handlers::message_dispatcher::MessageDispatchHandler,
        services::{
            SharedSettings,
            delivery_queue::{DiscordQueue, QueueConfig},
            log_sink::LogSink,
        },
        usecases::update_settings::UpdateSettingsUseCase,
    },
    config::Config,
    domain::{models::LogLevel, repositories::SettingsRepository},
    infrastructure::{
        logging::{event_log::EventLog, subscriber},
        messaging::{
            discord::{DiscordClientConfig, DiscordWebhookClient},
            forward::HttpForwarder,
        },
        repositories::settings_file::JsonFileSettingsRepository,
        storage::file_log::FileLogSink,
    },
    presentation::http::endpoints::root::{ApiState, build_app},
};

mod application;
mod config;
mod domain;
mod infrastructure;
mod presentation;

const FORWARD_TIMEOUT: Duration = Duration::from_secs(10);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[main]
async fn main() -> Result<(), Error> {
    let config = Config::try_parse().map_err(Error::other)?;

    let settings_repo = Arc::new(JsonFileSettingsRepository::new(&config.settings_path));
    let settings = settings_repo.load().await.map_err(Error::other)?;

    let filter = subscriber::init(config.json_logs, settings.debug_mode).map_err(Error::other)?;
    info!(path = %settings_repo.path().display(), "settings loaded");

    let listen_addr = config
        .listen_addr
        .clone()
        .unwrap_or_else(|| settings.listen_addr.clone());
    if settings.enable_discord && settings.webhook_url.trim().is_empty() {
        warn!("discord is enabled but no webhook URL is configured");
    }

    let event_log = Arc::new(EventLog::new(settings.debug_mode).with_filter_handle(filter));
    let settings: SharedSettings = Arc::new(RwLock::new(settings));

    let discord = Arc::new(
        DiscordWebhookClient::new(DiscordClientConfig::default()).map_err(Error::other)?,
    );
    let queue = Arc::new(DiscordQueue::new(
        discord.clone(),
        event_log.clone(),
        QueueConfig::default(),
    ));
    let worker = queue.start();

    let dispatcher = Arc::new(MessageDispatchHandler::new(
        settings.clone(),
        discord,
        queue.clone(),
        Arc::new(FileLogSink::new()),
        Arc::new(HttpForwarder::new(FORWARD_TIMEOUT).map_err(Error::other)?),
        event_log.clone(),
    ));
    let update_settings_usecase = Arc::new(UpdateSettingsUseCase::new(
        settings_repo,
        settings.clone(),
        event_log.clone(),
    ));

    let state = Arc::new(ApiState {
        dispatcher,
        update_settings_usecase,
        settings,
        event_log: event_log.clone(),
        queue: queue.clone(),
    });

    let server_url = format!("http://{listen_addr}");
    event_log.log(LogLevel::Info, &format!("Server listening on {server_url}"));

    let app = build_app(state, &server_url).with(Tracing);
    let result = Server::new(TcpListener::bind(listen_addr))
        .run_with_graceful_shutdown(
            app,
            async {
                let _ = tokio::signal::ctrl_c().await;
            },
            Some(SHUTDOWN_GRACE),
        )
        .await;

    queue.stop();
    let _ = worker.await;
    event_log.log(LogLevel::Info, "Server stopped");

    result
}
