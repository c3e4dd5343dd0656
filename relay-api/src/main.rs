mod app;
mod config;

use app::{app_router, AppState, RateLimiter};
use config::ApiConfig;
use relay_core::MailgunClient;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 每个客户端 15 分钟内最多 5 次请求
const RATE_LIMIT: u32 = 5;
const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 优先读取 .env.local，再读取 .env（都不覆盖已有环境变量）
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = ApiConfig::from_env()?;
    info!(
        domain = %config.mailgun.domain,
        base_url = %config.mailgun.base_url,
        trust_proxy = config.trust_proxy,
        "configuration loaded"
    );

    let mailer = Arc::new(MailgunClient::new(config.mailgun.clone())?);
    let limiter = Arc::new(RateLimiter::new(RATE_LIMIT, RATE_LIMIT_WINDOW));

    let state = AppState {
        mailer,
        limiter,
        trust_proxy: config.trust_proxy,
    };

    let app = app_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Started on port {}", config.bind.port());
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=info".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
