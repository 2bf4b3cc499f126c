use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;
use upload_url_server::config::Config;
use upload_url_server::s3::{S3UploadUrlSigner, create_s3_client};
use upload_url_server::{AppState, app};

/// 未设置 RUST_LOG 时使用的日志过滤规则
const DEFAULT_LOG_FILTER: &str = "upload_url_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env 文件
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_timer(LocalTime::rfc_3339())
        .init();

    let config = Config::from_env().context("加载配置失败")?;
    info!(s3 = ?config.s3, upload = ?config.upload, "配置已加载");

    // 初始化 S3 客户端
    let s3_client = Arc::new(create_s3_client(&config.s3).await);
    let signer = S3UploadUrlSigner::new(s3_client);
    let state = AppState::new(Arc::new(signer), config.upload.clone());

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("无法监听 {}", config.bind_addr))?;
    info!("服务器运行在 http://{}", config.bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务器异常退出")?;

    info!("服务器已关闭");
    Ok(())
}

/// 等待 Ctrl-C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "无法监听 Ctrl-C 信号");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "无法监听 SIGTERM 信号");
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
}
