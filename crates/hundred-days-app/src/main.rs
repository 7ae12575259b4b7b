use std::path::PathBuf;
use std::sync::Arc;

use hundred_days_lib::application::services::ConfigService;
use hundred_days_lib::context::bootstrap::{resolve_data_dir, DATA_DIR_ENV};
use hundred_days_lib::context::AppContext;

fn config_dir(data_dir: &std::path::Path) -> PathBuf {
    // An explicit data dir keeps everything, config included, in one place
    if std::env::var_os(DATA_DIR_ENV).is_some() {
        return data_dir.to_path_buf();
    }
    ConfigService::default_dir().unwrap_or_else(|| data_dir.join("config"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = resolve_data_dir()?;
    let config = Arc::new(ConfigService::new(&config_dir(&data_dir))?);

    let log_dir = data_dir.join("logs");
    match hundred_days_infrastructure::logging::init_logger(
        log_dir.clone(),
        config.get_log_level().as_str(),
    ) {
        Ok(_) => {
            tracing::info!("🚀 Hundred Days starting...");
            tracing::info!("📝 File logging initialized at: {}", log_dir.display());
        }
        Err(e) => {
            eprintln!("⚠️  Failed to initialize file logging: {}", e);
            eprintln!("   Falling back to console logging only");

            let _ = tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .with_target(true)
                .with_line_number(true)
                .try_init();
        }
    }

    tracing::info!("🚀 Starting app context initialization...");
    let context = match AppContext::new(&data_dir, config).await {
        Ok(context) => {
            tracing::info!("✅ App context initialized successfully");
            context
        }
        Err(e) => {
            tracing::error!("❌ Failed to initialize app context: {:#}", e);
            return Err(e);
        }
    };

    let handles = context.start().await;

    tokio::signal::ctrl_c().await?;
    tracing::info!("👋 Shutting down...");
    context.shutdown();
    futures::future::join_all(handles).await;

    Ok(())
}
