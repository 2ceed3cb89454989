use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod mappings;
mod services;
mod tracker;
mod utils;

use config::{Config, LoggingConfig};
use services::engine::Collaborators;
use services::input_source::input_source_factory;
use services::text_accessor::create_text_accessor;
use services::window_accessor::{create_pointer_locator, create_window_accessor};
use services::{EngineController, SettingsWatcher};
use tracker::SettingsHandle;
use utils::permissions::{DevicePermissionGate, DryRunPermissionGate, PermissionGate};

#[derive(Parser, Debug)]
#[command(name = "winglide")]
#[command(about = "Перемещение и изменение размера окон с зажатыми модификаторами")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "winglide.toml")]
    config: PathBuf,

    /// Режим сухого запуска (без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает [logging] из конфигурации)
    #[arg(long)]
    log_level: Option<String>,

    /// Не перечитывать конфигурацию при изменении файла
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Arc::new(Config::load(&args.config)?);

    // Инициализация системы логирования
    init_tracing(args.log_level.as_deref(), &config.logging)?;

    info!("Запуск winglide v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config.display());

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    }

    let settings = SettingsHandle::new(config.tracker_settings()?);

    let permissions: Arc<dyn PermissionGate> = if args.dry_run {
        Arc::new(DryRunPermissionGate)
    } else {
        Arc::new(DevicePermissionGate)
    };
    let collaborators = Collaborators {
        permissions,
        windows: create_window_accessor(args.dry_run),
        text: create_text_accessor(&config, args.dry_run),
    };
    let factory = input_source_factory(config.clone(), create_pointer_locator(args.dry_run), args.dry_run);

    let mut engine = EngineController::new(settings.clone(), collaborators, factory);
    engine.enable()?;

    let watcher = if args.no_watch {
        None
    } else {
        match SettingsWatcher::spawn(args.config.clone(), settings) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!("Горячая перезагрузка конфигурации недоступна: {}", e);
                None
            }
        }
    };

    info!("Все сервисы запущены");

    // Ожидание сигнала завершения
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Получен сигнал завершения (Ctrl+C)");
        }
        Err(err) => {
            error!("Ошибка при ожидании сигнала завершения: {}", err);
        }
    }

    info!("Завершение работы...");
    drop(watcher);

    // Выключение движка отпускает захваченные устройства
    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    let shutdown = tokio::task::spawn_blocking(move || engine.disable());

    match tokio::time::timeout(shutdown_timeout, shutdown).await {
        Ok(Ok(())) => info!("Движок выключен корректно"),
        Ok(Err(e)) => error!("Ошибка при выключении движка: {}", e),
        Err(_) => warn!("Таймаут при выключении движка"),
    }

    info!("winglide завершил работу");
    Ok(())
}

fn init_tracing(level: Option<&str>, logging: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    // RUST_LOG > --log-level > [logging]
    let directives = match level {
        Some(level) => level.to_string(),
        None if logging.filter.is_empty() => logging.level.clone(),
        None => format!("{},{}", logging.level, logging.filter),
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))?;

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().compact()).init();
    }

    Ok(())
}
