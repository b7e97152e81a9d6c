use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};

mod assets;
mod config;
mod error;
mod events;
pub mod mappings;
mod render;
mod scenes;
mod services;
mod timeline;
mod utils;

use assets::Assets;
use config::Config;
use services::{
    create_audio_player, create_cancel_source, create_overlay, Keystrokes, ProcessEditor, SoundBank,
    VirtualDevice, VIRTUAL_KEYBOARD_NAME,
};
use timeline::{ExitSignal, Services, Stage};

#[derive(Parser, Debug)]
#[command(name = "haunted-window")]
#[command(about = "Розыгрыш: мигающий экран, призраки, одержимый редактор и скример")]
struct Args {
    /// Путь к файлу конфигурации (необязательный)
    #[arg(short, long, default_value = "haunt.toml")]
    config: String,

    /// Режим сухого запуска (без окна, звука и нажатий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования, перекрывает значение из конфигурации
    #[arg(long)]
    log_level: Option<String>,

    /// Встроенный сценарий: classic, swarm или possessed
    #[arg(short, long)]
    timeline: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Конфигурация нужна раньше логирования: там уровень и формат
    let config = Config::load(&args.config)?;
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск Haunted Window v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    } else {
        // Проблемы с правами не фатальны, только ограничивают эффекты
        utils::permissions::check_permissions();
    }

    let spec = config.timeline_spec(args.timeline.as_deref())?;

    let exit = ExitSignal::new();
    let ctrl_c_handle = tokio::spawn({
        let exit = exit.clone();
        async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Получен сигнал завершения (Ctrl+C)");
                    exit.request();
                }
                Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
            }
        }
    });

    let overlay = create_overlay(&config.overlay, args.dry_run)?;
    let assets = Assets::load(&config.assets, overlay.size());
    let audio = create_audio_player(
        &config.audio,
        SoundBank::discover(&config.assets.sounds_path()),
        args.dry_run,
    );

    // Клавиатуру отмены ищем до появления нашей виртуальной
    let cancel = create_cancel_source(&config, args.dry_run)?;

    let keys: Box<dyn Keystrokes> = match VirtualDevice::new(VIRTUAL_KEYBOARD_NAME, args.dry_run) {
        Ok(device) => Box::new(device),
        Err(e) => {
            warn!("Виртуальная клавиатура недоступна, нажатия будут только в логе: {}", e);
            Box::new(VirtualDevice::new(VIRTUAL_KEYBOARD_NAME, true)?)
        }
    };

    let services = Services {
        overlay,
        audio,
        keys,
        editor: Box::new(ProcessEditor::new(config.editor.clone(), args.dry_run)),
        cancel,
    };
    let mut stage = Stage::new(services, assets, exit.clone(), config.poll_interval());

    info!("Все компоненты инициализированы");

    let mut timeline = spec.build(config.timeline.background_music, config.timeline.seed);
    let result = timeline.run(&mut stage).await;

    ctrl_c_handle.abort();

    let outcome = result?;
    match outcome.cancelled_in {
        Some(scene) => info!(
            "Отменено на сцене '{}', отыграно: [{}]",
            scene,
            outcome.completed.join(", ")
        ),
        None if outcome.cancelled_before_start => info!("Отменено до начала сценария"),
        None => info!("Сценарий '{}' отыгран полностью", timeline.name()),
    }

    info!("Haunted Window завершил работу");
    Ok(())
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let registry = tracing_subscriber::registry().with(filter);

    if format == "pretty" {
        registry.with(fmt::layer().pretty()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }

    Ok(())
}
