use std::process::{Child, Command, Stdio};
use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::error::{HauntError, Result};

/// Внешний текстовый редактор, в который «печатает призрак»
pub trait Editor {
    fn open(&mut self) -> Result<()>;

    /// Закрыть без сохранения
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

/// Редактор как дочерний процесс
pub struct ProcessEditor {
    config: EditorConfig,
    child: Option<Child>,
    dry_run: bool,
    dry_open: bool,
}

impl ProcessEditor {
    pub fn new(config: EditorConfig, dry_run: bool) -> Self {
        info!("Инициализация ProcessEditor '{}' (dry_run: {})", config.program, dry_run);
        Self {
            config,
            child: None,
            dry_run,
            dry_open: false,
        }
    }

    /// Закрыть уже открытые экземпляры, чтобы печать шла в наше окно
    fn kill_existing(&self) {
        let result = Command::new("pkill")
            .args(["-x", &self.config.program])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match result {
            Ok(status) => debug!("pkill -x {}: {}", self.config.program, status),
            Err(e) => debug!("pkill недоступен: {}", e),
        }
    }

    fn run_setup(&self) {
        let Some((program, args)) = self.config.setup_command.split_first() else {
            return;
        };

        match Command::new(program).args(args).stdout(Stdio::null()).status() {
            Ok(status) if status.success() => debug!("Команда подготовки редактора выполнена"),
            Ok(status) => warn!("Команда подготовки редактора завершилась с {}", status),
            Err(e) => warn!("Не удалось выполнить команду подготовки '{}': {}", program, e),
        }
    }
}

impl Editor for ProcessEditor {
    fn open(&mut self) -> Result<()> {
        if self.dry_run {
            info!("[DRY RUN] Запуск редактора {} {:?}", self.config.program, self.config.args);
            self.dry_open = true;
            return Ok(());
        }

        if self.config.kill_existing {
            self.kill_existing();
        }
        self.run_setup();

        let child = Command::new(&self.config.program)
            .args(&self.config.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                HauntError::Internal(format!("Не удалось запустить редактор '{}': {}", self.config.program, e))
            })?;

        info!("Редактор {} запущен (pid {})", self.config.program, child.id());
        self.child = Some(child);
        Ok(())
    }

    fn close(&mut self) {
        if self.dry_open {
            info!("[DRY RUN] Закрытие редактора без сохранения");
            self.dry_open = false;
        }

        if let Some(mut child) = self.child.take() {
            info!("Закрываем редактор без сохранения");
            if let Err(e) = child.kill() {
                debug!("Редактор уже завершился: {}", e);
            }
            let _ = child.wait();
        }
    }

    fn is_open(&self) -> bool {
        self.dry_open || self.child.is_some()
    }
}

impl Drop for ProcessEditor {
    fn drop(&mut self) {
        self.close();
    }
}
