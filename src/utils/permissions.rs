use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{info, warn};

/// Что перестанет работать без доступа к устройству
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionIssue {
    pub resource: &'static str,
    pub problem: String,
    pub degraded: &'static str,
}

/// Проверить доступ к устройствам ввода.
///
/// Ни одна проблема не фатальна: без `/dev/input` пропадает глобальная отмена,
/// без `/dev/uinput` текст в редакторе не печатается.
pub fn check_permissions() -> Vec<PermissionIssue> {
    info!("Проверка прав доступа...");

    let mut issues = Vec::new();
    issues.extend(check_input_devices_access(Path::new("/dev/input")));
    issues.extend(check_uinput_access(Path::new("/dev/uinput")));

    for issue in &issues {
        warn!("{}: {} - {}", issue.resource, issue.problem, issue.degraded);
    }
    if issues.is_empty() {
        info!("Проверка прав доступа завершена успешно");
    } else {
        for line in setup_commands() {
            info!("{}", line);
        }
    }

    issues
}

fn check_input_devices_access(input_dir: &Path) -> Option<PermissionIssue> {
    const DEGRADED: &str = "глобальная клавиша отмены недоступна";

    if !input_dir.exists() {
        return Some(PermissionIssue {
            resource: "/dev/input",
            problem: "директория не существует".to_string(),
            degraded: DEGRADED,
        });
    }

    match fs::read_dir(input_dir) {
        Ok(_) => None,
        Err(e) => Some(PermissionIssue {
            resource: "/dev/input",
            problem: format!("нет доступа: {}", e),
            degraded: DEGRADED,
        }),
    }
}

fn check_uinput_access(uinput_device: &Path) -> Option<PermissionIssue> {
    const DEGRADED: &str = "печать в редакторе отключена";

    let metadata = match fs::metadata(uinput_device) {
        Ok(metadata) => metadata,
        Err(e) => {
            return Some(PermissionIssue {
                resource: "/dev/uinput",
                problem: format!("недоступно ({}), возможно модуль uinput не загружен", e),
                degraded: DEGRADED,
            })
        }
    };

    // Обычно 660 с группой input/uinput или 666
    let mode = metadata.permissions().mode();
    if mode & 0o006 == 0 && mode & 0o060 == 0 {
        return Some(PermissionIssue {
            resource: "/dev/uinput",
            problem: "нет прав на запись".to_string(),
            degraded: DEGRADED,
        });
    }

    None
}

/// Рекомендуемые команды для настройки прав доступа
pub fn setup_commands() -> Vec<String> {
    vec![
        "# Добавить пользователя в необходимые группы:".to_string(),
        "sudo usermod -a -G input,uinput $USER".to_string(),
        "# Загрузить модуль uinput:".to_string(),
        "sudo modprobe uinput".to_string(),
        "# После выполнения команд перезайдите в систему".to_string(),
    ]
}
