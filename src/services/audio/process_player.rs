use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::AudioConfig;

use super::r#trait::{AudioPlayer, Cue};
use super::sound_bank::SoundBank;

/// Один короткий звук, играющий в отдельном процессе
struct Voice {
    cue: Cue,
    child: Child,
    deadline: Option<Instant>,
}

/// Проигрывание через внешний плеер (ffplay, mpv, paplay...)
pub struct ProcessAudio {
    config: AudioConfig,
    bank: SoundBank,
    music: Option<Child>,
    voices: Vec<Voice>,
    dry_run: bool,
    broken: bool,
}

impl ProcessAudio {
    pub fn new(config: AudioConfig, bank: SoundBank, dry_run: bool) -> Self {
        info!(
            "Инициализация ProcessAudio: плеер '{}', найдено звуков: {} (dry_run: {})",
            config.player,
            bank.len(),
            dry_run
        );
        Self {
            config,
            bank,
            music: None,
            voices: Vec::new(),
            dry_run,
            broken: false,
        }
    }

    fn spawn(&self, path: &Path, looping: bool) -> std::io::Result<Child> {
        let mut command = Command::new(&self.config.player);
        command.args(&self.config.args);
        if looping {
            command.args(&self.config.loop_args);
        }
        command
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    }

    /// Убрать завершившиеся звуки и оборвать те, у которых истёк лимит
    fn reap(&mut self) {
        let now = Instant::now();
        self.voices.retain_mut(|voice| match voice.child.try_wait() {
            Ok(Some(_)) => false,
            Ok(None) => {
                if voice.deadline.is_some_and(|deadline| now >= deadline) {
                    crate::trace_if_enabled!("Обрываем {} по лимиту", voice.cue);
                    stop_child(&mut voice.child);
                    false
                } else {
                    true
                }
            }
            Err(e) => {
                debug!("Не удалось опросить процесс {}: {}", voice.cue, e);
                false
            }
        });
    }

    fn disable(&mut self, error: std::io::Error) {
        warn!(
            "Не удалось запустить проигрыватель '{}': {}. Звук отключён",
            self.config.player, error
        );
        self.broken = true;
    }
}

fn stop_child(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl AudioPlayer for ProcessAudio {
    fn is_loaded(&self, cue: Cue) -> bool {
        self.bank.contains(cue)
    }

    fn play(&mut self, cue: Cue, limit: Option<Duration>) -> bool {
        let Some(path) = self.bank.path(cue).map(Path::to_path_buf) else {
            crate::trace_if_enabled!("Звук {} не загружен, пропускаем", cue);
            return false;
        };

        if self.dry_run {
            crate::debug_if_enabled!("[DRY RUN] Звук {} (лимит: {:?})", cue, limit);
            return false;
        }
        if self.broken {
            return false;
        }

        self.reap();

        if cue.is_looping() {
            if let Some(mut previous) = self.music.take() {
                stop_child(&mut previous);
            }
            return match self.spawn(&path, true) {
                Ok(child) => {
                    info!("Фоновая музыка запущена");
                    self.music = Some(child);
                    true
                }
                Err(e) => {
                    self.disable(e);
                    false
                }
            };
        }

        if self.voices.len() >= self.config.max_voices {
            crate::trace_if_enabled!("Все {} голосов заняты, {} пропущен", self.config.max_voices, cue);
            return false;
        }

        match self.spawn(&path, false) {
            Ok(child) => {
                self.voices.push(Voice {
                    cue,
                    child,
                    deadline: limit.map(|limit| Instant::now() + limit),
                });
                true
            }
            Err(e) => {
                self.disable(e);
                false
            }
        }
    }

    fn is_busy(&mut self) -> bool {
        self.reap();
        !self.voices.is_empty()
    }

    fn stop_all(&mut self) {
        if let Some(mut music) = self.music.take() {
            stop_child(&mut music);
        }
        for mut voice in self.voices.drain(..) {
            stop_child(&mut voice.child);
        }
    }
}

impl Drop for ProcessAudio {
    fn drop(&mut self) {
        self.stop_all();
    }
}
