//! Записывающие заглушки исполнителей для тестов сцен и сценариев.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use crate::assets::Assets;
use crate::error::Result;
use crate::events::{KeyCode, Modifiers};
use crate::haunt_error;
use crate::render::Frame;
use crate::services::{AudioPlayer, CancelSource, Cue, Editor, Keystrokes, Overlay};

use super::exit_signal::ExitSignal;
use super::stage::{Services, Stage};

pub const WIDTH: u32 = 64;
pub const HEIGHT: u32 = 48;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Present { background: u32 },
    Clear,
    ClickThrough(bool),
    Acknowledge(String),
    Play(Cue),
    StopAll,
    Type(char),
    Chord(KeyCode, Modifiers),
    EditorOpen,
    EditorClose,
}

type Predicate = Box<dyn Fn(&[Call]) -> bool>;

#[derive(Default)]
struct Shared {
    journal: Vec<Call>,
    polls: usize,
    cancel_after: Option<usize>,
    cancel_when: Option<Predicate>,
    window_escape: bool,
    loaded: HashSet<Cue>,
    busy_polls: usize,
    busy_left: usize,
    muted: bool,
    editor_fails: bool,
    keys_fail: bool,
    last_frame: Option<Frame>,
}

type Handle = Rc<RefCell<Shared>>;

struct FakeOverlay(Handle);

impl Overlay for FakeOverlay {
    fn size(&self) -> (u32, u32) {
        (WIDTH, HEIGHT)
    }

    fn set_click_through(&mut self, enabled: bool) {
        self.0.borrow_mut().journal.push(Call::ClickThrough(enabled));
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let mut shared = self.0.borrow_mut();
        shared.journal.push(Call::Present { background: frame.background() });
        shared.last_frame = Some(frame.clone());
        Ok(())
    }

    fn clear(&mut self) {
        self.0.borrow_mut().journal.push(Call::Clear);
    }

    fn pump(&mut self) -> bool {
        std::mem::take(&mut self.0.borrow_mut().window_escape)
    }

    fn acknowledge(&mut self, title: &str, message: &str) {
        self.0
            .borrow_mut()
            .journal
            .push(Call::Acknowledge(format!("{}: {}", title, message)));
    }
}

struct FakeAudio(Handle);

impl AudioPlayer for FakeAudio {
    fn is_loaded(&self, cue: Cue) -> bool {
        self.0.borrow().loaded.contains(&cue)
    }

    fn play(&mut self, cue: Cue, _limit: Option<Duration>) -> bool {
        let mut shared = self.0.borrow_mut();
        shared.journal.push(Call::Play(cue));
        if shared.muted || !shared.loaded.contains(&cue) {
            return false;
        }
        if !cue.is_looping() {
            shared.busy_left = shared.busy_polls;
        }
        true
    }

    fn is_busy(&mut self) -> bool {
        let mut shared = self.0.borrow_mut();
        if shared.busy_left > 0 {
            shared.busy_left -= 1;
            true
        } else {
            false
        }
    }

    fn stop_all(&mut self) {
        let mut shared = self.0.borrow_mut();
        shared.journal.push(Call::StopAll);
        shared.busy_left = 0;
    }
}

struct FakeKeys(Handle);

impl Keystrokes for FakeKeys {
    fn type_char(&mut self, ch: char) -> Result<()> {
        let mut shared = self.0.borrow_mut();
        if shared.keys_fail {
            return Err(haunt_error!(internal, "виртуальная клавиатура недоступна"));
        }
        shared.journal.push(Call::Type(ch));
        Ok(())
    }

    fn chord(&mut self, key: KeyCode, modifiers: Modifiers) -> Result<()> {
        let mut shared = self.0.borrow_mut();
        if shared.keys_fail {
            return Err(haunt_error!(internal, "виртуальная клавиатура недоступна"));
        }
        shared.journal.push(Call::Chord(key, modifiers));
        Ok(())
    }
}

struct FakeEditor {
    shared: Handle,
    open: bool,
}

impl Editor for FakeEditor {
    fn open(&mut self) -> Result<()> {
        if self.shared.borrow().editor_fails {
            return Err(haunt_error!(internal, "редактор не запустился"));
        }
        self.shared.borrow_mut().journal.push(Call::EditorOpen);
        self.open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.shared.borrow_mut().journal.push(Call::EditorClose);
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

struct ScriptedCancel(Handle);

impl CancelSource for ScriptedCancel {
    fn poll_cancel(&mut self) -> bool {
        let mut shared = self.0.borrow_mut();
        shared.polls += 1;

        if shared.cancel_after.is_some_and(|n| shared.polls > n) {
            return true;
        }
        match &shared.cancel_when {
            Some(predicate) => predicate(&shared.journal),
            None => false,
        }
    }
}

/// Сцена с заглушками и доступом к журналу вызовов
pub struct Rig {
    pub stage: Stage,
    pub exit: ExitSignal,
    shared: Handle,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_assets(Assets::fallback())
    }

    pub fn with_assets(assets: Assets) -> Self {
        let shared: Handle = Rc::default();
        let exit = ExitSignal::new();

        let services = Services {
            overlay: Box::new(FakeOverlay(shared.clone())),
            audio: Box::new(FakeAudio(shared.clone())),
            keys: Box::new(FakeKeys(shared.clone())),
            editor: Box::new(FakeEditor {
                shared: shared.clone(),
                open: false,
            }),
            cancel: Box::new(ScriptedCancel(shared.clone())),
        };

        Self {
            stage: Stage::new(services, assets, exit.clone(), Duration::from_millis(100)),
            exit,
            shared,
        }
    }

    /// Отмена на опросе номер `polls + 1`
    pub fn cancel_after_polls(&self, polls: usize) {
        self.shared.borrow_mut().cancel_after = Some(polls);
    }

    /// Отмена, как только журнал удовлетворяет условию
    pub fn cancel_when(&self, predicate: impl Fn(&[Call]) -> bool + 'static) {
        self.shared.borrow_mut().cancel_when = Some(Box::new(predicate));
    }

    pub fn press_escape_in_window(&self) {
        self.shared.borrow_mut().window_escape = true;
    }

    pub fn load_cue(&self, cue: Cue) {
        self.shared.borrow_mut().loaded.insert(cue);
    }

    /// Сколько опросов `is_busy` короткий звук ещё «играет» после запуска
    pub fn set_busy_polls(&self, polls: usize) {
        self.shared.borrow_mut().busy_polls = polls;
    }

    /// Файлы звуков есть, но проигрыватель ничего не запускает
    pub fn mute_audio(&self) {
        self.shared.borrow_mut().muted = true;
    }

    pub fn fail_editor(&self) {
        self.shared.borrow_mut().editor_fails = true;
    }

    pub fn fail_keystrokes(&self) {
        self.shared.borrow_mut().keys_fail = true;
    }

    pub fn journal(&self) -> Vec<Call> {
        self.shared.borrow().journal.clone()
    }

    pub fn polls(&self) -> usize {
        self.shared.borrow().polls
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.shared.borrow().last_frame.clone()
    }

    /// Всё, что было напечатано посимвольно
    pub fn typed(&self) -> String {
        self.shared
            .borrow()
            .journal
            .iter()
            .filter_map(|call| match call {
                Call::Type(ch) => Some(*ch),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.shared.borrow().journal.iter().filter(|c| *c == call).count()
    }
}
