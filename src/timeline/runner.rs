use tracing::{error, info, warn};

use crate::error::Result;
use crate::services::Cue;

use super::scene::Scene;
use super::stage::Stage;

/// Итог прогона сценария
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Сцены, отыгравшие до конца, в порядке запуска
    pub completed: Vec<&'static str>,
    /// Сцена, на которой сценарий остановлен отменой
    pub cancelled_in: Option<&'static str>,
    /// Отмена пришла раньше первой сцены
    pub cancelled_before_start: bool,
}

impl Outcome {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled_before_start || self.cancelled_in.is_some()
    }
}

/// Упорядоченный список сцен
pub struct Timeline {
    name: String,
    scenes: Vec<Box<dyn Scene>>,
    background_music: bool,
}

impl Timeline {
    pub fn new(name: impl Into<String>, scenes: Vec<Box<dyn Scene>>) -> Self {
        Self {
            name: name.into(),
            scenes,
            background_music: true,
        }
    }

    pub fn with_background_music(mut self, enabled: bool) -> Self {
        self.background_music = enabled;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scene_names(&self) -> Vec<&'static str> {
        self.scenes.iter().map(|scene| scene.name()).collect()
    }

    /// Отыграть сцены по порядку. Освобождение ресурсов выполняется ровно
    /// один раз: после последней сцены, после отмены или после ошибки.
    pub async fn run(&mut self, stage: &mut Stage) -> Result<Outcome> {
        info!("Запуск сценария '{}': {}", self.name, self.scene_names().join(" → "));

        let mut outcome = Outcome::default();
        let result = self.run_scenes(stage, &mut outcome).await;
        stage.teardown();

        match &result {
            Ok(()) if outcome.is_cancelled() => {
                info!("Сценарий '{}' отменён, сыграно сцен: {}", self.name, outcome.completed.len())
            }
            Ok(()) => info!("Сценарий '{}' завершён", self.name),
            Err(e) => error!("Сценарий '{}' прерван ошибкой: {}", self.name, e),
        }

        result.map(|()| outcome)
    }

    async fn run_scenes(&mut self, stage: &mut Stage, outcome: &mut Outcome) -> Result<()> {
        if stage.check_cancel() {
            outcome.cancelled_before_start = true;
            return Ok(());
        }

        if self.background_music {
            if stage.audio.is_loaded(Cue::Background) {
                stage.audio.play(Cue::Background, None);
            } else {
                warn!("Фоновая музыка не найдена, играем без неё");
            }
        }

        let total = self.scenes.len();
        for (i, scene) in self.scenes.iter_mut().enumerate() {
            let name = scene.name();

            // Отмена между сценами: следующая сцена не начинается
            if stage.check_cancel() {
                outcome.cancelled_in = Some(name);
                return Ok(());
            }

            info!("Сцена {}/{}: {}", i + 1, total, name);
            scene.run(stage).await?;

            if stage.is_cancelled() {
                info!("Отмена во время сцены {}", name);
                outcome.cancelled_in = Some(name);
                return Ok(());
            }
            outcome.completed.push(name);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haunt_error;
    use crate::timeline::testing::{Call, Rig};
    use std::time::Duration;

    /// Сцена, которая ждёт и отмечается в журнале через показ кадра
    struct Marker {
        name: &'static str,
        color: u32,
        wait_ms: u64,
    }

    #[async_trait::async_trait(?Send)]
    impl Scene for Marker {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn run(&mut self, stage: &mut Stage) -> Result<()> {
            let (w, h) = stage.overlay.size();
            stage.overlay.present(&crate::render::Frame::filled(w, h, self.color))?;
            stage.wait(Duration::from_millis(self.wait_ms)).await;
            Ok(())
        }
    }

    struct Failing;

    #[async_trait::async_trait(?Send)]
    impl Scene for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn run(&mut self, _stage: &mut Stage) -> Result<()> {
            Err(haunt_error!(display, "окно потеряно"))
        }
    }

    fn marker(name: &'static str, color: u32) -> Box<dyn Scene> {
        Box::new(Marker { name, color, wait_ms: 1000 })
    }

    fn presented(rig: &Rig) -> Vec<u32> {
        rig.journal()
            .iter()
            .filter_map(|call| match call {
                Call::Present { background } => Some(*background),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_scenes_in_order() {
        let mut rig = Rig::new();
        rig.load_cue(Cue::Background);
        let mut timeline = Timeline::new("t", vec![marker("a", 1), marker("b", 2), marker("c", 3)]);

        let outcome = timeline.run(&mut rig.stage).await.unwrap();

        assert_eq!(outcome.completed, vec!["a", "b", "c"]);
        assert!(!outcome.is_cancelled());
        assert_eq!(presented(&rig), vec![1, 2, 3]);
        assert_eq!(rig.journal().first(), Some(&Call::Play(Cue::Background)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_before_later_scenes() {
        let mut rig = Rig::new();
        rig.cancel_when(|journal| journal.contains(&Call::Present { background: 2 }));
        let mut timeline = Timeline::new("t", vec![marker("a", 1), marker("b", 2), marker("c", 3)]);

        let outcome = timeline.run(&mut rig.stage).await.unwrap();

        assert_eq!(outcome.completed, vec!["a"]);
        assert_eq!(outcome.cancelled_in, Some("b"));
        assert_eq!(presented(&rig), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_start_runs_nothing() {
        let mut rig = Rig::new();
        rig.exit.request();
        let mut timeline = Timeline::new("t", vec![marker("a", 1)]);

        let outcome = timeline.run(&mut rig.stage).await.unwrap();

        assert!(outcome.cancelled_before_start);
        assert!(outcome.completed.is_empty());
        assert!(presented(&rig).is_empty());
        assert!(!rig.journal().contains(&Call::Play(Cue::Background)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_runs_once_after_cancel() {
        let mut rig = Rig::new();
        rig.cancel_after_polls(3);
        let mut timeline = Timeline::new("t", vec![marker("a", 1), marker("b", 2)]);

        timeline.run(&mut rig.stage).await.unwrap();
        rig.stage.teardown();

        let clears = rig.journal().iter().filter(|c| **c == Call::Clear).count();
        assert_eq!(clears, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_still_tears_down() {
        let mut rig = Rig::new();
        let mut timeline = Timeline::new("t", vec![marker("a", 1), Box::new(Failing), marker("c", 3)]);

        assert!(timeline.run(&mut rig.stage).await.is_err());
        assert_eq!(presented(&rig), vec![1]);
        assert!(rig.journal().contains(&Call::Clear));
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_music_can_be_disabled() {
        let mut rig = Rig::new();
        rig.load_cue(Cue::Background);
        let mut timeline = Timeline::new("t", vec![marker("a", 1)]).with_background_music(false);

        timeline.run(&mut rig.stage).await.unwrap();

        assert!(!rig.journal().contains(&Call::Play(Cue::Background)));
    }
}
