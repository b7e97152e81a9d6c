use serde::{Deserialize, Serialize};

use crate::scenes::{
    Blackout, BlackoutSpec, GhostSwarm, GhostSwarmSpec, Jumpscare, JumpscareSpec, Pause, PauseSpec,
    ThankYou, ThankYouSpec, Typing, TypingSpec,
};

use super::runner::Timeline;
use super::scene::Scene;

/// Описание сцены в конфигурации: `kind` плюс параметры сцены
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneSpec {
    Pause(PauseSpec),
    Blackout(BlackoutSpec),
    GhostSwarm(GhostSwarmSpec),
    Typing(TypingSpec),
    Jumpscare(JumpscareSpec),
    ThankYou(ThankYouSpec),
}

impl SceneSpec {
    pub fn name(&self) -> &'static str {
        match self {
            SceneSpec::Pause(_) => "pause",
            SceneSpec::Blackout(_) => "blackout",
            SceneSpec::GhostSwarm(_) => "ghost_swarm",
            SceneSpec::Typing(_) => "typing",
            SceneSpec::Jumpscare(_) => "jumpscare",
            SceneSpec::ThankYou(_) => "thank_you",
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            SceneSpec::Blackout(spec) => spec.validate(),
            SceneSpec::GhostSwarm(spec) => spec.validate(),
            _ => Ok(()),
        }
    }

    /// `seed` задаёт генератор случайных чисел роя; `None` для настоящей случайности
    pub fn build(&self, seed: Option<u64>) -> Box<dyn Scene> {
        match self {
            SceneSpec::Pause(spec) => Box::new(Pause::new(spec.clone())),
            SceneSpec::Blackout(spec) => Box::new(Blackout::new(spec.clone())),
            SceneSpec::GhostSwarm(spec) => Box::new(GhostSwarm::new(spec.clone(), seed)),
            SceneSpec::Typing(spec) => Box::new(Typing::new(spec.clone())),
            SceneSpec::Jumpscare(spec) => Box::new(Jumpscare::new(spec.clone())),
            SceneSpec::ThankYou(spec) => Box::new(ThankYou::new(spec.clone())),
        }
    }
}

/// Именованный сценарий: встроенный пресет или список сцен из конфигурации
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSpec {
    pub name: String,
    pub scenes: Vec<SceneSpec>,
}

const PRESETS: [&str; 3] = ["classic", "swarm", "possessed"];

impl TimelineSpec {
    pub fn new(name: impl Into<String>, scenes: Vec<SceneSpec>) -> Self {
        Self {
            name: name.into(),
            scenes,
        }
    }

    pub fn preset_names() -> Vec<&'static str> {
        PRESETS.to_vec()
    }

    pub fn preset(name: &str) -> Option<Self> {
        let scenes = match name {
            // Печать сразу после мигания
            "classic" => vec![
                SceneSpec::Pause(PauseSpec::default()),
                SceneSpec::Blackout(BlackoutSpec::default()),
                SceneSpec::Typing(TypingSpec::default()),
                SceneSpec::Jumpscare(JumpscareSpec::default()),
                SceneSpec::ThankYou(ThankYouSpec::default()),
            ],
            // Рой призраков перед печатью
            "swarm" => vec![
                SceneSpec::Pause(PauseSpec::default()),
                SceneSpec::Blackout(BlackoutSpec {
                    blinks: 6,
                    ..BlackoutSpec::default()
                }),
                SceneSpec::GhostSwarm(GhostSwarmSpec::default()),
                SceneSpec::Typing(TypingSpec::default()),
                SceneSpec::Jumpscare(JumpscareSpec::default()),
                SceneSpec::ThankYou(ThankYouSpec::default()),
            ],
            // Короткое мигание, другой текст и рой после печати
            "possessed" => vec![
                SceneSpec::Pause(PauseSpec::default()),
                SceneSpec::Blackout(BlackoutSpec {
                    blinks: 4,
                    hold_ms: 2000,
                    ..BlackoutSpec::default()
                }),
                SceneSpec::Typing(TypingSpec {
                    fallback_text: "i am still here. ".repeat(40),
                    ..TypingSpec::default()
                }),
                SceneSpec::GhostSwarm(GhostSwarmSpec::default()),
                SceneSpec::Jumpscare(JumpscareSpec::default()),
                SceneSpec::ThankYou(ThankYouSpec::default()),
            ],
            _ => return None,
        };

        Some(Self::new(name, scenes))
    }

    pub fn scene_names(&self) -> Vec<&'static str> {
        self.scenes.iter().map(SceneSpec::name).collect()
    }

    /// Собрать исполняемый сценарий. Каждый рой получает своё зерно,
    /// чтобы два роя в одном сценарии не повторяли друг друга.
    pub fn build(&self, background_music: bool, seed: Option<u64>) -> Timeline {
        let scenes = self
            .scenes
            .iter()
            .enumerate()
            .map(|(i, scene)| scene.build(seed.map(|s| s.wrapping_add(i as u64))))
            .collect();

        Timeline::new(self.name.clone(), scenes).with_background_music(background_music)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Assets;
    use crate::services::Cue;
    use crate::timeline::testing::{Call, Rig};

    #[test]
    fn test_presets() {
        for name in TimelineSpec::preset_names() {
            let spec = TimelineSpec::preset(name).unwrap();
            assert_eq!(spec.name, name);
            assert_eq!(spec.scene_names().first(), Some(&"pause"));
            assert_eq!(spec.scene_names().last(), Some(&"thank_you"));
            assert!(spec.scenes.iter().all(|s| s.validate().is_ok()));
        }

        assert_eq!(
            TimelineSpec::preset("classic").unwrap().scene_names(),
            vec!["pause", "blackout", "typing", "jumpscare", "thank_you"]
        );
        assert_eq!(
            TimelineSpec::preset("swarm").unwrap().scene_names(),
            vec!["pause", "blackout", "ghost_swarm", "typing", "jumpscare", "thank_you"]
        );
        assert_eq!(
            TimelineSpec::preset("possessed").unwrap().scene_names(),
            vec!["pause", "blackout", "typing", "ghost_swarm", "jumpscare", "thank_you"]
        );
        assert!(TimelineSpec::preset("nope").is_none());
    }

    #[test]
    fn test_scene_spec_from_toml() {
        let spec: SceneSpec = toml_value(r#"kind = "blackout"
blinks = 2"#);
        assert_eq!(
            spec,
            SceneSpec::Blackout(BlackoutSpec {
                blinks: 2,
                ..BlackoutSpec::default()
            })
        );

        let spec: SceneSpec = toml_value(r#"kind = "thank_you""#);
        assert_eq!(spec, SceneSpec::ThankYou(ThankYouSpec::default()));
    }

    fn toml_value(source: &str) -> SceneSpec {
        use figment::providers::{Format, Toml};
        figment::Figment::from(Toml::string(source)).extract().unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_classic_completes_with_acknowledgement() {
        let mut rig = Rig::new();
        for cue in Cue::ALL {
            rig.load_cue(cue);
        }
        rig.set_busy_polls(20);
        let mut timeline = TimelineSpec::preset("classic").unwrap().build(true, Some(1));

        let outcome = timeline.run(&mut rig.stage).await.unwrap();

        assert_eq!(outcome.completed, vec!["pause", "blackout", "typing", "jumpscare", "thank_you"]);
        assert!(!outcome.is_cancelled());

        let journal = rig.journal();
        assert_eq!(journal.first(), Some(&Call::Play(Cue::Background)));
        assert!(journal.contains(&Call::Play(Cue::Jumpscare)));
        assert!(journal
            .iter()
            .any(|c| matches!(c, Call::Acknowledge(text) if text.starts_with("Thank You"))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_swarm_cancelled_during_ghosts_never_scares() {
        let mut rig = Rig::new();
        rig.cancel_when(|journal| journal.contains(&Call::Play(Cue::Ghost)));

        let mut spec = TimelineSpec::preset("swarm").unwrap();
        for scene in &mut spec.scenes {
            if let SceneSpec::GhostSwarm(swarm) = scene {
                swarm.spawn_probability = 1.0;
            }
        }
        let mut timeline = spec.build(false, Some(2));

        let outcome = timeline.run(&mut rig.stage).await.unwrap();

        assert_eq!(outcome.completed, vec!["pause", "blackout"]);
        assert_eq!(outcome.cancelled_in, Some("ghost_swarm"));

        let journal = rig.journal();
        assert!(!journal.contains(&Call::Play(Cue::Jumpscare)));
        assert!(!journal.contains(&Call::EditorOpen));
        assert!(!journal.iter().any(|c| matches!(c, Call::Acknowledge(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_preset_completes_without_assets() {
        for name in TimelineSpec::preset_names() {
            let mut rig = Rig::with_assets(Assets::fallback());
            let mut timeline = TimelineSpec::preset(name).unwrap().build(true, Some(3));

            let outcome = timeline.run(&mut rig.stage).await.unwrap();

            assert_eq!(outcome.completed.len(), timeline.scene_names().len(), "{}", name);
            // Без файлов: красный экран вместо скримера и встроенный текст
            assert!(rig.journal().contains(&Call::Present { background: crate::render::RED }));
            let typed = rig.typed();
            assert!(typed.len() > 16 && typed.ends_with("DO NOT LOOK BACK"), "{}", name);
        }
    }
}
