use image::RgbaImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::Result;
use crate::render::{Frame, BLACK};
use crate::services::Cue;
use crate::timeline::{Scene, Stage};

use super::sprite::{Envelope, GhostSprite};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GhostSwarmSpec {
    pub duration_ms: u64,
    pub tick_ms: u64,
    /// Вероятность появления призрака за один тик
    pub spawn_probability: f64,
    pub min_lifetime_ms: u64,
    pub max_lifetime_ms: u64,
    pub fade_ms: u64,
    pub max_opacity: f32,
}

impl Default for GhostSwarmSpec {
    fn default() -> Self {
        Self {
            duration_ms: 20_000,
            tick_ms: 50,
            spawn_probability: 0.03,
            min_lifetime_ms: 3000,
            max_lifetime_ms: 5000,
            fade_ms: 1000,
            max_opacity: 0.6,
        }
    }
}

impl GhostSwarmSpec {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(format!(
                "spawn_probability должно быть в диапазоне 0..=1, получено {}",
                self.spawn_probability
            ));
        }
        if !(0.0..=1.0).contains(&self.max_opacity) {
            return Err(format!("max_opacity должно быть в диапазоне 0..=1, получено {}", self.max_opacity));
        }
        if self.tick_ms == 0 {
            return Err("tick_ms должно быть больше 0".to_string());
        }
        if self.min_lifetime_ms == 0 || self.min_lifetime_ms > self.max_lifetime_ms {
            return Err(format!(
                "неверный диапазон времени жизни: {}..={}",
                self.min_lifetime_ms, self.max_lifetime_ms
            ));
        }
        Ok(())
    }

    fn envelope(&self) -> Envelope {
        Envelope {
            fade: Duration::from_millis(self.fade_ms),
            max_opacity: self.max_opacity,
        }
    }
}

/// Случайно появляющиеся полупрозрачные призраки.
///
/// softbuffer не даёт попиксельной прозрачности окна, поэтому призраки рисуются
/// поверх чёрного фона, а не поверх рабочего стола. Фон непрозрачный, значит и
/// клики оверлей забирает себе: иначе они уходили бы в невидимые окна.
pub struct GhostSwarm {
    spec: GhostSwarmSpec,
    rng: StdRng,
    sprites: SmallVec<[GhostSprite; 16]>,
}

impl GhostSwarm {
    pub fn new(spec: GhostSwarmSpec, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            spec,
            rng,
            sprites: SmallVec::new(),
        }
    }

    /// Один тик: убрать отжившие, возможно породить нового.
    /// Возвращает `true`, если появился призрак.
    fn step(&mut self, now: Duration, screen: (u32, u32), ghosts: &[RgbaImage]) -> bool {
        self.sprites.retain(|sprite| !sprite.is_expired(now));

        if ghosts.is_empty() || !self.rng.gen_bool(self.spec.spawn_probability.clamp(0.0, 1.0)) {
            return false;
        }

        let image = self.rng.gen_range(0..ghosts.len());
        let (x, y) = self.place(screen, ghosts[image].dimensions());
        let lifetime = self.rng.gen_range(self.spec.min_lifetime_ms..=self.spec.max_lifetime_ms);

        crate::debug_if_enabled!("Призрак #{} в ({}, {}) на {}мс", image, x, y, lifetime);
        self.sprites.push(GhostSprite {
            image,
            x,
            y,
            born: now,
            lifetime: Duration::from_millis(lifetime),
        });
        true
    }

    /// Случайная позиция, при которой спрайт целиком на экране, если помещается
    fn place(&mut self, (width, height): (u32, u32), (sprite_w, sprite_h): (u32, u32)) -> (i64, i64) {
        let axis_max = |screen: u32, sprite: u32| {
            if sprite <= screen {
                screen - sprite
            } else {
                screen.saturating_sub(1)
            }
        };
        let x = self.rng.gen_range(0..=axis_max(width, sprite_w));
        let y = self.rng.gen_range(0..=axis_max(height, sprite_h));
        (x as i64, y as i64)
    }

    /// Кадр с призраками от старых к новым
    fn render(&self, now: Duration, (width, height): (u32, u32), ghosts: &[RgbaImage]) -> Frame {
        let envelope = self.spec.envelope();
        let mut frame = Frame::filled(width, height, BLACK);

        for sprite in &self.sprites {
            if let Some(image) = ghosts.get(sprite.image) {
                frame.blend_image(image, sprite.x, sprite.y, sprite.opacity(now, &envelope));
            }
        }
        frame
    }
}

#[async_trait::async_trait(?Send)]
impl Scene for GhostSwarm {
    fn name(&self) -> &'static str {
        "ghost_swarm"
    }

    async fn run(&mut self, stage: &mut Stage) -> Result<()> {
        let screen = stage.overlay.size();
        let duration = Duration::from_millis(self.spec.duration_ms);
        let tick = Duration::from_millis(self.spec.tick_ms);
        let start = Instant::now();
        let mut spawned = 0usize;

        info!("Призраки на {:?}, {} картинок", duration, stage.assets.ghosts.len());
        stage.overlay.set_click_through(false);

        loop {
            let now = start.elapsed();
            if now >= duration {
                break;
            }

            if self.step(now, screen, &stage.assets.ghosts) {
                spawned += 1;
                stage.audio.play(Cue::Ghost, None);
            }

            let frame = self.render(now, screen, &stage.assets.ghosts);
            stage.overlay.present(&frame)?;

            if stage.wait(tick).await.is_cancelled() {
                self.sprites.clear();
                return Ok(());
            }
        }

        debug!("Рой завершён, появилось призраков: {}", spawned);
        self.sprites.clear();
        stage.overlay.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::placeholder_ghost;
    use crate::timeline::testing::{Call, Rig};

    fn always_spawn() -> GhostSwarmSpec {
        GhostSwarmSpec {
            duration_ms: 1000,
            spawn_probability: 1.0,
            ..GhostSwarmSpec::default()
        }
    }

    #[test]
    fn test_validation() {
        assert!(GhostSwarmSpec::default().validate().is_ok());

        let bad = [
            GhostSwarmSpec { spawn_probability: 1.5, ..Default::default() },
            GhostSwarmSpec { max_opacity: -0.1, ..Default::default() },
            GhostSwarmSpec { tick_ms: 0, ..Default::default() },
            GhostSwarmSpec { min_lifetime_ms: 6000, ..Default::default() },
        ];
        for spec in bad {
            assert!(spec.validate().is_err(), "{:?}", spec);
        }
    }

    #[test]
    fn test_sprites_stay_on_screen_and_expire() {
        let spec = GhostSwarmSpec {
            spawn_probability: 1.0,
            min_lifetime_ms: 200,
            max_lifetime_ms: 200,
            ..GhostSwarmSpec::default()
        };
        let mut swarm = GhostSwarm::new(spec, Some(7));
        let ghosts = vec![placeholder_ghost(16)];

        for tick in 0..20u64 {
            assert!(swarm.step(Duration::from_millis(tick * 50), (64, 48), &ghosts));
            // Живут 200мс при тике 50мс: не больше четырёх одновременно
            assert!(swarm.sprites.len() <= 4);
            for sprite in &swarm.sprites {
                assert!((0..=48).contains(&sprite.x));
                assert!((0..=32).contains(&sprite.y));
            }
        }
    }

    #[test]
    fn test_oversized_sprite_still_placed() {
        let mut swarm = GhostSwarm::new(GhostSwarmSpec::default(), Some(1));
        for _ in 0..50 {
            let (x, y) = swarm.place((10, 10), (64, 64));
            assert!((0..10).contains(&x) && (0..10).contains(&y));
        }
    }

    #[test]
    fn test_zero_probability_never_spawns() {
        let spec = GhostSwarmSpec {
            spawn_probability: 0.0,
            ..GhostSwarmSpec::default()
        };
        let mut swarm = GhostSwarm::new(spec, None);
        let ghosts = vec![placeholder_ghost(16)];

        for tick in 0..100u64 {
            assert!(!swarm.step(Duration::from_millis(tick * 50), (64, 48), &ghosts));
        }
    }

    #[test]
    fn test_render_fades_in() {
        let mut swarm = GhostSwarm::new(always_spawn(), Some(3));
        let ghosts = vec![image::RgbaImage::from_pixel(64, 48, image::Rgba([255, 255, 255, 255]))];
        swarm.step(Duration::ZERO, (64, 48), &ghosts);

        let born = swarm.render(Duration::ZERO, (64, 48), &ghosts);
        assert_eq!(born.background(), BLACK);

        let peak = swarm.render(Duration::from_secs(1), (64, 48), &ghosts);
        // 0.6 * 255 = 153
        assert_eq!(peak.background(), 0x999999);
    }

    #[tokio::test(start_paused = true)]
    async fn test_plays_ghost_cue_per_spawn_and_clears() {
        let mut rig = Rig::new();
        let mut swarm = GhostSwarm::new(always_spawn(), Some(11));

        swarm.run(&mut rig.stage).await.unwrap();

        assert_eq!(rig.count(&Call::Play(Cue::Ghost)), 20);
        // Чёрный фон перехватывает клики
        assert_eq!(rig.journal().first(), Some(&Call::ClickThrough(false)));
        assert!(!rig.journal().contains(&Call::ClickThrough(true)));
        assert_eq!(rig.journal().last(), Some(&Call::Clear));
        assert!(swarm.sprites.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_spawning() {
        let mut rig = Rig::new();
        rig.cancel_when(|journal| journal.contains(&Call::Play(Cue::Ghost)));
        let mut swarm = GhostSwarm::new(always_spawn(), Some(5));

        swarm.run(&mut rig.stage).await.unwrap();

        assert_eq!(rig.count(&Call::Play(Cue::Ghost)), 1);
        assert!(rig.stage.is_cancelled());
        assert!(swarm.sprites.is_empty());
    }
}
