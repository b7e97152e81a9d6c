use std::time::Duration;

/// Призрак на экране: появляется, светится и тает
#[derive(Debug, Clone, PartialEq)]
pub struct GhostSprite {
    /// Индекс картинки в `Assets::ghosts`
    pub image: usize,
    pub x: i64,
    pub y: i64,
    /// Время появления от начала сцены
    pub born: Duration,
    pub lifetime: Duration,
}

/// Огибающая прозрачности: нарастание, плато, затухание
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub fade: Duration,
    pub max_opacity: f32,
}

impl Envelope {
    /// Трапеция с плато `max_opacity`; ноль в момент появления и после `lifetime`
    pub fn opacity(&self, age: Duration, lifetime: Duration) -> f32 {
        if age >= lifetime {
            return 0.0;
        }
        if self.fade.is_zero() {
            return self.max_opacity;
        }

        let fade = self.fade.as_secs_f32();
        let rise = age.as_secs_f32() / fade;
        let fall = (lifetime - age).as_secs_f32() / fade;
        self.max_opacity * rise.min(fall).min(1.0)
    }
}

impl GhostSprite {
    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.born)
    }

    pub fn is_expired(&self, now: Duration) -> bool {
        self.age(now) >= self.lifetime
    }

    pub fn opacity(&self, now: Duration, envelope: &Envelope) -> f32 {
        envelope.opacity(self.age(now), self.lifetime)
    }
}
