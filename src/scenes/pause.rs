use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;
use crate::timeline::{Scene, Stage};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PauseSpec {
    pub duration_ms: u64,
}

impl Default for PauseSpec {
    fn default() -> Self {
        Self { duration_ms: 3000 }
    }
}

/// Тишина перед началом: ничего не показываем, только ждём
pub struct Pause {
    spec: PauseSpec,
}

impl Pause {
    pub fn new(spec: PauseSpec) -> Self {
        Self { spec }
    }
}

#[async_trait::async_trait(?Send)]
impl Scene for Pause {
    fn name(&self) -> &'static str {
        "pause"
    }

    async fn run(&mut self, stage: &mut Stage) -> Result<()> {
        stage.wait(Duration::from_millis(self.spec.duration_ms)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::testing::Rig;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_waits_without_showing_anything() {
        let mut rig = Rig::new();
        let start = Instant::now();

        Pause::new(PauseSpec::default()).run(&mut rig.stage).await.unwrap();

        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert!(rig.journal().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_cuts_pause_short() {
        let mut rig = Rig::new();
        rig.cancel_after_polls(2);
        let start = Instant::now();

        Pause::new(PauseSpec { duration_ms: 60_000 }).run(&mut rig.stage).await.unwrap();

        assert!(start.elapsed() <= Duration::from_millis(300));
        assert!(rig.stage.is_cancelled());
    }
}
