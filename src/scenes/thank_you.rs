use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::timeline::{Scene, Stage};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThankYouSpec {
    pub title: String,
    pub message: String,
}

impl Default for ThankYouSpec {
    fn default() -> Self {
        Self {
            title: "Thank You".to_string(),
            message: "Thank you for executing!".to_string(),
        }
    }
}

/// Финал: тишина, пустой экран и диалог, который надо закрыть
pub struct ThankYou {
    spec: ThankYouSpec,
}

impl ThankYou {
    pub fn new(spec: ThankYouSpec) -> Self {
        Self { spec }
    }
}

#[async_trait::async_trait(?Send)]
impl Scene for ThankYou {
    fn name(&self) -> &'static str {
        "thank_you"
    }

    async fn run(&mut self, stage: &mut Stage) -> Result<()> {
        stage.audio.stop_all();
        stage.overlay.clear();
        stage.overlay.acknowledge(&self.spec.title, &self.spec.message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::testing::{Call, Rig};

    #[tokio::test(start_paused = true)]
    async fn test_silences_and_acknowledges() {
        let mut rig = Rig::new();

        ThankYou::new(ThankYouSpec::default()).run(&mut rig.stage).await.unwrap();

        assert_eq!(
            rig.journal(),
            vec![
                Call::StopAll,
                Call::Clear,
                Call::Acknowledge("Thank You: Thank you for executing!".to_string()),
            ]
        );
    }
}
