use crate::error::Result;

use super::stage::Stage;

/// Одна сцена сценария.
///
/// `run` возвращается, когда сцена отыграла или когда замечена отмена;
/// во втором случае runner не переходит к следующей сцене.
#[async_trait::async_trait(?Send)]
pub trait Scene {
    fn name(&self) -> &'static str;

    async fn run(&mut self, stage: &mut Stage) -> Result<()>;
}
