mod dry_run;
mod winit_overlay;
mod r#trait;

pub use self::dry_run::DryRunOverlay;
pub use self::r#trait::Overlay;
pub use self::winit_overlay::WinitOverlay;

use crate::config::OverlayConfig;
use crate::error::Result;

/// Factory function to create the overlay; a real one needs a display
pub fn create_overlay(config: &OverlayConfig, dry_run: bool) -> Result<Box<dyn Overlay>> {
    if dry_run {
        Ok(Box::new(DryRunOverlay::new(config.dry_run_width, config.dry_run_height)))
    } else {
        Ok(Box::new(WinitOverlay::new(&config.title)?))
    }
}
