use crate::render::Frame;
use crate::error::Result;

/// Fullscreen top-most window the scenes draw on
pub trait Overlay {
    /// Screen size in physical pixels; frames are composed at this size
    fn size(&self) -> (u32, u32);

    /// `true`: pointer input passes to the desktop underneath
    fn set_click_through(&mut self, enabled: bool);

    /// Show `frame` and make the overlay visible
    fn present(&mut self, frame: &Frame) -> Result<()>;

    /// Hide the overlay so the desktop is visible again
    fn clear(&mut self);

    /// Process pending window-system events without blocking.
    /// Returns `true` if the user asked to quit through the window (Escape, close).
    fn pump(&mut self) -> bool;

    /// Blocking informational dialog shown at the very end
    fn acknowledge(&mut self, title: &str, message: &str);
}
