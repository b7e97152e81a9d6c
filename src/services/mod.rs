pub mod audio;
pub mod editor;
pub mod keyboard_listener;
pub mod overlay;
pub mod virtual_device;

pub use audio::{create_audio_player, AudioPlayer, Cue, SoundBank};
pub use editor::{Editor, ProcessEditor};
pub use keyboard_listener::{create_cancel_source, CancelSource};
pub use overlay::{create_overlay, Overlay};
pub use virtual_device::{Keystrokes, VirtualDevice, VIRTUAL_KEYBOARD_NAME};
