//! Сцены сценария. У каждой есть блок параметров `*Spec`, который
//! читается из конфигурации.

pub mod blackout;
pub mod ghost_swarm;
pub mod jumpscare;
pub mod pause;
pub mod sprite;
pub mod thank_you;
pub mod typing;

pub use blackout::{Blackout, BlackoutSpec};
pub use ghost_swarm::{GhostSwarm, GhostSwarmSpec};
pub use jumpscare::{Jumpscare, JumpscareSpec};
pub use pause::{Pause, PauseSpec};
pub use sprite::{Envelope, GhostSprite};
pub use thank_you::{ThankYou, ThankYouSpec};
pub use typing::{Typing, TypingSpec};
