pub mod exit_signal;
pub mod runner;
pub mod scene;
pub mod spec;
pub mod stage;

#[cfg(test)]
pub mod testing;

pub use exit_signal::ExitSignal;
pub use runner::{Outcome, Timeline};
pub use scene::Scene;
pub use spec::{SceneSpec, TimelineSpec};
pub use stage::{Flow, Services, Stage};
