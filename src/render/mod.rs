pub mod font;
pub mod frame;
pub mod ghost;

pub use font::draw_text_centered;
pub use frame::{Frame, BLACK, NEAR_BLACK, RED};
pub use ghost::placeholder_ghost;
