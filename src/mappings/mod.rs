pub mod char_to_key;
pub mod key_names;

pub use char_to_key::{CharToKey, KeyStroke};
pub use key_names::KeyNames;
