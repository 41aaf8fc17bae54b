mod types;
pub mod unification;

pub use types::Type;
pub use unification::{Unification, join};
