pub mod packs;
pub mod round;
pub mod session;

pub use packs::resolve;
pub use round::RoundState;
pub use session::{Session, Snapshot};
