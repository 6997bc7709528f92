pub mod interaction;
pub mod property;
pub mod scored;
pub mod user;

pub use interaction::{EventKind, InteractionEvent};
pub use property::Property;
pub use scored::{ScoredProperty, SnapshotRecord};
pub use user::{NewUser, User, UserUpdate};
