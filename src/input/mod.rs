pub mod events;
pub mod hover;

pub use events::{PathEvent, PointerEvent};
pub use hover::HoverTracker;
