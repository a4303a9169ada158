pub mod index;

pub use index::{IndexedPath, PathIndex};
