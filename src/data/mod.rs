pub mod conversion;

pub use conversion::path_from_geometry;
