//! Request extractors shared by the domain routers.

pub mod uuid_path;

pub use uuid_path::UuidPath;
