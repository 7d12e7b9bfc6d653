// Dataset loader implementations
pub mod loader_trait;
pub mod file_loader;

pub use loader_trait::*;
pub use file_loader::*;
