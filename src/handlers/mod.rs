//! Concrete sink implementations

pub mod console;
pub mod file;
pub mod memory;

pub use console::ConsoleHandler;
pub use file::FileHandler;
pub use memory::MemoryHandler;

// Re-export the contract for convenience
pub use crate::core::Handler;
