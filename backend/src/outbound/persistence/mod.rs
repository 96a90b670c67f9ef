//! Store adapters implementing the domain repository ports.

pub mod memory;

pub use memory::MemoryStore;
