pub mod context_memory;

pub use context_memory::MemorySessionInfo;
