pub mod http;
pub mod memory;

pub use http::HttpTransport;
pub use memory::MemoryTransport;

#[cfg(test)]
pub(crate) mod testing;
