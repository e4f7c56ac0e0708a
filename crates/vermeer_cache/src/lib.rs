//! Cache-aside storage for the Vermeer asset pipeline.
//!
//! Two namespaces share one backend: bytes fetched from a source URI, and the
//! remote registration for a source URI. Values read back are trusted; they
//! were validated when written.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod backend;
mod memory;
mod typed;
mod value;

pub use backend::AssetCache;
pub use memory::{CacheEntry, MemoryCache, MemoryCacheConfig};
pub use typed::TypedCache;
pub use value::{BYTES_PREFIX, CacheValue, HANDLE_PREFIX, bytes_key, handle_key};
