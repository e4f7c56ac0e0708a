//! Test utilities for asset pipeline tests.
//!
//! Hand-written collaborators so no test touches the network.

#![allow(dead_code)]

pub mod mock_network;
pub mod mock_remote;

pub use mock_network::{MemoryObjectStorage, MockHttp, StaticResolver};
pub use mock_remote::MockRemoteStore;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::net::IpAddr;
use std::sync::Arc;
use vermeer_assets::{AssetPipeline, PipelineConfig};
use vermeer_cache::MemoryCache;

/// A public address used for hosts that should be accepted.
pub const PUBLIC_IP: &str = "93.184.216.34";

/// A small valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 128]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .expect("encode test PNG");
    out.into_inner()
}

/// Parse an address literal.
pub fn ip(addr: &str) -> IpAddr {
    addr.parse().expect("valid IP literal")
}

/// Everything a pipeline test needs to make assertions.
pub struct Harness {
    pub pipeline: AssetPipeline,
    pub cache: Arc<MemoryCache>,
    pub http: Arc<MockHttp>,
    pub resolver: Arc<StaticResolver>,
    pub storage: Arc<MemoryObjectStorage>,
    pub store: Arc<MockRemoteStore>,
}

impl Harness {
    /// Pipeline with every collaborator mocked.
    pub fn new(config: PipelineConfig) -> Self {
        let cache = Arc::new(MemoryCache::default());
        let http = Arc::new(MockHttp::default());
        let resolver = Arc::new(StaticResolver::default());
        let storage = Arc::new(MemoryObjectStorage::default());
        let store = Arc::new(MockRemoteStore::default());

        let pipeline = AssetPipeline::new(config, cache.clone(), http.clone())
            .with_resolver(resolver.clone())
            .with_object_storage(storage.clone())
            .with_remote_store(store.clone());

        Self {
            pipeline,
            cache,
            http,
            resolver,
            storage,
            store,
        }
    }

    /// Serve `data` at `url` from a host resolving to [`PUBLIC_IP`].
    pub fn serve_public(&self, host: &str, url: &str, data: Vec<u8>) {
        self.resolver.add(host, vec![ip(PUBLIC_IP)]);
        self.http.serve(url, data);
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
