//! Resolver, HTTP and object storage mocks.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Cursor;
use std::net::IpAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use vermeer_assets::{HttpFetcher, ObjectReader, ObjectStorage, Resolver};
use vermeer_error::{HttpError, StorageError, StorageErrorKind};

/// Resolver answering from a fixed table.
#[derive(Default)]
pub struct StaticResolver {
    hosts: Mutex<HashMap<String, Vec<IpAddr>>>,
    calls: AtomicUsize,
}

impl StaticResolver {
    pub fn add(&self, host: &str, addresses: Vec<IpAddr>) {
        self.hosts
            .lock()
            .unwrap()
            .insert(host.to_string(), addresses);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Resolver for StaticResolver {
    async fn resolve(&self, host: &str, _port: u16) -> std::io::Result<Vec<IpAddr>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.hosts
            .lock()
            .unwrap()
            .get(host)
            .cloned()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "unknown host"))
    }
}

/// HTTP fetcher serving registered bodies and 404 for everything else.
#[derive(Default)]
pub struct MockHttp {
    bodies: Mutex<HashMap<String, Vec<u8>>>,
    calls: AtomicUsize,
}

impl MockHttp {
    pub fn serve(&self, url: &str, data: Vec<u8>) {
        self.bodies.lock().unwrap().insert(url.to_string(), data);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpFetcher for MockHttp {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| HttpError::with_status(404, "Not Found"))
    }
}

/// Object storage backed by a map of URIs to bytes.
#[derive(Default)]
pub struct MemoryObjectStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStorage {
    pub fn put(&self, uri: &str, data: Vec<u8>) {
        self.objects.lock().unwrap().insert(uri.to_string(), data);
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn open(&self, uri: &str) -> Result<ObjectReader, StorageError> {
        let data = self
            .objects
            .lock()
            .unwrap()
            .get(uri)
            .cloned()
            .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(uri.to_string())))?;
        Ok(Box::new(Cursor::new(data)))
    }
}
