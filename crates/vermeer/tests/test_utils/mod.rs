//! Test utilities for generator tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::sync::Arc;
use vermeer::{AssetPipeline, HttpFetcher, MemoryCache, PipelineConfig, Resolver};
use vermeer_core::{
    Candidate, Content, GenerateOptions, GenerationResponse, InlineData, Part, RawResponse,
    RemoteAssetStore, RemoteGenerator, ResponsePart, UploadedFile,
};
use vermeer_error::{HttpError, RemoteError, RemoteErrorKind};

/// PNG signature followed by filler; enough for content sniffing.
pub fn png_stub() -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&[0u8; 24]);
    data
}

/// Every host resolves to one public address.
pub struct PublicResolver;

#[async_trait]
impl Resolver for PublicResolver {
    async fn resolve(&self, _host: &str, _port: u16) -> std::io::Result<Vec<IpAddr>> {
        Ok(vec!["93.184.216.34".parse().expect("valid IP")])
    }
}

/// Serves a fixed set of URLs.
#[derive(Default)]
pub struct StubHttp {
    bodies: Mutex<HashMap<String, Vec<u8>>>,
}

impl StubHttp {
    pub fn serve(&self, url: &str, data: Vec<u8>) {
        self.bodies.lock().unwrap().insert(url.to_string(), data);
    }
}

#[async_trait]
impl HttpFetcher for StubHttp {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        self.bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| HttpError::with_status(404, "Not Found"))
    }
}

/// What the mock generator should answer.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return one candidate with this finish reason and image
    Image { finish_reason: String, data: Vec<u8> },
    /// Fail the call
    Fail(u16),
    /// Never answer
    Hang,
}

/// Records every call and answers according to its behavior.
pub struct MockGenerator {
    behavior: MockBehavior,
    calls: Mutex<Vec<(String, Vec<Part>, GenerateOptions)>>,
}

impl MockGenerator {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn returning_image(data: Vec<u8>) -> Self {
        Self::new(MockBehavior::Image {
            finish_reason: "STOP".to_string(),
            data,
        })
    }

    pub fn calls(&self) -> Vec<(String, Vec<Part>, GenerateOptions)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_parts(&self) -> Vec<Part> {
        self.calls().last().map(|c| c.1.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RemoteGenerator for MockGenerator {
    async fn generate(
        &self,
        model: &str,
        parts: &[Part],
        options: &GenerateOptions,
    ) -> Result<GenerationResponse, RemoteError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), parts.to_vec(), options.clone()));

        match &self.behavior {
            MockBehavior::Image {
                finish_reason,
                data,
            } => Ok(GenerationResponse::from_raw(RawResponse {
                candidates: vec![Candidate {
                    finish_reason: Some(finish_reason.clone()),
                    content: Some(Content {
                        parts: vec![ResponsePart {
                            text: None,
                            inline_data: Some(InlineData {
                                mime_type: "image/jpeg".to_string(),
                                data: data.clone(),
                            }),
                        }],
                    }),
                }],
                prompt_feedback: None,
            })),
            MockBehavior::Fail(status_code) => Err(RemoteError::new(RemoteErrorKind::HttpError {
                status_code: *status_code,
                message: "mock failure".to_string(),
            })),
            MockBehavior::Hang => std::future::pending().await,
        }
    }
}

/// Remote asset store that records uploads and deletions.
#[derive(Default)]
pub struct RecordingStore {
    uploads: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
}

impl RecordingStore {
    /// Display names of uploaded files, in order.
    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    /// Internal names of deleted files, in order.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteAssetStore for RecordingStore {
    async fn upload(
        &self,
        _data: &[u8],
        _mime_type: &str,
        display_name: &str,
    ) -> Result<UploadedFile, RemoteError> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(display_name.to_string());
        let n = uploads.len();
        Ok(UploadedFile {
            uri: format!("https://files.example/v1beta/files/{}", n),
            name: format!("files/{}", n),
        })
    }

    async fn delete(&self, name: &str) -> Result<(), RemoteError> {
        self.deleted.lock().unwrap().push(name.to_string());
        Ok(())
    }
}

/// Pipeline over stub HTTP with a public resolver.
pub fn pipeline(http: Arc<StubHttp>) -> AssetPipeline {
    AssetPipeline::new(
        PipelineConfig::default(),
        Arc::new(MemoryCache::default()),
        http,
    )
    .with_resolver(Arc::new(PublicResolver))
}
