//! # Shared endpoint test helpers
//!
//! In-memory object storage whose signed URLs point at a local mock HTTP
//! server, so reads go through the real `reqwest` fetch path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use tokio::sync::RwLock;
use transcript_qc_core::{StorageLayout, StorageObjectRef};

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::storage::{ObjectMetadata, ObjectStorage, SignedAccessGrant};

/// Stored object.
#[derive(Debug, Clone)]
pub struct MockObject {
    pub content: String,
    pub metadata: ObjectMetadata,
}

struct MockInner {
    base_url: String,
    objects: RwLock<HashMap<(String, String), MockObject>>,
    grants: RwLock<Vec<(StorageObjectRef, Duration)>>,
    fail_grants: AtomicBool,
    fail_writes: AtomicBool,
}

/// Mock storage. Clones share the same objects.
#[derive(Clone)]
pub struct MockObjectStorage {
    inner: Arc<MockInner>,
}

impl MockObjectStorage {
    /// Starts the mock HTTP server and returns the storage backed by it.
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let inner = Arc::new(MockInner {
            base_url: format!("http://127.0.0.1:{port}"),
            objects: RwLock::new(HashMap::new()),
            grants: RwLock::new(Vec::new()),
            fail_grants: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        });

        let app = axum::Router::new()
            .route("/{bucket}/{*key}", axum::routing::get(serve_object))
            .with_state(inner.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self { inner }
    }

    /// Puts an object directly, bypassing `write_content`.
    pub async fn insert(&self, bucket: &str, key: &str, content: &str) {
        self.inner.objects.write().await.insert(
            (bucket.to_string(), key.to_string()),
            MockObject {
                content: content.to_string(),
                metadata: ObjectMetadata {
                    original_video_id: String::new(),
                    last_modified: Utc::now(),
                },
            },
        );
    }

    /// Current object at `bucket/key`.
    pub async fn object(&self, bucket: &str, key: &str) -> Option<MockObject> {
        self.inner
            .objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Every grant issued so far with its lifetime.
    pub async fn grants(&self) -> Vec<(StorageObjectRef, Duration)> {
        self.inner.grants.read().await.clone()
    }

    /// Makes every following `grant_read` fail like a bad credential would.
    pub fn fail_grants(&self) {
        self.inner.fail_grants.store(true, Ordering::SeqCst);
    }

    /// Makes every following `write_content` fail.
    pub fn fail_writes(&self) {
        self.inner.fail_writes.store(true, Ordering::SeqCst);
    }
}

async fn serve_object(
    State(inner): State<Arc<MockInner>>,
    Path((bucket, key)): Path<(String, String)>,
) -> Response {
    match inner.objects.read().await.get(&(bucket, key)) {
        Some(object) => object.content.clone().into_response(),
        None => (StatusCode::NOT_FOUND, "NoSuchKey").into_response(),
    }
}

#[async_trait::async_trait]
impl ObjectStorage for MockObjectStorage {
    async fn grant_read(
        &self,
        object: &StorageObjectRef,
        ttl: Duration,
    ) -> Result<SignedAccessGrant, GatewayError> {
        if self.inner.fail_grants.load(Ordering::SeqCst) {
            return Err(GatewayError::AccessGrant("invalid credentials".to_string()));
        }
        self.inner.grants.write().await.push((object.clone(), ttl));
        let url = format!(
            "{}/{}/{}?X-Expires={}&X-Signature=test",
            self.inner.base_url,
            object.bucket,
            object.key,
            ttl.as_secs()
        );
        SignedAccessGrant::expiring_in(url, ttl)
    }

    async fn write_content(
        &self,
        object: &StorageObjectRef,
        content: &str,
        metadata: &ObjectMetadata,
    ) -> Result<(), GatewayError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(GatewayError::Write("HTTP 503".to_string()));
        }
        self.inner.objects.write().await.insert(
            (object.bucket.clone(), object.key.clone()),
            MockObject {
                content: content.to_string(),
                metadata: metadata.clone(),
            },
        );
        Ok(())
    }
}

/// Gateway state over `storage` with buckets `transcripts` / `videos` and
/// password `room101`.
pub fn test_state(storage: MockObjectStorage) -> Arc<GatewayState> {
    Arc::new(GatewayState {
        http_client: reqwest::Client::new(),
        storage: Box::new(storage),
        layout: StorageLayout::new("transcripts", "videos"),
        password: "room101".to_string(),
    })
}
