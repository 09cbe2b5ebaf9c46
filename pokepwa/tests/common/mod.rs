#![allow(dead_code)]
use async_trait::async_trait;
use pokepwa::prelude::*;
use pokepwa::cache::http::StatusCode;
use pokepwa::url::Url;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const ORIGIN: &str = "http://localhost:3000/";

pub fn origin() -> Url {
    Url::parse(ORIGIN).unwrap()
}

pub fn url(s: &str) -> Url {
    origin().join(s).unwrap()
}

pub fn ok(body: &str) -> Response {
    Response::new(StatusCode::OK, body.to_string())
}

enum Reply {
    Respond(Response),
    Fail,
}

/// Fetcher answering from a script. Unscripted URLs fail like an offline
/// network; `go_offline` makes every URL fail. Each fetch yields once after it
/// is recorded, so concurrent requests interleave like real network calls.
#[derive(Default)]
pub struct MockFetcher {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<Request>>,
    offline: Mutex<bool>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, response: Response) {
        self.replies
            .lock()
            .unwrap()
            .insert(url.to_string(), Reply::Respond(response));
    }

    pub fn fail(&self, url: &str) {
        self.replies.lock().unwrap().insert(url.to_string(), Reply::Fail);
    }

    pub fn go_offline(&self) {
        *self.offline.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<Request> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.as_str() == url)
            .count()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        self.calls.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;
        if *self.offline.lock().unwrap() {
            return Err(FetchError::Network("offline".to_string()));
        }
        match self.replies.lock().unwrap().get(request.url.as_str()) {
            Some(Reply::Respond(response)) => Ok(response.clone()),
            Some(Reply::Fail) | None => {
                Err(FetchError::Network(format!("no route to {}", request.url)))
            }
        }
    }
}

/// In-memory storage whose deletes fail for selected partition names and whose
/// listing can be made to fail.
#[derive(Default)]
pub struct FlakyStorage {
    pub inner: InMemoryCacheStorage,
    pub undeletable: HashSet<String>,
    pub fail_names: bool,
}

#[async_trait]
impl CacheStorage for FlakyStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>, CacheError> {
        self.inner.open(name).await
    }

    async fn existing(&self, name: &str) -> Result<Option<Arc<dyn Cache>>, CacheError> {
        self.inner.existing(name).await
    }

    async fn has(&self, name: &str) -> Result<bool, CacheError> {
        self.inner.has(name).await
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        if self.undeletable.contains(name) {
            return Err(CacheError::Backend(format!("{name} is locked")));
        }
        self.inner.delete(name).await
    }

    async fn names(&self) -> Result<Vec<String>, CacheError> {
        if self.fail_names {
            return Err(CacheError::Backend("listing unavailable".to_string()));
        }
        self.inner.names().await
    }
}

/// In-memory storage that yields once after listing its partitions, leaving
/// room for a concurrent delete between the listing and the lookups. Keeps the
/// trait's default `match_any`.
#[derive(Default)]
pub struct YieldingStorage {
    pub inner: InMemoryCacheStorage,
}

#[async_trait]
impl CacheStorage for YieldingStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>, CacheError> {
        self.inner.open(name).await
    }

    async fn existing(&self, name: &str) -> Result<Option<Arc<dyn Cache>>, CacheError> {
        self.inner.existing(name).await
    }

    async fn has(&self, name: &str) -> Result<bool, CacheError> {
        self.inner.has(name).await
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        self.inner.delete(name).await
    }

    async fn names(&self) -> Result<Vec<String>, CacheError> {
        let names = self.inner.names().await?;
        tokio::task::yield_now().await;
        Ok(names)
    }
}

/// Host that refuses every request.
pub struct BrokenHost;

#[async_trait]
impl Host for BrokenHost {
    async fn skip_waiting(&self) -> Result<(), HostError> {
        Err(HostError::Lock("broken".to_string()))
    }

    async fn claim_clients(&self, _version: &str) -> Result<usize, HostError> {
        Err(HostError::Lock("broken".to_string()))
    }
}

pub struct Harness {
    pub storage: Arc<InMemoryCacheStorage>,
    pub fetcher: Arc<MockFetcher>,
    pub host: Arc<LocalHost>,
    pub worker: ServiceWorker,
}

pub fn harness() -> Harness {
    let storage = Arc::new(InMemoryCacheStorage::new());
    let fetcher = Arc::new(MockFetcher::new());
    let host = Arc::new(LocalHost::new());
    let options = WorkerOptionsBuilder::default()
        .origin(origin())
        .build()
        .unwrap();
    let worker =
        ServiceWorker::new(options, storage.clone(), fetcher.clone(), host.clone()).unwrap();

    Harness {
        storage,
        fetcher,
        host,
        worker,
    }
}

/// Script a 200 for every default manifest entry.
pub fn script_manifest(fetcher: &MockFetcher) {
    for entry in Manifest::default().entries() {
        fetcher.respond(url(entry).as_str(), ok(&format!("asset {entry}")));
    }
}
