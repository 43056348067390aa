//! Concrete sources: local files, HTTP, in-process providers, and a
//! decoding adapter that turns bytes into a typed payload.

use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use super::{Locator, ResourceRequest, ResourceSource, SharedSource, SourceError};
use crate::net::fetch::{fetch_bytes, head, FetchError};

impl From<FetchError> for SourceError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Status(code) if code == 404 || code == 410 => {
                SourceError::NotFound(format!("HTTP {}", code))
            }
            FetchError::Status(code) => SourceError::Status(code),
            FetchError::TimedOut(budget) => SourceError::TimedOut {
                budget,
                elapsed: budget,
            },
            FetchError::Client(m) | FetchError::Request(m) | FetchError::Body(m) => {
                SourceError::Transport(m)
            }
        }
    }
}

// ── File ──

/// Bytes from the local filesystem (e.g. a bundled copy).
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    priority: i32,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ResourceSource for FileSource {
    type Payload = Vec<u8>;

    fn priority(&self) -> i32 {
        self.priority
    }

    fn locate(&self, _request: &ResourceRequest) -> Locator {
        Locator::File(self.path.clone())
    }

    fn fetch(&self, _request: &ResourceRequest, _budget: Duration) -> Result<Vec<u8>, SourceError> {
        std::fs::read(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SourceError::NotFound(self.path.display().to_string()),
            _ => SourceError::Io(format!("{}: {}", self.path.display(), e)),
        })
    }

    fn probe(&self, _request: &ResourceRequest, _budget: Duration) -> Result<(), SourceError> {
        if self.path.is_file() {
            Ok(())
        } else {
            Err(SourceError::NotFound(self.path.display().to_string()))
        }
    }
}

// ── HTTP ──

/// Bytes from an HTTP(S) endpoint (e.g. a mirror).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: Url,
    priority: i32,
}

impl HttpSource {
    pub fn new(url: Url) -> Self {
        Self { url, priority: 0 }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ResourceSource for HttpSource {
    type Payload = Vec<u8>;

    fn priority(&self) -> i32 {
        self.priority
    }

    fn locate(&self, _request: &ResourceRequest) -> Locator {
        Locator::Url(self.url.clone())
    }

    fn fetch(&self, _request: &ResourceRequest, budget: Duration) -> Result<Vec<u8>, SourceError> {
        let result = fetch_bytes(&self.url, budget)?;
        log::debug!(
            "GET {} -> {} ({} bytes, {})",
            result.url,
            result.status,
            result.body.len(),
            result.content_type
        );
        Ok(result.body)
    }

    fn probe(&self, _request: &ResourceRequest, budget: Duration) -> Result<(), SourceError> {
        head(&self.url, budget)?;
        Ok(())
    }
}

/// Byte source for a parsed locator.
pub fn byte_source(locator: &Locator) -> SharedSource<Vec<u8>> {
    match locator {
        Locator::File(path) => Arc::new(FileSource::new(path.clone())),
        Locator::Url(url) => Arc::new(HttpSource::new(url.clone())),
        Locator::Builtin(name) => {
            let missing = name.clone();
            Arc::new(FnSource::<Vec<u8>, _>::new(name, move |_: &ResourceRequest, _| {
                Err(SourceError::Unavailable(format!("no byte provider named {:?}", missing)))
            }))
        }
    }
}

// ── In-process ──

/// Source backed by a closure. Used for bundled engines and in tests.
pub struct FnSource<T, F> {
    name: String,
    priority: i32,
    f: F,
    _payload: PhantomData<fn() -> T>,
}

impl<T, F> FnSource<T, F>
where
    F: Fn(&ResourceRequest, Duration) -> Result<T, SourceError> + Send + Sync,
{
    pub fn new(name: &str, f: F) -> Self {
        Self {
            name: name.to_string(),
            priority: 0,
            f,
            _payload: PhantomData,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl<T, F> ResourceSource for FnSource<T, F>
where
    F: Fn(&ResourceRequest, Duration) -> Result<T, SourceError> + Send + Sync,
{
    type Payload = T;

    fn priority(&self) -> i32 {
        self.priority
    }

    fn locate(&self, _request: &ResourceRequest) -> Locator {
        Locator::Builtin(self.name.clone())
    }

    fn fetch(&self, request: &ResourceRequest, budget: Duration) -> Result<T, SourceError> {
        (self.f)(request, budget)
    }
}

// ── Decoding adapter ──

/// Wraps a byte source so that decoding is part of the same attempt:
/// bytes that arrive but do not decode fail this source.
pub struct Decoded<S, T, F> {
    inner: S,
    decode: F,
    _payload: PhantomData<fn() -> T>,
}

impl<S, T, F, E> Decoded<S, T, F>
where
    S: ResourceSource<Payload = Vec<u8>>,
    F: Fn(&[u8]) -> Result<T, E> + Send + Sync,
    E: std::fmt::Display,
{
    pub fn new(inner: S, decode: F) -> Self {
        Self {
            inner,
            decode,
            _payload: PhantomData,
        }
    }
}

impl<S, T, F, E> ResourceSource for Decoded<S, T, F>
where
    S: ResourceSource<Payload = Vec<u8>>,
    F: Fn(&[u8]) -> Result<T, E> + Send + Sync,
    E: std::fmt::Display,
{
    type Payload = T;

    fn priority(&self) -> i32 {
        self.inner.priority()
    }

    fn locate(&self, request: &ResourceRequest) -> Locator {
        self.inner.locate(request)
    }

    fn fetch(&self, request: &ResourceRequest, budget: Duration) -> Result<T, SourceError> {
        let bytes = self.inner.fetch(request, budget)?;
        (self.decode)(&bytes).map_err(|e| SourceError::Decode(e.to_string()))
    }

    fn probe(&self, request: &ResourceRequest, budget: Duration) -> Result<(), SourceError> {
        self.inner.probe(request, budget)
    }
}

impl<T> ResourceSource for SharedSource<T> {
    type Payload = T;

    fn priority(&self) -> i32 {
        self.as_ref().priority()
    }

    fn locate(&self, request: &ResourceRequest) -> Locator {
        self.as_ref().locate(request)
    }

    fn fetch(&self, request: &ResourceRequest, budget: Duration) -> Result<T, SourceError> {
        self.as_ref().fetch(request, budget)
    }

    fn probe(&self, request: &ResourceRequest, budget: Duration) -> Result<(), SourceError> {
        self.as_ref().probe(request, budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{ResourceKind, Resolver};

    fn req() -> ResourceRequest {
        ResourceRequest::new(ResourceKind::ItemAsset, "acme")
    }

    #[test]
    fn file_source_reads_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let src = FileSource::new(&path);
        assert_eq!(src.fetch(&req(), Duration::from_secs(1)).unwrap(), vec![1, 2, 3]);
        assert!(src.probe(&req(), Duration::from_secs(1)).is_ok());

        let missing = FileSource::new(dir.path().join("b.bin"));
        assert!(matches!(
            missing.fetch(&req(), Duration::from_secs(1)),
            Err(SourceError::NotFound(_))
        ));
    }

    #[test]
    fn decode_failure_fails_that_source_only() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.txt");
        let good = dir.path().join("good.txt");
        std::fs::write(&bad, "not a number").unwrap();
        std::fs::write(&good, "42").unwrap();

        let parse = |b: &[u8]| std::str::from_utf8(b).unwrap_or("").trim().parse::<u32>();
        let sources: Vec<SharedSource<u32>> = vec![
            Arc::new(Decoded::new(FileSource::new(&bad), parse)),
            Arc::new(Decoded::new(FileSource::new(&good), parse)),
        ];

        let outcome = Resolver::default().resolve(&req(), &sources);
        assert_eq!(outcome.source_index(), Some(1));
        assert_eq!(outcome.into_result().unwrap().0, 42);
    }

    #[test]
    fn byte_source_picks_kind_by_locator() {
        let file = byte_source(&Locator::File("x.png".into()));
        assert_eq!(file.locate(&req()), Locator::File("x.png".into()));

        let url = Url::parse("https://cdn.example/x.png").unwrap();
        let http = byte_source(&Locator::Url(url.clone()));
        assert_eq!(http.locate(&req()), Locator::Url(url));

        let builtin = byte_source(&Locator::Builtin("nothing".into()));
        assert!(matches!(
            builtin.fetch(&req(), Duration::from_secs(1)),
            Err(SourceError::Unavailable(_))
        ));
    }

    #[test]
    fn fetch_errors_map_to_source_errors() {
        assert!(matches!(
            SourceError::from(FetchError::Status(404)),
            SourceError::NotFound(_)
        ));
        assert_eq!(SourceError::from(FetchError::Status(503)), SourceError::Status(503));
        assert!(matches!(
            SourceError::from(FetchError::Request("refused".into())),
            SourceError::Transport(_)
        ));
    }
}
