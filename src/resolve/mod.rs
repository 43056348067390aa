//! Ranked resource resolution.
//!
//! A request is tried against an ordered list of sources, one attempt per
//! source, strictly one after another. The first source that yields a
//! usable payload wins; later sources are never touched. If every source
//! fails, the caller gets every per-source error, in the order tried.
//!
//! The resolver has no failure policy of its own. Whether a failure is
//! fatal (engine module, catalog) or recoverable (a logo) is decided by
//! the caller.

pub mod sources;

use std::fmt;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use url::Url;

pub use sources::{byte_source, Decoded, FileSource, FnSource, HttpSource};

/// Default per-attempt time budget.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

// ── Requests ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// The rendering engine itself; exhaustion is fatal
    EngineModule,
    /// A per-item decorative asset (logo); exhaustion falls back to a placeholder
    ItemAsset,
    /// The brand catalog document
    Catalog,
    /// Optional scene decoration (centerpiece model)
    Decoration,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::EngineModule => "engine-module",
            ResourceKind::ItemAsset => "item-asset",
            ResourceKind::Catalog => "catalog",
            ResourceKind::Decoration => "decoration",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRequest {
    pub kind: ResourceKind,
    pub id: String,
}

impl ResourceRequest {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }
}

impl fmt::Display for ResourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

// ── Locators ──

/// Where a source gets its bytes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    File(PathBuf),
    Url(Url),
    /// In-process provider (e.g. a bundled engine), named for diagnostics
    Builtin(String),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::File(p) => write!(f, "{}", p.display()),
            Locator::Url(u) => write!(f, "{}", u),
            Locator::Builtin(name) => write!(f, "builtin:{}", name),
        }
    }
}

/// Base against which relative locators are joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetBase {
    Dir(PathBuf),
    Url(Url),
}

impl AssetBase {
    /// `http(s)://...` becomes a URL base, anything else a directory.
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {
                // Url::join drops the last segment unless the base ends in '/'
                if u.path().ends_with('/') {
                    AssetBase::Url(u)
                } else {
                    let mut u = u;
                    let path = format!("{}/", u.path());
                    u.set_path(&path);
                    AssetBase::Url(u)
                }
            }
            _ => AssetBase::Dir(PathBuf::from(raw)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    #[error("empty locator")]
    Empty,
    #[error("unsupported scheme {0:?}")]
    UnsupportedScheme(String),
    #[error("cannot join {raw:?} onto {base}: {reason}")]
    Join {
        raw: String,
        base: String,
        reason: String,
    },
}

impl Locator {
    /// Parse a raw catalog string. Absolute `http(s)` and `file` URLs are
    /// taken as-is; anything else is relative to `base` (or the working
    /// directory when there is no base).
    pub fn parse(raw: &str, base: Option<&AssetBase>) -> Result<Self, LocatorError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(LocatorError::Empty);
        }

        if let Ok(url) = Url::parse(raw) {
            return match url.scheme() {
                "http" | "https" => Ok(Locator::Url(url)),
                "file" => url
                    .to_file_path()
                    .map(Locator::File)
                    .map_err(|_| LocatorError::UnsupportedScheme("file".into())),
                // Windows drive letters parse as a one-letter scheme
                s if s.len() == 1 => Ok(Locator::File(PathBuf::from(raw))),
                s => Err(LocatorError::UnsupportedScheme(s.to_string())),
            };
        }

        // Protocol-relative
        if let Some(rest) = raw.strip_prefix("//") {
            return Url::parse(&format!("https://{}", rest))
                .map(Locator::Url)
                .map_err(|e| LocatorError::Join {
                    raw: raw.to_string(),
                    base: "https:".into(),
                    reason: e.to_string(),
                });
        }

        match base {
            Some(AssetBase::Url(base_url)) => base_url
                .join(raw)
                .map(Locator::Url)
                .map_err(|e| LocatorError::Join {
                    raw: raw.to_string(),
                    base: base_url.to_string(),
                    reason: e.to_string(),
                }),
            Some(AssetBase::Dir(dir)) => Ok(Locator::File(dir.join(raw.trim_start_matches('/')))),
            None => Ok(Locator::File(PathBuf::from(raw))),
        }
    }
}

// ── Errors ──

/// One failed attempt of one source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("payload rejected: {0}")]
    Decode(String),
    #[error("timed out after {elapsed:?} (budget {budget:?})")]
    TimedOut { budget: Duration, elapsed: Duration },
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// A failed attempt, tagged with where it happened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("source #{source_index} ({locator}): {error}")]
pub struct SourceFailure {
    /// Index into the caller's source list
    pub source_index: usize,
    pub locator: Locator,
    pub error: SourceError,
}

/// Join a failure list into one log-friendly line.
pub fn describe_failures(failures: &[SourceFailure]) -> String {
    if failures.is_empty() {
        return "no sources configured".to_string();
    }
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// ── Outcome ──

/// Never partially successful: either one payload or every error.
#[derive(Debug)]
pub enum ResolutionOutcome<T> {
    Success { payload: T, source_index: usize },
    Failure { errors: Vec<SourceFailure> },
}

impl<T> ResolutionOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ResolutionOutcome::Success { .. })
    }

    pub fn source_index(&self) -> Option<usize> {
        match self {
            ResolutionOutcome::Success { source_index, .. } => Some(*source_index),
            ResolutionOutcome::Failure { .. } => None,
        }
    }

    pub fn errors(&self) -> &[SourceFailure] {
        match self {
            ResolutionOutcome::Success { .. } => &[],
            ResolutionOutcome::Failure { errors } => errors,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResolutionOutcome<U> {
        match self {
            ResolutionOutcome::Success {
                payload,
                source_index,
            } => ResolutionOutcome::Success {
                payload: f(payload),
                source_index,
            },
            ResolutionOutcome::Failure { errors } => ResolutionOutcome::Failure { errors },
        }
    }

    pub fn into_result(self) -> Result<(T, usize), Vec<SourceFailure>> {
        match self {
            ResolutionOutcome::Success {
                payload,
                source_index,
            } => Ok((payload, source_index)),
            ResolutionOutcome::Failure { errors } => Err(errors),
        }
    }
}

// ── Sources ──

/// A candidate provider for a request.
///
/// `fetch` is a single all-or-nothing attempt: a usable payload or an
/// error, nothing in between. Sources must not retry internally.
pub trait ResourceSource: Send + Sync {
    type Payload;

    /// Lower ranks are tried first; ties keep list order.
    fn priority(&self) -> i32 {
        0
    }

    fn locate(&self, request: &ResourceRequest) -> Locator;

    fn fetch(&self, request: &ResourceRequest, budget: Duration)
        -> Result<Self::Payload, SourceError>;

    /// Cheap existence check before a full load.
    fn probe(&self, _request: &ResourceRequest, _budget: Duration) -> Result<(), SourceError> {
        Ok(())
    }
}

pub type SharedSource<T> = Arc<dyn ResourceSource<Payload = T>>;

/// Tries sources in rank order, one bounded attempt each.
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    attempt_timeout: Duration,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPT_TIMEOUT)
    }
}

impl Resolver {
    pub fn new(attempt_timeout: Duration) -> Self {
        Self { attempt_timeout }
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Source indices in the order they will be attempted.
    pub fn attempt_order<T>(sources: &[SharedSource<T>]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..sources.len()).collect();
        // Stable: equal priorities keep list order
        order.sort_by_key(|&i| sources[i].priority());
        order
    }

    pub fn resolve<T: Send + 'static>(
        &self,
        request: &ResourceRequest,
        sources: &[SharedSource<T>],
    ) -> ResolutionOutcome<T> {
        let mut errors = Vec::new();

        for index in Self::attempt_order(sources) {
            let source = &sources[index];
            let locator = source.locate(request);
            log::debug!("Resolve {} via #{} ({})", request, index, locator);

            match self.attempt(request, source) {
                Ok(payload) => {
                    log::debug!("Resolved {} via #{} ({})", request, index, locator);
                    return ResolutionOutcome::Success {
                        payload,
                        source_index: index,
                    };
                }
                Err(error) => {
                    log::debug!("Source #{} failed for {}: {}", index, request, error);
                    errors.push(SourceFailure {
                        source_index: index,
                        locator,
                        error,
                    });
                }
            }
        }

        ResolutionOutcome::Failure { errors }
    }

    /// Presence check across sources: index of the first source whose
    /// probe succeeds, or every probe error.
    pub fn probe<T: Send + 'static>(
        &self,
        request: &ResourceRequest,
        sources: &[SharedSource<T>],
    ) -> Result<usize, Vec<SourceFailure>> {
        let mut errors = Vec::new();
        for index in Self::attempt_order(sources) {
            let source = &sources[index];
            let worker = Arc::clone(source);
            let req = request.clone();
            let budget = self.attempt_timeout;
            match self.bounded(move || worker.probe(&req, budget)) {
                Ok(()) => return Ok(index),
                Err(error) => errors.push(SourceFailure {
                    source_index: index,
                    locator: source.locate(request),
                    error,
                }),
            }
        }
        Err(errors)
    }

    fn attempt<T: Send + 'static>(
        &self,
        request: &ResourceRequest,
        source: &SharedSource<T>,
    ) -> Result<T, SourceError> {
        let worker = Arc::clone(source);
        let req = request.clone();
        let budget = self.attempt_timeout;
        self.bounded(move || worker.fetch(&req, budget))
    }

    /// Run `job` on its own thread and wait at most the attempt budget.
    /// A job that overruns is abandoned: it keeps running detached and its
    /// answer, if any, is dropped.
    fn bounded<R, F>(&self, job: F) -> Result<R, SourceError>
    where
        R: Send + 'static,
        F: FnOnce() -> Result<R, SourceError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let start = Instant::now();
        std::thread::Builder::new()
            .name("resolve-attempt".into())
            .spawn(move || {
                let _ = tx.send(job());
            })
            .map_err(|e| SourceError::Unavailable(format!("cannot start attempt: {}", e)))?;

        match rx.recv_timeout(self.attempt_timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let elapsed = start.elapsed();
                log::debug!("Attempt abandoned after {:?}", elapsed);
                Err(SourceError::TimedOut {
                    budget: self.attempt_timeout,
                    elapsed,
                })
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(SourceError::Unavailable("attempt aborted without an answer".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn fake(
        name: &str,
        ok: bool,
        calls: Arc<AtomicUsize>,
    ) -> SharedSource<String> {
        let label = name.to_string();
        Arc::new(FnSource::new(name, move |_req: &ResourceRequest, _budget| {
            calls.fetch_add(1, Ordering::SeqCst);
            if ok {
                Ok(format!("payload from {}", label))
            } else {
                Err(SourceError::Unavailable(format!("{} is down", label)))
            }
        }))
    }

    fn request() -> ResourceRequest {
        ResourceRequest::new(ResourceKind::EngineModule, "engine")
    }

    #[test]
    fn first_success_wins_and_later_sources_are_untouched() {
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        let c = Arc::new(AtomicUsize::new(0));
        let sources = vec![
            fake("a", false, a.clone()),
            fake("b", true, b.clone()),
            fake("c", true, c.clone()),
        ];

        let outcome = Resolver::default().resolve(&request(), &sources);
        match outcome {
            ResolutionOutcome::Success {
                payload,
                source_index,
            } => {
                assert_eq!(source_index, 1);
                assert_eq!(payload, "payload from b");
            }
            ResolutionOutcome::Failure { errors } => panic!("unexpected failure: {:?}", errors),
        }
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
        assert_eq!(c.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn exhaustion_reports_every_error_in_order() {
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        let sources = vec![fake("a", false, a.clone()), fake("b", false, b.clone())];

        let outcome = Resolver::default().resolve(&request(), &sources);
        assert!(!outcome.is_success());
        let errors = outcome.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].source_index, 0);
        assert_eq!(errors[0].locator, Locator::Builtin("a".into()));
        assert_eq!(errors[1].source_index, 1);
        assert_eq!(errors[1].error, SourceError::Unavailable("b is down".into()));
        // One attempt per source, no retries
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_source_list_is_a_failure_with_no_errors() {
        let sources: Vec<SharedSource<String>> = Vec::new();
        let outcome = Resolver::default().resolve(&request(), &sources);
        assert!(!outcome.is_success());
        assert!(outcome.errors().is_empty());
        assert_eq!(describe_failures(outcome.errors()), "no sources configured");
    }

    #[test]
    fn priority_reorders_but_index_refers_to_list_position() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sources: Vec<SharedSource<String>> = vec![
            Arc::new(FnSource::new("mirror", |_: &ResourceRequest, _| Ok("mirror".to_string())).with_priority(10)),
            Arc::new(FnSource::new("local", |_: &ResourceRequest, _| Ok("local".to_string())).with_priority(0)),
            fake("other", true, calls.clone()),
        ];
        assert_eq!(Resolver::attempt_order(&sources), vec![1, 2, 0]);

        let (payload, index) = Resolver::default()
            .resolve(&request(), &sources)
            .into_result()
            .unwrap();
        assert_eq!(payload, "local");
        assert_eq!(index, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn late_answer_is_treated_as_timeout_and_next_source_is_tried() {
        let sources: Vec<SharedSource<&'static str>> = vec![
            Arc::new(FnSource::new("slow", |_: &ResourceRequest, _| {
                std::thread::sleep(Duration::from_millis(60));
                Ok("slow")
            })),
            Arc::new(FnSource::new("fast", |_: &ResourceRequest, _| Ok("fast"))),
        ];

        let outcome = Resolver::new(Duration::from_millis(5)).resolve(&request(), &sources);
        match outcome {
            ResolutionOutcome::Success {
                payload,
                source_index,
            } => {
                assert_eq!(payload, "fast");
                assert_eq!(source_index, 1);
            }
            ResolutionOutcome::Failure { errors } => panic!("unexpected failure: {:?}", errors),
        }
    }

    #[test]
    fn hanging_source_does_not_hold_up_the_next_one() {
        let sources: Vec<SharedSource<&'static str>> = vec![
            Arc::new(FnSource::new("stuck", |_: &ResourceRequest, _| {
                std::thread::sleep(Duration::from_secs(2));
                Ok("stuck")
            })),
            Arc::new(FnSource::new("fast", |_: &ResourceRequest, _| Ok("fast"))),
        ];

        let started = Instant::now();
        let outcome = Resolver::new(Duration::from_millis(50)).resolve(&request(), &sources);
        assert!(started.elapsed() < Duration::from_secs(1), "waited {:?}", started.elapsed());
        let (payload, index) = outcome.into_result().unwrap();
        assert_eq!(payload, "fast");
        assert_eq!(index, 1);
    }

    #[test]
    fn stuck_sources_all_time_out() {
        let sources: Vec<SharedSource<u8>> = vec![
            Arc::new(FnSource::new("a", |_: &ResourceRequest, _| {
                std::thread::sleep(Duration::from_secs(2));
                Ok(1)
            })),
            Arc::new(FnSource::new("b", |_: &ResourceRequest, _| {
                std::thread::sleep(Duration::from_secs(2));
                Ok(2)
            })),
        ];

        let started = Instant::now();
        let outcome = Resolver::new(Duration::from_millis(30)).resolve(&request(), &sources);
        assert!(started.elapsed() < Duration::from_secs(1));
        match outcome {
            ResolutionOutcome::Failure { errors } => {
                assert_eq!(errors.len(), 2);
                for (i, failure) in errors.iter().enumerate() {
                    assert_eq!(failure.source_index, i);
                    assert!(matches!(failure.error, SourceError::TimedOut { .. }));
                }
            }
            ResolutionOutcome::Success { source_index, .. } => {
                panic!("stuck source #{} answered", source_index)
            }
        }
    }

    #[test]
    fn panicking_source_is_a_failed_attempt() {
        let sources: Vec<SharedSource<u8>> = vec![
            Arc::new(FnSource::new("boom", |_: &ResourceRequest, _| -> Result<u8, SourceError> {
                panic!("provider crashed")
            })),
            Arc::new(FnSource::new("ok", |_: &ResourceRequest, _| Ok(7))),
        ];
        let (payload, index) = Resolver::default()
            .resolve(&request(), &sources)
            .into_result()
            .unwrap();
        assert_eq!((payload, index), (7, 1));
    }

    #[test]
    fn probe_returns_first_present_source() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("model.obj");
        std::fs::write(&present, "v 0 0 0").unwrap();

        let sources: Vec<SharedSource<Vec<u8>>> = vec![
            Arc::new(FileSource::new(dir.path().join("missing.obj"))),
            Arc::new(FileSource::new(present)),
        ];
        let req = ResourceRequest::new(ResourceKind::Decoration, "centerpiece");
        assert_eq!(Resolver::default().probe(&req, &sources), Ok(1));

        let missing: Vec<SharedSource<Vec<u8>>> =
            vec![Arc::new(FileSource::new(dir.path().join("nope.obj")))];
        let errs = Resolver::default().probe(&req, &missing).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(matches!(errs[0].error, SourceError::NotFound(_)));
    }

    #[test]
    fn locator_parsing() {
        let https = Locator::parse("https://cdn.example/logo.png", None).unwrap();
        assert!(matches!(https, Locator::Url(ref u) if u.host_str() == Some("cdn.example")));

        let rel = Locator::parse("logos/acme.png", Some(&AssetBase::Dir("/srv/public".into())))
            .unwrap();
        assert_eq!(rel, Locator::File(PathBuf::from("/srv/public/logos/acme.png")));

        let rooted = Locator::parse("/assets/x.png", Some(&AssetBase::Dir("public".into()))).unwrap();
        assert_eq!(rooted, Locator::File(PathBuf::from("public/assets/x.png")));

        let base = AssetBase::parse("https://shop.example/static");
        let joined = Locator::parse("logos/a.png", Some(&base)).unwrap();
        assert_eq!(
            joined,
            Locator::Url(Url::parse("https://shop.example/static/logos/a.png").unwrap())
        );

        let proto = Locator::parse("//cdn.example/a.png", None).unwrap();
        assert_eq!(proto, Locator::Url(Url::parse("https://cdn.example/a.png").unwrap()));

        assert_eq!(Locator::parse("  ", None), Err(LocatorError::Empty));
        assert!(matches!(
            Locator::parse("ftp://x.example/a.png", None),
            Err(LocatorError::UnsupportedScheme(_))
        ));
    }
}
