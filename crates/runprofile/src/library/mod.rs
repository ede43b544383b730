//! Queued keyword fetching on top of [`SpecResolver`].
//!
//! Requests are handled in FIFO order. A consumer that fails is logged and
//! does not affect the requests after it.

use crate::model::{KeywordSpec, RequestId};
use crate::spec::SpecResolver;
use std::collections::VecDeque;
use std::path::PathBuf;
use tracing::{debug, warn};

pub type ConsumerError = Box<dyn std::error::Error + Send + Sync>;
pub type ConsumerResult = Result<(), ConsumerError>;
pub type KeywordConsumer = Box<dyn FnOnce(&[KeywordSpec]) -> ConsumerResult>;

struct FetchRequest {
    id: RequestId,
    library: String,
    directories: Vec<PathBuf>,
    consumer: KeywordConsumer,
}

/// What happened to one handled request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOutcome {
    pub id: RequestId,
    pub library: String,
    pub keyword_count: usize,
    pub consumer_error: Option<String>,
}

#[derive(Debug)]
pub struct LibraryManager {
    resolver: SpecResolver,
    queue: VecDeque<FetchRequest>,
}

impl std::fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchRequest")
            .field("id", &self.id)
            .field("library", &self.library)
            .field("directories", &self.directories)
            .finish_non_exhaustive()
    }
}

impl LibraryManager {
    #[must_use]
    pub fn new(resolver: SpecResolver) -> Self {
        Self {
            resolver,
            queue: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &SpecResolver {
        &self.resolver
    }

    /// Queues a fetch. `consumer` receives the keywords, or an empty list
    /// when the library cannot be resolved.
    pub fn fetch_keywords(
        &mut self,
        library: impl Into<String>,
        directories: Vec<PathBuf>,
        consumer: impl FnOnce(&[KeywordSpec]) -> ConsumerResult + 'static,
    ) -> RequestId {
        let id = RequestId::new();
        let library = library.into();
        debug!(%id, library = %library, "keyword fetch queued");
        self.queue.push_back(FetchRequest {
            id,
            library,
            directories,
            consumer: Box::new(consumer),
        });
        id
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Keywords of `library`, resolved immediately.
    #[must_use]
    pub fn get_keywords(&self, library: &str, directories: &[PathBuf]) -> Vec<KeywordSpec> {
        self.resolver
            .resolve(library, directories)
            .map(|spec| spec.keywords)
            .unwrap_or_default()
    }

    /// Handles every queued request.
    pub fn handle_pending(&mut self) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::with_capacity(self.queue.len());
        while let Some(request) = self.queue.pop_front() {
            outcomes.push(self.handle(request));
        }
        outcomes
    }

    fn handle(&self, request: FetchRequest) -> FetchOutcome {
        let keywords = self.get_keywords(&request.library, &request.directories);
        let consumer_error = match (request.consumer)(keywords.as_slice()) {
            Ok(()) => None,
            Err(err) => {
                warn!(id = %request.id, library = %request.library, error = %err, "keyword consumer failed");
                Some(err.to_string())
            }
        };
        FetchOutcome {
            id: request.id,
            library: request.library,
            keyword_count: keywords.len(),
            consumer_error,
        }
    }
}
