use log::{debug, warn};

use crate::api::RecipeSource;
use crate::error::BrowseError;
use crate::model::{RecipePage, RecipeSummary};

/// Page size used for every listing mode.
pub const PAGE_SIZE: u64 = 20;

/// Cuisine value meaning "no cuisine scoping".
pub const ALL_CUISINES: &str = "all";

/// Active filter criteria. Search text and cuisine scope the server-side
/// query; meal type and difficulty are applied client-side only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub search: String,
    pub cuisine: Option<String>,
    pub meal_type: Option<String>,
    pub difficulty: Option<String>,
}

impl Criteria {
    /// The cuisine tag to scope by, if any. `"all"` means unscoped.
    fn cuisine_scope(&self) -> Option<&str> {
        match self.cuisine.as_deref() {
            Some(ALL_CUISINES) | None => None,
            Some(tag) => Some(tag),
        }
    }

    /// Endpoint selection, in priority order: search text wins over cuisine
    /// scoping, which wins over the unscoped listing.
    fn endpoint(&self) -> Endpoint {
        if !self.search.is_empty() {
            Endpoint::Search(self.search.clone())
        } else if let Some(tag) = self.cuisine_scope() {
            Endpoint::Tag(tag.to_string())
        } else {
            Endpoint::List
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    List,
    Search(String),
    Tag(String),
}

/// A single page fetch to perform, tagged with the listing generation it
/// belongs to. Completions whose generation no longer matches are discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub generation: u64,
    pub endpoint: Endpoint,
    pub limit: u64,
    pub skip: u64,
}

impl PageRequest {
    pub async fn fetch(&self, source: &dyn RecipeSource) -> Result<RecipePage, BrowseError> {
        match &self.endpoint {
            Endpoint::List => source.list(self.limit, self.skip).await,
            Endpoint::Search(text) => source.search(text, self.limit, self.skip).await,
            Endpoint::Tag(tag) => source.by_tag(tag, self.limit, self.skip).await,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    LoadingMore,
    Ready,
    Error,
}

/// Incremental, filtered, paginated retrieval of recipe summaries.
///
/// The controller is a state machine over explicit `PageRequest`s: a
/// reset-triggering change or a `next_page` call hands back a request, the
/// caller performs the fetch (or uses the `load_*` drivers below), and
/// `complete` folds the tagged result back in. Splitting issue from
/// completion is what lets a filter change made while a fetch is in flight
/// invalidate that fetch's eventual result.
pub struct Listing {
    criteria: Criteria,
    items: Vec<RecipeSummary>,
    offset: u64,
    total: u64,
    more: bool,
    phase: Phase,
    generation: u64,
    in_flight: bool,
    last_request: Option<PageRequest>,
    last_error: Option<BrowseError>,
    page_size: u64,
}

impl Default for Listing {
    fn default() -> Self {
        Listing::new(PAGE_SIZE)
    }
}

impl Listing {
    pub fn new(page_size: u64) -> Self {
        Listing {
            criteria: Criteria::default(),
            items: Vec::new(),
            offset: 0,
            total: 0,
            more: true,
            phase: Phase::Idle,
            generation: 0,
            in_flight: false,
            last_request: None,
            last_error: None,
            page_size,
        }
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Everything accumulated so far for the active criteria.
    pub fn items(&self) -> &[RecipeSummary] {
        &self.items
    }

    /// Accumulated items with the client-side meal-type/difficulty filters
    /// applied. Recomputed per call; never triggers a fetch.
    pub fn visible(&self) -> Vec<&RecipeSummary> {
        self.items
            .iter()
            .filter(|recipe| {
                if let Some(wanted) = &self.criteria.meal_type {
                    let matches = recipe
                        .meal_type
                        .as_ref()
                        .is_some_and(|kinds| kinds.iter().any(|k| k.eq_ignore_ascii_case(wanted)));
                    if !matches {
                        return false;
                    }
                }
                if let Some(wanted) = &self.criteria.difficulty {
                    let matches = recipe
                        .difficulty
                        .as_ref()
                        .is_some_and(|d| d.eq_ignore_ascii_case(wanted));
                    if !matches {
                        return false;
                    }
                }
                true
            })
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn more_available(&self) -> bool {
        self.more
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error(&self) -> Option<&BrowseError> {
        self.last_error.as_ref()
    }

    /// First load for whatever criteria are currently set.
    pub fn start_initial(&mut self) -> PageRequest {
        self.reset()
    }

    /// Apply settled search text (post-debounce). Returns the reset fetch to
    /// perform, or None if the text did not actually change.
    pub fn set_search(&mut self, text: impl Into<String>) -> Option<PageRequest> {
        let text = text.into();
        if text == self.criteria.search {
            return None;
        }
        self.criteria.search = text;
        Some(self.reset())
    }

    /// Change the cuisine scope. Switching back to a previously-seen cuisine
    /// still re-fetches from scratch; pages are never cached across filters.
    pub fn set_cuisine(&mut self, cuisine: Option<String>) -> Option<PageRequest> {
        if cuisine == self.criteria.cuisine {
            return None;
        }
        self.criteria.cuisine = cuisine;
        Some(self.reset())
    }

    /// Client-side filter; no state transition, no fetch.
    pub fn set_meal_type(&mut self, meal_type: Option<String>) {
        self.criteria.meal_type = meal_type;
    }

    /// Client-side filter; no state transition, no fetch.
    pub fn set_difficulty(&mut self, difficulty: Option<String>) {
        self.criteria.difficulty = difficulty;
    }

    /// Request the next page. None unless the last page landed successfully,
    /// more data exists, and no fetch is currently in flight.
    pub fn next_page(&mut self) -> Option<PageRequest> {
        if self.phase != Phase::Ready || !self.more || self.in_flight {
            return None;
        }
        self.phase = Phase::LoadingMore;
        self.in_flight = true;
        let request = self.request_at(self.offset);
        self.last_request = Some(request.clone());
        Some(request)
    }

    /// Re-issue the request that failed, at the same offset and filter. The
    /// initial-load error path naturally restarts from offset 0 because that
    /// is the offset the failed request carried.
    pub fn retry(&mut self) -> Option<PageRequest> {
        if self.phase != Phase::Error {
            return None;
        }
        let request = self.last_request.clone()?;
        self.phase = if request.skip == 0 {
            Phase::Loading
        } else {
            Phase::LoadingMore
        };
        self.in_flight = true;
        self.last_error = None;
        Some(request)
    }

    /// Fold a completed fetch back into the listing. Results from a prior
    /// generation (a filter reset happened while the fetch was in flight) are
    /// discarded without touching any state.
    pub fn complete(&mut self, request: &PageRequest, result: Result<RecipePage, BrowseError>) {
        if request.generation != self.generation {
            debug!(
                "Discarding stale page (generation {} != {})",
                request.generation, self.generation
            );
            return;
        }
        self.in_flight = false;
        match result {
            Ok(page) => {
                let returned = page.recipes.len() as u64;
                self.items.extend(page.recipes);
                self.offset += returned;
                // Defensive clamp: never let a server-reported total contradict
                // what we have actually accumulated.
                self.total = page.total.max(self.items.len() as u64);
                // An empty page always terminates pagination, even when the
                // reported total claims more should exist.
                self.more = returned > 0 && (self.items.len() as u64) < self.total;
                self.phase = Phase::Ready;
                self.last_error = None;
            }
            Err(e) => {
                warn!("Page fetch failed: {}", e);
                self.more = false;
                self.phase = Phase::Error;
                self.last_error = Some(e);
            }
        }
    }

    /// Drive the initial load to completion against a source.
    pub async fn load_initial(&mut self, source: &dyn RecipeSource) {
        let request = self.start_initial();
        let result = request.fetch(source).await;
        self.complete(&request, result);
    }

    /// Drive one next-page fetch to completion. Returns false when no fetch
    /// was issued (exhausted, errored, or already in flight).
    pub async fn load_more(&mut self, source: &dyn RecipeSource) -> bool {
        let Some(request) = self.next_page() else {
            return false;
        };
        let result = request.fetch(source).await;
        self.complete(&request, result);
        true
    }

    fn reset(&mut self) -> PageRequest {
        self.generation += 1;
        self.offset = 0;
        self.total = 0;
        self.items.clear();
        self.more = true;
        self.phase = Phase::Loading;
        self.in_flight = true;
        self.last_error = None;
        let request = self.request_at(0);
        self.last_request = Some(request.clone());
        request
    }

    fn request_at(&self, skip: u64) -> PageRequest {
        PageRequest {
            generation: self.generation,
            endpoint: self.criteria.endpoint(),
            limit: self.page_size,
            skip,
        }
    }
}
