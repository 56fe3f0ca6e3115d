pub mod api;
pub mod config;
pub mod debounce;
pub mod error;
pub mod favorites;
pub mod listing;
pub mod model;
pub mod storage;

pub use api::{RecipeApi, RecipeSource, DEFAULT_BASE_URL};
pub use config::AppConfig;
pub use debounce::{SearchDebouncer, DEFAULT_QUIET_PERIOD};
pub use error::BrowseError;
pub use favorites::{Favorites, FAVORITES_KEY};
pub use listing::{Criteria, Listing, PageRequest, Phase, ALL_CUISINES, PAGE_SIZE};
pub use model::{RecipeDetail, RecipePage, RecipeSummary};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
