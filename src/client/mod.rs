//! Client side of the catalog: the HTTP client the form pages submit through, the
//! search box debounce and the home page preview carousel.

pub mod api;
pub mod carousel;
pub mod search;

pub use api::{ClientError, ImageFile, PokedexClient, PokemonDraft, PokemonEdit};
pub use carousel::Carousel;
pub use search::{debounce_search, SearchEvent, SearchRequest, SEARCH_DEBOUNCE};
