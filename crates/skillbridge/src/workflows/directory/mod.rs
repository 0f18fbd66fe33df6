//! SME directory: the profile read model, the conjunctive search/filter
//! engine, and the snapshot subscription feed.

pub mod engine;
pub mod feed;
pub mod filters;
pub mod profile;
pub mod router;

pub use engine::DirectorySearch;
pub use feed::{profile_feed, ProfileFeed, ProfileFeedHandle};
pub use filters::SearchFilters;
pub use profile::{Availability, SmeProfile};
pub use router::{directory_router, DirectoryError, ProfileDirectory};
