pub mod catalog;
pub mod comparison;
pub mod favorites;
pub mod ranking;
pub mod scoring;

pub use catalog::CatalogStore;
pub use comparison::{ComparisonRow, ComparisonTable};
pub use favorites::FavoritesManager;
pub use ranking::{rank, BrandFilter, RankedCatalog, ResultFilter};
pub use scoring::{ScoringConfig, ScoringEngine};
