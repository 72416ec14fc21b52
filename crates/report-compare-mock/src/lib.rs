pub mod assertions;
pub mod builder;
pub mod json;
pub mod mock;

pub use assertions::TableAssertions;
pub use builder::{MockFetcherBuilder, TableBuilder};
pub use json::TableJson;
pub use mock::{FailingFetcher, MockFetcher};
