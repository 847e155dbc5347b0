//! Remote model assets: catalog, store client, file cache, async loader

pub mod catalog;
pub mod store;
pub mod cache;
pub mod loader;

pub use catalog::{asset_key, letters, random_entry};
pub use store::{HttpStore, MockStore, RemoteStore};
pub use cache::{AssetCache, MAX_CACHE_AGE};
pub use loader::{AssetLoader, ResolveResult};
