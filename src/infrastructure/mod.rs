// Infrastructure layer - External dependencies and adapters
pub mod batch_store;
pub mod config;
pub mod csv_codec;
pub mod leaflet_renderer;
pub mod payload;
