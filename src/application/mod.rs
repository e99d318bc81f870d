// Application layer - Use cases and collaborator contracts
pub mod convert_service;
pub mod ingest_service;
pub mod map_renderer;
pub mod map_service;
