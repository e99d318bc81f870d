// Domain layer - Samples, batches and the placement engine
pub mod placement;
pub mod sample;
