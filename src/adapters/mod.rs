// Adapters layer: concrete implementations for external systems (storage, datasets, scalers, models).

pub mod dataset;
pub mod linear;
pub mod scalers;
pub mod storage;
