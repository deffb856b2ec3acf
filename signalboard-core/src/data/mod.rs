//! Signal data: record file store, period windows, dataset cache, synthetic samples.

pub mod cache;
pub mod period;
pub mod provider;
pub mod sample;
pub mod store;

pub use cache::DatasetCache;
pub use period::Period;
pub use provider::{DataError, DatasetProvider, PriceColumns, SignalDataset, TrendLine, TrendPoint};
pub use sample::{sample_records, write_sample_file, SampleSpec};
pub use store::{JsonSignalStore, StoreInfo};
