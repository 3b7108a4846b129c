mod store;

pub use store::{RecordStore, SearchHit};
