pub mod record_crud;
pub mod record_search;
