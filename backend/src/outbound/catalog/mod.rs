//! Remote card catalog adapter.

mod dto;
mod http_source;

pub use http_source::HttpCardCatalog;
