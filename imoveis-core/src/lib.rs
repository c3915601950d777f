pub mod common;
pub mod domain;
pub mod filter;
pub mod format;
pub mod geo;
pub mod search;
pub mod seo;
pub mod store;

pub use domain::*;
