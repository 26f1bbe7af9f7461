//! # Typed API Services
//!
//! One thin service per resource. Each validates its payload with
//! [`sigev_core::validation`] before touching the network and defers
//! all transport concerns to [`crate::http::ApiClient`].

pub mod company;
pub mod product;
pub mod sale;

pub use company::CompanyService;
pub use product::ProductService;
pub use sale::SaleService;
