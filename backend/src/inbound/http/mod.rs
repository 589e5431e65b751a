//! HTTP inbound adapter exposing the payment REST endpoints.

pub mod error;
pub mod payments;
pub mod payments_dto;
pub mod query;
pub mod state;

pub use error::ApiResult;
