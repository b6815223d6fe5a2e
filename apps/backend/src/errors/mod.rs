//! Error taxonomy: wire codes and domain-level rejections.

pub mod domain;
pub mod error_code;

pub use error_code::ErrorCode;
