//! Bearer credentials and the structural JWT decoder used to read their expiry.

pub mod jwt;
pub mod token;

pub use jwt::{DecodeError, DecodedToken, Segment};
pub use token::*;
