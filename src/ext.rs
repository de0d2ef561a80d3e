//! Public extension contracts.

pub mod request_signer;

pub use request_signer::*;
