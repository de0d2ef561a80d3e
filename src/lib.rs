//! Client-side JWT gatekeeper: attach bearer tokens to outbound requests, refresh them before
//! they expire, and recover from a rejected credential exactly once.
//!
//! The crate revolves around [`gatekeeper::Gatekeeper`], which composes three collaborators:
//!
//! - a [`store::TokenStore`] holding the current [`auth::BearerToken`],
//! - a [`refresh::TokenRefresher`] that exchanges for a new token,
//! - a [`transport::Transport`] that actually sends requests.
//!
//! Token expiry is read with [`auth::jwt::decode`], which performs a purely structural decode.
//! It never verifies signatures and must not be used to authenticate tokens received from
//! untrusted parties.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod ext;
pub mod gatekeeper;
pub mod obs;
pub mod refresh;
pub mod store;
pub mod transport;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use http;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
