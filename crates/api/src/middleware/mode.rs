//! # Request Mode
//!
//! Resolves whether a request runs against the database or against the
//! built-in demo fixtures. The mode travels as an ordinary handler argument.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use mediqueue_core::mode::ClientMode;

/// Header carrying the demo flag (`true`, `1`, `yes`, `on`)
pub const DEMO_MODE_HEADER: &str = "x-demo-mode";

/// Extractor for the [`ClientMode`] of the current request
///
/// A missing or unrecognised header means [`ClientMode::Live`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestMode(pub ClientMode);

#[async_trait]
impl<S> FromRequestParts<S> for RequestMode
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mode = parts
            .headers
            .get(DEMO_MODE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(ClientMode::from_flag)
            .unwrap_or_default();

        Ok(RequestMode(mode))
    }
}
