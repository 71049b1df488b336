//! # Cardstack Client
//!
//! Remote access to the card service over HTTP/JSON.
//!
//! [`CardRequestor`] retries `create` and `read` under a [`RetryPolicy`]
//! and sends `update` and `delete` exactly once. The wire is abstracted by
//! [`HttpTransport`] so the retry behaviour can be exercised without a server.
//!
//! [`RetryPolicy`]: cardstack_resilience::RetryPolicy

mod card_requestor;
mod context;
mod transport;

pub use card_requestor::*;
pub use context::*;
pub use transport::*;
