//! Token-endpoint descriptor (data) and strategy (behavior).
//!
//! `descriptor` exposes the validated, HTTPS-only token endpoint plus the default scope.
//! `strategy` defines [`ProviderStrategy`], an HTTP-client-agnostic hook used by the token
//! source to augment outgoing token requests and classify OAuth error bodies.

pub mod descriptor;
pub mod strategy;

pub use descriptor::*;
pub use strategy::*;
