//! # Endpoint Service
//!
//! Loopback resource service for [`Endpoint`]s.
//!
//! ## Structure
//!
//! - [`entity`] - [`ResourceEntity`](admin_framework::ResourceEntity) implementation for [`Endpoint`]
//! - [`new()`] - Factory function that creates the service and its client
//!
//! ## Context
//!
//! The service is run with a provider client: an endpoint is "used by" every
//! provider whose endpoint list references it, and the bulk delete review asks
//! for exactly that.
//!
//! ```rust,ignore
//! let (endpoint_actor, endpoints) = endpoint_actor::new();
//! tokio::spawn(endpoint_actor.run(provider_client.clone()));
//! ```

pub mod entity;

use crate::model::Endpoint;
use admin_framework::{ResourceActor, ResourceClient};

/// Creates a new Endpoint service and its client.
pub fn new() -> (ResourceActor<Endpoint>, ResourceClient<Endpoint>) {
    ResourceActor::new(32)
}
