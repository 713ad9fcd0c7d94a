//! # RAC Provider Service
//!
//! Loopback resource service for [`RacProvider`]s. It is run with a flow
//! client, which the entity uses to check that the authorization flow exists
//! and is designated for authorization.

pub mod entity;

use crate::model::RacProvider;
use admin_framework::{ResourceActor, ResourceClient};

/// Creates a new RAC provider service and its client.
pub fn new() -> (ResourceActor<RacProvider>, ResourceClient<RacProvider>) {
    ResourceActor::new(32)
}
