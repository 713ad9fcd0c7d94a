//! # Flow Service
//!
//! Loopback resource service for [`Flow`]s, the reference data behind the
//! provider form's authorization flow choice.

pub mod entity;

use crate::model::Flow;
use admin_framework::{ResourceActor, ResourceClient};

/// Creates a new Flow service and its client.
pub fn new() -> (ResourceActor<Flow>, ResourceClient<Flow>) {
    ResourceActor::new(32)
}
