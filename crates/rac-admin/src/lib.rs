//! # RAC Admin Console Library
//!
//! The remote access (RAC) pages of the admin console, built on
//! `admin_framework`: endpoint and provider models, their loopback services,
//! the Endpoints list, and the endpoint and provider forms.
//!
//! This library exposes the modules for the binary and for integration testing.

pub mod endpoint_actor;
pub mod flow_actor;
pub mod lifecycle;
pub mod model;
pub mod provider_actor;
pub mod settings;
pub mod views;
