//! # Console Lifecycle & Orchestration
//!
//! This module starts, wires and stops the loopback resource services the
//! console talks to, and sets up tracing for the binary.
//!
//! ## The RacConsole Pattern
//!
//! The [`RacConsole`] creates one service per resource type and injects each
//! service's dependencies at `run()` time:
//!
//! ```rust,ignore
//! let (flow_actor, flows) = flow_actor::new();
//! let (provider_actor, providers) = provider_actor::new();
//! let (endpoint_actor, endpoints) = endpoint_actor::new();
//!
//! tokio::spawn(flow_actor.run(()));
//! tokio::spawn(provider_actor.run(flows.clone()));      // validates authorization flows
//! tokio::spawn(endpoint_actor.run(providers.clone()));  // answers used-by
//! ```
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - Closes the sender side of each request channel
//! 2. **Services detect closure** - `receiver.recv()` returns `None`
//! 3. **Await completion** - Endpoints first, then providers, then flows
//!
//! The dependency graph is acyclic (endpoints -> providers -> flows), so a
//! service exits once its own clients are gone and the services depending on it
//! have released their context. Controllers hold client clones: drop every
//! list and form before calling `shutdown`.
//!
//! ## Observability & Tracing
//!
//! [`setup_tracing`] installs the subscriber once for the binary:
//!
//! ```bash
//! RUST_LOG=info cargo run      # Compact logs
//! RUST_LOG=debug cargo run     # Queries and payloads
//! ```

pub mod console;
pub mod tracing;

pub use self::console::*;
pub use self::tracing::*;
