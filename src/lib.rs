#![allow(clippy::doc_markdown)] // Allow technical terms in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Form Store Core
//!
//! In-process dispatch registry for interactive message components.
//!
//! ## Overview
//!
//! A chat platform delivers an interaction every time a user clicks a button
//! or picks from a select menu attached to a message. This crate keeps the
//! live forms behind those components, routes each decoded interaction to the
//! element that produced it, expires forms that sit idle, and reconciles a
//! form with the message when the platform reports a newer version of it.
//!
//! ## Module Organization
//!
//! - [`components`] - Decoded component descriptors and dispatch keys
//! - [`interaction`] - Incoming interaction events and their response channel
//! - [`ui`] - Forms, elements, layout and reconciliation
//! - [`registry`] - The dispatch table
//! - [`execution`] - Task scheduling and timers
//! - [`state_machine`] - Form lifecycle states
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use formstore_core::registry::FormRegistry;
//! use formstore_core::ui::{handler_fn, ButtonSpec, FormBuilder};
//! use std::time::Duration;
//!
//! # async fn example() -> formstore_core::Result<()> {
//! let registry = FormRegistry::with_tokio()?;
//! let form = FormBuilder::new()
//!     .timeout(Duration::from_secs(120))
//!     .button(
//!         ButtonSpec::new("Approve").custom_id("approve"),
//!         handler_fn(|form, _element, interaction| async move {
//!             interaction.response().send_message("Approved", false).await?;
//!             form.stop();
//!             Ok(())
//!         }),
//!     )
//!     .build()?;
//!
//! registry.add_form(&form, None)?;
//! let components = form.to_components();
//! # let _ = components;
//!
//! // The transport layer calls registry.dispatch_interaction(..) per event.
//! let timed_out = form.wait().await;
//! # let _ = timed_out;
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # Unit and integration tests
//! ```

pub mod components;
pub mod config;
pub mod constants;
pub mod error;
pub mod execution;
pub mod interaction;
pub mod logging;
pub mod registry;
pub mod state_machine;
pub mod ui;

pub use components::{ComponentDescriptor, ComponentKind, DispatchKey};
pub use config::{ConfigManager, FormStoreConfig, FormsConfig, LoggingConfig};
pub use error::{FormError, Result};
pub use execution::{InlineScheduler, Scheduler, TokioScheduler};
pub use interaction::{Interaction, InteractionData, MessageId};
pub use logging::init_structured_logging;
pub use registry::{DispatchOutcome, FormRegistry, RegistryStats};
pub use state_machine::{FormEvent, FormState};
pub use ui::{Element, Form, FormBehavior, FormBuilder};
