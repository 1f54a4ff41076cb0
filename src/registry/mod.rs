//! # Registry Infrastructure
//!
//! The dispatch core: maps dispatch keys to live forms and elements, expires
//! idle entries and routes interactions to the scheduler.
//!
//! ## Architecture
//!
//! ```text
//! FormRegistry
//! ├── entries          (DispatchKey -> Form, Element, expiry)
//! └── synced_messages  (MessageId -> Form, for reconciliation)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use formstore_core::registry::FormRegistry;
//! use formstore_core::ui::{ButtonSpec, Element, FormBuilder};
//!
//! # async fn example() -> formstore_core::Result<()> {
//! let registry = FormRegistry::with_tokio()?;
//! let form = FormBuilder::new()
//!     .passive(Element::button(ButtonSpec::new("Ping"))?)
//!     .build()?;
//! registry.add_form(&form, None)?;
//! let timed_out = form.wait().await;
//! # let _ = timed_out;
//! # Ok(())
//! # }
//! ```

pub mod form_registry;

pub use form_registry::{DispatchOutcome, FormRegistry, RegistryStats};
