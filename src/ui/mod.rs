//! # Forms and Elements
//!
//! Live, stateful counterparts of component descriptors. A [`Form`] groups
//! [`Element`]s under one lifecycle; elements carry the handler and the most
//! recent user selection.
//!
//! ```rust,no_run
//! use formstore_core::ui::{handler_fn, ButtonSpec, FormBuilder};
//! use std::time::Duration;
//!
//! # fn main() -> formstore_core::Result<()> {
//! let form = FormBuilder::new()
//!     .timeout(Duration::from_secs(60))
//!     .button(
//!         ButtonSpec::new("Confirm"),
//!         handler_fn(|form, _element, interaction| async move {
//!             interaction.response().send_message("Confirmed", true).await?;
//!             form.stop();
//!             Ok(())
//!         }),
//!     )
//!     .build()?;
//! # let _ = form;
//! # Ok(())
//! # }
//! ```

pub mod element;
pub mod factory;
pub mod form;
pub mod layout;
pub mod signal;
pub mod token;

pub use element::{
    handler_fn, ButtonSpec, Element, ElementCallback, HandlerRef, SelectSpec, SelectionState,
};
pub use factory::{ElementConstructor, ElementFactory};
pub use form::{DefaultBehavior, Form, FormBehavior, FormBuilder, Teardown};
pub use layout::{build_layout, LayoutRow};
pub use signal::CompletionSignal;
pub use token::new_dispatch_token;
