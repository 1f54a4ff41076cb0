//! # Component Descriptors
//!
//! Decoded, immutable descriptions of interactive components as exchanged with
//! the platform, plus the dispatch key used to route interactions back to
//! them.
//!
//! ## Wire Types
//!
//! ```text
//! type 1  ActionRow   grouping wrapper, up to five children
//! type 2  Button      dispatchable unless it is a link button
//! type 3  SelectMenu  dispatchable
//! other   Unknown     passed through verbatim
//! ```

pub mod descriptor;
pub mod emoji;
pub mod key;
pub mod kind;

pub use descriptor::{
    walk_components, ButtonDescriptor, ComponentDescriptor, SelectMenuDescriptor, SelectOption,
};
pub use emoji::PartialEmoji;
pub use key::DispatchKey;
pub use kind::{ButtonStyle, ComponentKind};
