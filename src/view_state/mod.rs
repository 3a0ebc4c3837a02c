//! State owned by the presentation layer.

pub mod visibility;

pub use visibility::{Visibility, VisibilityEvent, VisibilityState};
