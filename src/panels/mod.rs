//! Built-in tab content
//!
//! ## Available Panels
//!
//! - **PlaceholderPanel**: stands in for tabs whose type has no spawner

mod placeholder;

pub use placeholder::PlaceholderPanel;
