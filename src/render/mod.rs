//! Page rendering.
//!
//! ```text
//! Resolution (route, ordered components)
//!     → page.rs (maud markup, one mount point per component)
//!     → HTML document
//! ```

pub mod page;

pub use page::PageRenderer;
