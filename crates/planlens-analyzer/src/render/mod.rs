//! Plan Rendering Module
//!
//! Renders a plan tree as nested `<details>` elements so every node can be
//! collapsed in the browser. All plan-supplied text is HTML-escaped.

mod html;

pub use html::*;
