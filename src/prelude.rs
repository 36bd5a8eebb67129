//! Reexports the most commonly used types and traits.
//!
//! ```
//! use streamlines::prelude::*;
//! ```

pub use crate::{
    Config, Context, Mesh, SpineList, UMode,
    spine::SpineSource,
};
