//! G-code emission
//!
//! Turns drawing primitives (moves, laser power, dwell, unit and origin
//! changes) into `;`-terminated G-code lines. The [`Emitter`] keeps the
//! machine state needed to avoid redundant feed-rate words and to format
//! coordinates at a fixed precision.

mod directive;
mod emitter;
mod types;

pub use directive::Directive;
pub use emitter::{Emitter, format_number};
pub use types::{CoordinateMode, EmitterConfig, Position, PowerRange, Unit};
