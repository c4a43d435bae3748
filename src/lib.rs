//! # laser-gcode
//!
//! A Rust library for turning SVG drawings into G-code for laser cutters.
//!
//! ## Features
//!
//! - **G-code emission**: stateful emitter that tracks position, feed rate,
//!   unit and coordinate mode, and skips redundant feed-rate words
//! - **SVG import**: every visible path is split into subpaths and classified
//!   as cut (red) or engrave (any other color)
//! - **Program compilation**: engraving first, then the cut paths repeated for
//!   several passes, stepping the head down between passes
//! - **Area hatching**: filled shapes engraved with diagonal lines whose
//!   density follows the fill's grey value
//!
//! ## Example
//!
//! ```rust,ignore
//! use laser_gcode::{Compiler, CompilerSettings, ParseOptions, parse_svg_file};
//!
//! let drawing = parse_svg_file("drawing.svg", &ParseOptions::default()).unwrap();
//! let mut compiler = Compiler::new(CompilerSettings::default()).unwrap();
//! compiler.append_drawing(&drawing, false);
//! std::fs::write("drawing.gcode", compiler.compile().unwrap()).unwrap();
//! ```

pub mod bounds;
pub mod compiler;
pub mod config;
pub mod error;
pub mod gcode;
pub mod path;
pub mod svg;
pub mod types;

// Re-export commonly used items
pub use compiler::{Compiler, CompilerSettings};
pub use config::Settings;
pub use error::{CompileError, ConfigError, GcodeError, SvgError};
pub use gcode::{Directive, Emitter, EmitterConfig, PowerRange, Unit};
pub use path::{LineChain, line_segment_approximation};
pub use svg::{ParseOptions, parse_svg_file, parse_svg_str};
pub use types::{Area, Curve, Drawing, Point2, Segment};

/// Initialize the tracing subscriber, writing to stderr.
///
/// `RUST_LOG` is honoured; `verbose` raises the default level from info to
/// debug.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
