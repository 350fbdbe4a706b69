//! Output formats.
//!
//! Every renderer is a [`Display`](std::fmt::Display) wrapper over borrowed
//! registry data. Rendering never mutates the registry and iterates in
//! definition order, so rendering the same data twice yields identical
//! bytes.

mod dot;
pub use dot::{Dot, DotOptions};

mod summary;
pub use summary::Summary;

mod turtle;
pub use turtle::Turtle;
