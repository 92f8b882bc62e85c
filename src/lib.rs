//! Procedural spiral galaxy point fields.
//!
//! [`galaxy`] holds the generation core and the regeneration lifecycle and does not need a
//! window. [`graphics`] and [`ui`] plug that core into a Bevy app.

pub mod error;
pub mod galaxy;
pub mod graphics;
pub mod ui;

pub mod prelude;
