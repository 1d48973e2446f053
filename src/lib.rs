//! A fixed-screen invader shooter for the terminal.
//!
//! The [`engine`] module is the authoritative simulation: pure state
//! advanced on a fixed logical tick, talking to the world only through an
//! outbound event bus. Everything else adapts that core to a real terminal:
//! [`event`] paces the ticks, [`input`] samples the keyboard, [`ui`] draws
//! the event stream with ratatui, and [`audio`] is the (optional) sound
//! boundary.

pub mod app;
pub mod audio;
pub mod engine;
pub mod event;
pub mod input;
pub mod ui;
