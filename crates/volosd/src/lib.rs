#![warn(missing_docs)]

//! Volume and mute control with on-screen feedback.
//!
//! `volosd` parses a short command (`+5%`, `down 10`, `toggle-mute`, ...),
//! applies it to the default audio output or input through an
//! [`AudioBackend`](backend::AudioBackend), reads the resulting state back,
//! and hands an icon and progress fraction to a [`Notifier`](notify::Notifier).
//!
//! The crate is split into:
//! - [`cli`]: flag parsing with getopts semantics
//! - [`command`]: the positional command grammar
//! - [`interpreter`]: the mutation, query, and notification sequence
//! - [`pactl`] and [`notify`]: adapters for the external collaborators

pub mod backend;
pub mod cli;
pub mod command;
pub mod display;
pub mod error;
pub mod interpreter;
pub mod notify;
pub mod pactl;
pub mod process;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use error::{Error, Result};
