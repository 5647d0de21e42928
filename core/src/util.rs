//! General-purpose utilities and containers.

pub mod arena;
pub mod buf;
