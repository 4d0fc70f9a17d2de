#![no_std]

pub mod combo;
pub mod config;
pub mod doubletap;
pub mod keyboard;
pub mod keymap;
pub mod keys;
pub mod layers;
pub mod macros;
pub mod matrix;
pub mod report;
pub mod taphold;

#[cfg(any(test, feature = "demo-keymap"))]
pub mod demo;
