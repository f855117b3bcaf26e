#![no_std]

//! # Hardware Abstraction Layer (HAL)
//!
//! This crate defines the hardware traits the editor firmware needs.
//!
//! ## Philosophy
//!
//! **The board must be swappable.**
//!
//! Editing and persistence logic never touch flash registers or interrupt
//! controllers directly. They go through the traits here, which a board crate
//! implements and which tests replace with in-memory devices.
//!
//! ## Design Principles
//!
//! 1. **Trait-based**: flash access and interrupt masking go through traits
//! 2. **Explicit granularity**: erase and program sizes are part of the device contract
//! 3. **Testable**: `RamFlash` and `HostInterrupts` stand in for real hardware

pub mod flash;
pub mod interrupts;

pub use flash::{FlashDevice, FlashError, ERASED_BYTE};
#[cfg(feature = "alloc")]
pub use flash::RamFlash;
pub use interrupts::{without_interrupts, HostInterrupts, InterruptControl};
