//! A CHIP-8 virtual machine.
//!
//! The core fetches 16-bit opcodes from a 4 KiB address space, decodes them
//! into [`Instruction`] variants and executes them against a small register
//! file, a 16-entry call stack, a 64x32 monochrome framebuffer, two 60 Hz
//! countdown timers and a 16-key hex keypad. External collaborators plug in
//! through narrow seams: a [`FrameSink`] receives the framebuffer once per
//! tick, a [`BeepSink`] receives the sound-timer beeps, a [`RandomSource`]
//! feeds the RND instruction, and an input source writes the keypad.
//!
//! The binary in `main.rs` wires those seams to a minifb window and a cpal
//! output stream; the library itself never opens a window or a device, so
//! everything here is testable headless.

pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keypad;
pub mod memory;
pub mod registers;
pub mod sound;
pub mod timer;

pub use decode::Instruction;
pub use display::{Display, DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use emulator::{run, Emulator, FrameSink, OsRandom, RandomSource, SharedEmulator, DEFAULT_SPEED};
pub use error::Fault;
pub use keypad::Keypad;
pub use memory::{Memory, Stack, FONT_START, MEM_SIZE, ROM_START};
pub use registers::Registers;
pub use timer::{BeepSink, StdoutBeep, Timers};
