//! Keyboard input handling for the PDA's hardware scanner and global
//! shortcuts.

pub mod barcode;
pub mod key_relay;

pub use barcode::{run_scanner, BarcodeScanner, Key, KeyEvent, KeyOutcome, SCAN_THRESHOLD};
pub use key_relay::KeyRelay;
