//! A WebAssembly binary decoder and text-format disassembler.
//!
//! watdump reads the bytes of a `.wasm` module and renders the functions it
//! defines as WebAssembly Text Format (WAT):
//!
//! - [`parser`] -- Binary format decoder. Reads `.wasm` bytes into a [`parser::Module`].
//! - [`wat`] -- Text emitter. Renders a `Module` as WAT source.
//!
//! Only the type, function, export and code sections are decoded; all other
//! sections are skipped by length. There is no validation and no execution.
//!
//! # Example
//!
//! ```
//! let bytes = [
//!     0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00,
//!     0x01, 0x05, 0x01, 0x60, 0x00, 0x01, 0x7f, // (func (result i32))
//!     0x03, 0x02, 0x01, 0x00,
//!     0x07, 0x08, 0x01, 0x04, b'm', b'a', b'i', b'n', 0x00, 0x00,
//!     0x0a, 0x06, 0x01, 0x04, 0x00, 0x41, 0x2a, 0x0b, // i32.const 42
//! ];
//!
//! let out = watdump::disassemble(&bytes).unwrap();
//! assert_eq!(out.version, 1);
//! assert!(out.text.contains("(func $f0 (export \"main\") (type $t0) (result i32)"));
//! assert!(out.text.contains("    i32.const 42"));
//! ```

pub mod parser;
pub mod wat;

pub use parser::{parse, DecodeError, Diagnostic, Module};

/// Result of [`disassemble`]: the rendered text plus what the caller needs to
/// present it.
#[derive(Debug, Clone, PartialEq)]
pub struct Disassembly {
    /// Binary format version from the header. Always 1.
    pub version: u32,
    pub text: String,
    /// Non-fatal problems found while decoding.
    pub diagnostics: Vec<Diagnostic>,
}

/// Decodes `bytes` and renders the module as WAT.
pub fn disassemble(bytes: &[u8]) -> Result<Disassembly, DecodeError> {
    let module = parser::parse(bytes)?;
    let text = wat::format(&module);
    Ok(Disassembly {
        version: module.version,
        text,
        diagnostics: module.diagnostics,
    })
}
