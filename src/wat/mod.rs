//! WebAssembly Text Format (WAT) emission.
//!
//! Renders a decoded [`Module`] as indented S-expression text, two spaces
//! per nesting level. Formatting is deterministic and holds no state
//! between calls.
//!
//! # Example
//!
//! ```
//! use watdump::{parser, wat};
//!
//! let bytes = [
//!     0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00, // header
//!     0x01, 0x04, 0x01, 0x60, 0x00, 0x00, // type section: (func)
//!     0x03, 0x02, 0x01, 0x00, // function section: one func of type 0
//!     0x0a, 0x04, 0x01, 0x02, 0x00, 0x0b, // code section: empty body
//! ];
//! let module = parser::parse(&bytes).unwrap();
//! assert_eq!(
//!     wat::format(&module),
//!     "(module\n  (type $t0 (func))\n  (func $f0 (type $t0)\n  )\n)"
//! );
//! ```

mod printer;

use crate::parser::module::Module;
use printer::Printer;

/// Renders `module` as WAT. Lines are joined with `\n`, without a trailing
/// newline.
pub fn format(module: &Module) -> String {
    let mut printer = Printer::new();
    printer.print_module(module);
    printer.finish()
}
