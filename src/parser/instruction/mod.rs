//! WebAssembly instruction representation and decoding
//!
//! An [`Instruction`] keeps the raw opcode and its decoded immediates. The
//! mnemonic is never stored; it is looked up from the opcode table so the
//! two can not disagree.

pub mod decode;
pub mod opcode;

pub use decode::{decode_body, decode_instruction};

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

use super::module::ValueType;

/// Memory argument for memory access instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemArg {
    /// Memory alignment (as power of 2)
    pub align: u32,
    /// Memory offset
    pub offset: u32,
}

impl fmt::Display for MemArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset={} ", self.offset)?;
        match 1u64.checked_shl(self.align) {
            Some(bytes) => write!(f, "align={bytes}"),
            None => write!(f, "align=2**{}", self.align),
        }
    }
}

/// Block type for structured control instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockType {
    /// Empty block type (no parameters or results)
    Empty,
    /// Single value type result
    Value(ValueType),
    /// Function type index for multi-value blocks (signed 33-bit encoding)
    TypeIndex(i64),
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockType::Empty => Ok(()),
            BlockType::Value(value_type) => write!(f, "(result {value_type})"),
            BlockType::TypeIndex(index) => write!(f, "(type {index})"),
        }
    }
}

/// A decoded immediate operand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Operand {
    /// Indices, labels and integer constants, all widened to 64 bits.
    Int(i64),
    F32(f32),
    F64(f64),
    Block(BlockType),
    Mem(MemArg),
    /// The type index of `call_indirect`.
    TypeUse(u32),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Int(value) => write!(f, "{value}"),
            Operand::F32(value) => write_float(f, *value, value.is_nan(), value.is_sign_negative()),
            Operand::F64(value) => write_float(f, *value, value.is_nan(), value.is_sign_negative()),
            Operand::Block(block_type) => write!(f, "{block_type}"),
            Operand::Mem(memarg) => write!(f, "{memarg}"),
            Operand::TypeUse(index) => write!(f, "(type {index})"),
        }
    }
}

// Shortest round-trip decimal form. Debug already spells infinities `inf`,
// only NaN needs the text-format spelling.
fn write_float<T: fmt::Debug>(
    f: &mut fmt::Formatter<'_>,
    value: T,
    is_nan: bool,
    negative: bool,
) -> fmt::Result {
    if is_nan {
        return f.write_str(if negative { "-nan" } else { "nan" });
    }
    write!(f, "{value:?}")
}

/// A decoded instruction: raw opcode plus immediates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instruction {
    pub opcode: u8,
    pub operands: Vec<Operand>,
}

impl Instruction {
    pub fn new(opcode: u8, operands: Vec<Operand>) -> Instruction {
        Instruction { opcode, operands }
    }

    /// Text-format name of the opcode, `unknown_0x<hex>` when unmapped.
    pub fn mnemonic(&self) -> Cow<'static, str> {
        mnemonic(self.opcode)
    }

    /// `block`, `loop`, `if`: the instructions that open a nested block.
    pub fn opens_block(&self) -> bool {
        matches!(self.opcode, 0x02..=0x04)
    }
}

/// Text-format name of `opcode`, `unknown_0x<hex>` when unmapped.
pub fn mnemonic(opcode: u8) -> Cow<'static, str> {
    match opcode::lookup(opcode) {
        Some(info) => Cow::Borrowed(info.mnemonic),
        None => Cow::Owned(format!("unknown_0x{opcode:x}")),
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mnemonic())?;
        for operand in &self.operands {
            let text = operand.to_string();
            if !text.is_empty() {
                write!(f, " {text}")?;
            }
        }
        Ok(())
    }
}
