//! The single-byte opcode table.
//!
//! Built once into a 256-entry array so that mnemonic lookup is a direct
//! index rather than a search.

use once_cell::sync::Lazy;

/// Shape of the immediates that follow an opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Immediate {
    Plain,
    /// `block`, `loop`, `if`
    BlockType,
    /// vu32 label, function, local or global index
    Index,
    I32,
    I64,
    F32,
    F64,
    /// vu32 alignment exponent then vu32 offset
    MemArg,
    /// vector of vu32 labels then a default label
    BrTable,
    /// vu32 type index then vu32 table index
    CallIndirect,
    /// single reserved byte (`memory.size`, `memory.grow`)
    Reserved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub mnemonic: &'static str,
    pub immediate: Immediate,
}

use Immediate::*;

#[rustfmt::skip]
const OPCODES: &[(u8, &str, Immediate)] = &[
    // Control instructions
    (0x00, "unreachable", Plain),
    (0x01, "nop", Plain),
    (0x02, "block", BlockType),
    (0x03, "loop", BlockType),
    (0x04, "if", BlockType),
    (0x05, "else", Plain),
    (0x0b, "end", Plain),
    (0x0c, "br", Index),
    (0x0d, "br_if", Index),
    (0x0e, "br_table", BrTable),
    (0x0f, "return", Plain),
    (0x10, "call", Index),
    (0x11, "call_indirect", CallIndirect),

    // Parametric instructions
    (0x1a, "drop", Plain),
    (0x1b, "select", Plain),

    // Variable instructions
    (0x20, "local.get", Index),
    (0x21, "local.set", Index),
    (0x22, "local.tee", Index),
    (0x23, "global.get", Index),
    (0x24, "global.set", Index),

    // Memory instructions
    (0x28, "i32.load", MemArg),
    (0x29, "i64.load", MemArg),
    (0x2a, "f32.load", MemArg),
    (0x2b, "f64.load", MemArg),
    (0x2c, "i32.load8_s", MemArg),
    (0x2d, "i32.load8_u", MemArg),
    (0x2e, "i32.load16_s", MemArg),
    (0x2f, "i32.load16_u", MemArg),
    (0x30, "i64.load8_s", MemArg),
    (0x31, "i64.load8_u", MemArg),
    (0x32, "i64.load16_s", MemArg),
    (0x33, "i64.load16_u", MemArg),
    (0x34, "i64.load32_s", MemArg),
    (0x35, "i64.load32_u", MemArg),
    (0x36, "i32.store", MemArg),
    (0x37, "i64.store", MemArg),
    (0x38, "f32.store", MemArg),
    (0x39, "f64.store", MemArg),
    (0x3a, "i32.store8", MemArg),
    (0x3b, "i32.store16", MemArg),
    (0x3c, "i64.store8", MemArg),
    (0x3d, "i64.store16", MemArg),
    (0x3e, "i64.store32", MemArg),
    (0x3f, "memory.size", Reserved),
    (0x40, "memory.grow", Reserved),

    // Constants
    (0x41, "i32.const", I32),
    (0x42, "i64.const", I64),
    (0x43, "f32.const", F32),
    (0x44, "f64.const", F64),

    // i32 comparison
    (0x45, "i32.eqz", Plain),
    (0x46, "i32.eq", Plain),
    (0x47, "i32.ne", Plain),
    (0x48, "i32.lt_s", Plain),
    (0x49, "i32.lt_u", Plain),
    (0x4a, "i32.gt_s", Plain),
    (0x4b, "i32.gt_u", Plain),
    (0x4c, "i32.le_s", Plain),
    (0x4d, "i32.le_u", Plain),
    (0x4e, "i32.ge_s", Plain),
    (0x4f, "i32.ge_u", Plain),

    // i64 comparison
    (0x50, "i64.eqz", Plain),
    (0x51, "i64.eq", Plain),
    (0x52, "i64.ne", Plain),
    (0x53, "i64.lt_s", Plain),
    (0x54, "i64.lt_u", Plain),
    (0x55, "i64.gt_s", Plain),
    (0x56, "i64.gt_u", Plain),
    (0x57, "i64.le_s", Plain),
    (0x58, "i64.le_u", Plain),
    (0x59, "i64.ge_s", Plain),
    (0x5a, "i64.ge_u", Plain),

    // f32 / f64 comparison
    (0x5b, "f32.eq", Plain),
    (0x5c, "f32.ne", Plain),
    (0x5d, "f32.lt", Plain),
    (0x5e, "f32.gt", Plain),
    (0x5f, "f32.le", Plain),
    (0x60, "f32.ge", Plain),
    (0x61, "f64.eq", Plain),
    (0x62, "f64.ne", Plain),
    (0x63, "f64.lt", Plain),
    (0x64, "f64.gt", Plain),
    (0x65, "f64.le", Plain),
    (0x66, "f64.ge", Plain),

    // i32 arithmetic
    (0x67, "i32.clz", Plain),
    (0x68, "i32.ctz", Plain),
    (0x69, "i32.popcnt", Plain),
    (0x6a, "i32.add", Plain),
    (0x6b, "i32.sub", Plain),
    (0x6c, "i32.mul", Plain),
    (0x6d, "i32.div_s", Plain),
    (0x6e, "i32.div_u", Plain),
    (0x6f, "i32.rem_s", Plain),
    (0x70, "i32.rem_u", Plain),
    (0x71, "i32.and", Plain),
    (0x72, "i32.or", Plain),
    (0x73, "i32.xor", Plain),
    (0x74, "i32.shl", Plain),
    (0x75, "i32.shr_s", Plain),
    (0x76, "i32.shr_u", Plain),
    (0x77, "i32.rotl", Plain),
    (0x78, "i32.rotr", Plain),

    // i64 arithmetic
    (0x79, "i64.clz", Plain),
    (0x7a, "i64.ctz", Plain),
    (0x7b, "i64.popcnt", Plain),
    (0x7c, "i64.add", Plain),
    (0x7d, "i64.sub", Plain),
    (0x7e, "i64.mul", Plain),
    (0x7f, "i64.div_s", Plain),
    (0x80, "i64.div_u", Plain),
    (0x81, "i64.rem_s", Plain),
    (0x82, "i64.rem_u", Plain),
    (0x83, "i64.and", Plain),
    (0x84, "i64.or", Plain),
    (0x85, "i64.xor", Plain),
    (0x86, "i64.shl", Plain),
    (0x87, "i64.shr_s", Plain),
    (0x88, "i64.shr_u", Plain),
    (0x89, "i64.rotl", Plain),
    (0x8a, "i64.rotr", Plain),

    // f32 arithmetic
    (0x8b, "f32.abs", Plain),
    (0x8c, "f32.neg", Plain),
    (0x8d, "f32.ceil", Plain),
    (0x8e, "f32.floor", Plain),
    (0x8f, "f32.trunc", Plain),
    (0x90, "f32.nearest", Plain),
    (0x91, "f32.sqrt", Plain),
    (0x92, "f32.add", Plain),
    (0x93, "f32.sub", Plain),
    (0x94, "f32.mul", Plain),
    (0x95, "f32.div", Plain),
    (0x96, "f32.min", Plain),
    (0x97, "f32.max", Plain),
    (0x98, "f32.copysign", Plain),

    // f64 arithmetic
    (0x99, "f64.abs", Plain),
    (0x9a, "f64.neg", Plain),
    (0x9b, "f64.ceil", Plain),
    (0x9c, "f64.floor", Plain),
    (0x9d, "f64.trunc", Plain),
    (0x9e, "f64.nearest", Plain),
    (0x9f, "f64.sqrt", Plain),
    (0xa0, "f64.add", Plain),
    (0xa1, "f64.sub", Plain),
    (0xa2, "f64.mul", Plain),
    (0xa3, "f64.div", Plain),
    (0xa4, "f64.min", Plain),
    (0xa5, "f64.max", Plain),
    (0xa6, "f64.copysign", Plain),

    // Conversions
    (0xa7, "i32.wrap_i64", Plain),
    (0xa8, "i32.trunc_f32_s", Plain),
    (0xa9, "i32.trunc_f32_u", Plain),
    (0xaa, "i32.trunc_f64_s", Plain),
    (0xab, "i32.trunc_f64_u", Plain),
    (0xac, "i64.extend_i32_s", Plain),
    (0xad, "i64.extend_i32_u", Plain),
    (0xae, "i64.trunc_f32_s", Plain),
    (0xaf, "i64.trunc_f32_u", Plain),
    (0xb0, "i64.trunc_f64_s", Plain),
    (0xb1, "i64.trunc_f64_u", Plain),
    (0xb2, "f32.convert_i32_s", Plain),
    (0xb3, "f32.convert_i32_u", Plain),
    (0xb4, "f32.convert_i64_s", Plain),
    (0xb5, "f32.convert_i64_u", Plain),
    (0xb6, "f32.demote_f64", Plain),
    (0xb7, "f64.convert_i32_s", Plain),
    (0xb8, "f64.convert_i32_u", Plain),
    (0xb9, "f64.convert_i64_s", Plain),
    (0xba, "f64.convert_i64_u", Plain),
    (0xbb, "f64.promote_f32", Plain),
    (0xbc, "i32.reinterpret_f32", Plain),
    (0xbd, "i64.reinterpret_f64", Plain),
    (0xbe, "f32.reinterpret_i32", Plain),
    (0xbf, "f64.reinterpret_i64", Plain),

    // Sign extension
    (0xc0, "i32.extend8_s", Plain),
    (0xc1, "i32.extend16_s", Plain),
    (0xc2, "i64.extend8_s", Plain),
    (0xc3, "i64.extend16_s", Plain),
    (0xc4, "i64.extend32_s", Plain),
];

static TABLE: Lazy<[Option<OpcodeInfo>; 256]> = Lazy::new(|| {
    let mut table = [None; 256];
    for &(opcode, mnemonic, immediate) in OPCODES {
        table[opcode as usize] = Some(OpcodeInfo {
            mnemonic,
            immediate,
        });
    }
    table
});

pub fn lookup(opcode: u8) -> Option<&'static OpcodeInfo> {
    TABLE[opcode as usize].as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn opcodes_are_unique() {
        let mut seen = HashSet::new();
        for (opcode, mnemonic, _) in OPCODES {
            assert!(seen.insert(*opcode), "duplicate opcode {opcode:#04x} ({mnemonic})");
        }
    }

    #[test]
    fn lookup_known_and_unknown() {
        assert_eq!(lookup(0x20).map(|i| i.mnemonic), Some("local.get"));
        assert_eq!(lookup(0x42).map(|i| i.immediate), Some(I64));
        assert_eq!(lookup(0x8a).map(|i| i.mnemonic), Some("i64.rotr"));
        assert_eq!(lookup(0x78).map(|i| i.mnemonic), Some("i32.rotr"));
        assert_eq!(lookup(0x11).map(|i| i.immediate), Some(CallIndirect));
        assert!(lookup(0x06).is_none());
        assert!(lookup(0x1c).is_none());
        assert!(lookup(0xc5).is_none());
        assert!(lookup(0xfc).is_none());
    }
}
