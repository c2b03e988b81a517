//! Instruction decoding from binary format

use super::opcode::{self, Immediate};
use super::{BlockType, Instruction, MemArg, Operand};
use crate::parser::encoding;
use crate::parser::error::DecodeError;
use crate::parser::limits;
use crate::parser::module::ValueType;
use crate::parser::reader::Reader;

impl MemArg {
    pub fn decode(reader: &mut Reader) -> Result<Self, DecodeError> {
        let align = reader.read_vu32()?;
        let offset = reader.read_vu32()?;
        Ok(MemArg { align, offset })
    }
}

impl BlockType {
    /// 0x40 is the empty type, a value type byte is a single result, anything
    /// else is the first byte of a signed 33-bit type index. Negative indices
    /// other than those two forms are invalid.
    pub fn decode(reader: &mut Reader) -> Result<Self, DecodeError> {
        let offset = reader.pos();
        let byte = reader.peek().ok_or(DecodeError::UnexpectedEof { offset })?;
        if byte == encoding::BLOCK_TYPE_EMPTY {
            reader.read_byte()?;
            return Ok(BlockType::Empty);
        }
        if let Some(value_type) = ValueType::decode(byte) {
            reader.read_byte()?;
            return Ok(BlockType::Value(value_type));
        }

        let value = reader.read_vs33()?;
        if value < 0 {
            return Err(DecodeError::InvalidBlockType { value, offset });
        }
        Ok(BlockType::TypeIndex(value))
    }
}

/// Decodes the instructions of one function body, stopping once the reader
/// reaches `end`. The `end` opcode sitting exactly at `end` closes the
/// function and is consumed without being recorded.
pub fn decode_body(reader: &mut Reader, end: usize) -> Result<Vec<Instruction>, DecodeError> {
    let mut instructions = Vec::new();
    while reader.pos() < end {
        let opcode = reader.read_byte()?;
        if opcode == encoding::OP_END && reader.pos() == end {
            break;
        }
        instructions.push(decode_instruction(opcode, reader)?);
    }
    Ok(instructions)
}

/// Reads the immediates of `opcode`. Unmapped opcodes carry none.
pub fn decode_instruction(opcode: u8, reader: &mut Reader) -> Result<Instruction, DecodeError> {
    let immediate = opcode::lookup(opcode)
        .map(|info| info.immediate)
        .unwrap_or(Immediate::Plain);

    let operands = match immediate {
        Immediate::Plain => vec![],
        Immediate::BlockType => vec![Operand::Block(BlockType::decode(reader)?)],
        Immediate::Index => vec![Operand::Int(i64::from(reader.read_vu32()?))],
        Immediate::I32 => vec![Operand::Int(i64::from(reader.read_vs32()?))],
        Immediate::I64 => vec![Operand::Int(reader.read_vs64()?)],
        Immediate::F32 => vec![Operand::F32(reader.read_f32()?)],
        Immediate::F64 => vec![Operand::F64(reader.read_f64()?)],
        Immediate::MemArg => vec![Operand::Mem(MemArg::decode(reader)?)],
        Immediate::BrTable => {
            let offset = reader.pos();
            let count = reader.read_vu32()?;
            limits::check(
                "br_table labels",
                u64::from(count),
                limits::MAX_BR_TABLE_LABELS,
                offset,
            )?;
            let mut labels = Vec::with_capacity(count as usize + 1);
            for _ in 0..count {
                labels.push(Operand::Int(i64::from(reader.read_vu32()?)));
            }
            // default label
            labels.push(Operand::Int(i64::from(reader.read_vu32()?)));
            labels
        }
        Immediate::CallIndirect => {
            let type_idx = reader.read_vu32()?;
            let table_idx = reader.read_vu32()?;
            vec![
                Operand::Int(i64::from(table_idx)),
                Operand::TypeUse(type_idx),
            ]
        }
        Immediate::Reserved => {
            reader.read_byte()?;
            vec![]
        }
    };

    Ok(Instruction::new(opcode, operands))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::encoding::{write_f32, write_f64, write_vs32, write_vs64};

    fn decode_all(bytes: &[u8]) -> Vec<Instruction> {
        let mut reader = Reader::new(bytes);
        let instructions = decode_body(&mut reader, bytes.len()).expect("decode body");
        assert!(reader.at_end());
        instructions
    }

    fn mnemonics(instructions: &[Instruction]) -> Vec<String> {
        instructions.iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn trailing_end_is_not_recorded() {
        let instructions = decode_all(&[0x01, 0x0b]);
        assert_eq!(mnemonics(&instructions), vec!["nop"]);
    }

    #[test]
    fn nested_end_is_recorded() {
        let instructions = decode_all(&[0x02, 0x40, 0x01, 0x0b, 0x0b]);
        assert_eq!(mnemonics(&instructions), vec!["block", "nop", "end"]);
        assert_eq!(
            instructions[0].operands,
            vec![Operand::Block(BlockType::Empty)]
        );
    }

    #[test]
    fn constants() {
        let mut bytes = vec![0x41];
        write_vs32(&mut bytes, i32::MIN);
        bytes.push(0x42);
        write_vs64(&mut bytes, i64::MIN);
        bytes.push(0x43);
        write_f32(&mut bytes, 0.5);
        bytes.push(0x44);
        write_f64(&mut bytes, -1.25);
        bytes.push(0x0b);

        let instructions = decode_all(&bytes);
        assert_eq!(
            instructions,
            vec![
                Instruction::new(0x41, vec![Operand::Int(i32::MIN as i64)]),
                Instruction::new(0x42, vec![Operand::Int(i64::MIN)]),
                Instruction::new(0x43, vec![Operand::F32(0.5)]),
                Instruction::new(0x44, vec![Operand::F64(-1.25)]),
            ]
        );
    }

    #[test]
    fn block_types() {
        let instructions = decode_all(&[
            0x03, 0x7f, 0x0b, // loop (result i32)
            0x04, 0x05, 0x0b, // if (type 5)
            0x0b,
        ]);
        assert_eq!(
            mnemonics(&instructions),
            vec!["loop (result i32)", "end", "if (type 5)", "end"]
        );
    }

    #[test]
    fn negative_block_type_is_invalid() {
        // 0x41 is s33 -63: neither 0x40 nor a value type, and not a type index
        let bytes = [0x01, 0x02, 0x41, 0x0b, 0x0b];
        let mut reader = Reader::new(&bytes);
        assert_eq!(
            decode_body(&mut reader, bytes.len()),
            Err(DecodeError::InvalidBlockType {
                value: -63,
                offset: 2
            })
        );

        // multi-byte negative encodings are rejected the same way
        let bytes = [0x03, 0xff, 0x7f, 0x0b, 0x0b];
        let mut reader = Reader::new(&bytes);
        assert_eq!(
            decode_body(&mut reader, bytes.len()),
            Err(DecodeError::InvalidBlockType {
                value: -1,
                offset: 1
            })
        );
    }

    #[test]
    fn memory_and_table_immediates() {
        let instructions = decode_all(&[
            0x28, 0x02, 0x10, // i32.load align=4 offset=16
            0x3f, 0x00, // memory.size
            0x11, 0x01, 0x00, // call_indirect type 1 table 0
            0x0e, 0x02, 0x00, 0x01, 0x02, // br_table 0 1 default 2
            0x0b,
        ]);
        assert_eq!(
            mnemonics(&instructions),
            vec![
                "i32.load offset=16 align=4",
                "memory.size",
                "call_indirect 0 (type 1)",
                "br_table 0 1 2",
            ]
        );
    }

    #[test]
    fn unknown_opcode_does_not_abort() {
        let instructions = decode_all(&[0x06, 0x01, 0x0b]);
        assert_eq!(mnemonics(&instructions), vec!["unknown_0x6", "nop"]);
        assert_eq!(instructions[0].opcode, 0x06);
        assert!(instructions[0].operands.is_empty());
    }

    #[test]
    fn truncated_immediate_is_eof() {
        let bytes = [0x44, 0x00, 0x00];
        let mut reader = Reader::new(&bytes);
        assert_eq!(
            decode_body(&mut reader, bytes.len()),
            Err(DecodeError::UnexpectedEof { offset: 1 })
        );
    }

    #[test]
    fn br_table_limit() {
        let bytes = [0x0e, 0xff, 0xff, 0xff, 0xff, 0x0f];
        let mut reader = Reader::new(&bytes);
        assert!(matches!(
            decode_body(&mut reader, bytes.len()),
            Err(DecodeError::LimitExceeded { what: "br_table labels", .. })
        ));
    }
}
