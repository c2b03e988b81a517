//! Common test utilities shared between integration tests
#![allow(dead_code)]

use watdump::parser::encoding::{write_name, write_section, write_vu32, MAGIC_BYTES};

pub const I32: u8 = 0x7f;
pub const I64: u8 = 0x7e;
pub const F32: u8 = 0x7d;
pub const F64: u8 = 0x7c;

/// The factorial module, the same bytes as `tests/fixtures/factorial.wasm.hex`.
pub fn factorial_module() -> Vec<u8> {
    let text = include_str!("fixtures/factorial.wasm.hex");
    let digits: String = text.split_whitespace().collect();
    hex::decode(digits).expect("fixture is valid hex")
}

/// Assembles a binary module section by section.
pub struct ModuleBuilder {
    bytes: Vec<u8>,
}

impl ModuleBuilder {
    pub fn new() -> ModuleBuilder {
        let mut bytes = MAGIC_BYTES.to_vec();
        bytes.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]);
        ModuleBuilder { bytes }
    }

    pub fn section(mut self, id: u8, payload: &[u8]) -> ModuleBuilder {
        write_section(&mut self.bytes, id, payload);
        self
    }

    /// Appends raw bytes, e.g. a section with a deliberately wrong length.
    pub fn raw(mut self, bytes: &[u8]) -> ModuleBuilder {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn types(self, types: &[(&[u8], &[u8])]) -> ModuleBuilder {
        let mut payload = Vec::new();
        write_vu32(&mut payload, types.len() as u32);
        for (params, results) in types {
            payload.push(0x60);
            write_vu32(&mut payload, params.len() as u32);
            payload.extend_from_slice(params);
            write_vu32(&mut payload, results.len() as u32);
            payload.extend_from_slice(results);
        }
        self.section(1, &payload)
    }

    pub fn functions(self, type_indices: &[u32]) -> ModuleBuilder {
        let mut payload = Vec::new();
        write_vu32(&mut payload, type_indices.len() as u32);
        for index in type_indices {
            write_vu32(&mut payload, *index);
        }
        self.section(3, &payload)
    }

    pub fn exports(self, exports: &[(&str, u8, u32)]) -> ModuleBuilder {
        let mut payload = Vec::new();
        write_vu32(&mut payload, exports.len() as u32);
        for (name, kind, index) in exports {
            write_name(&mut payload, name);
            payload.push(*kind);
            write_vu32(&mut payload, *index);
        }
        self.section(7, &payload)
    }

    /// Each body is its locals plus instructions; the size prefix is added here.
    pub fn code(self, bodies: &[Vec<u8>]) -> ModuleBuilder {
        let mut payload = Vec::new();
        write_vu32(&mut payload, bodies.len() as u32);
        for body in bodies {
            write_vu32(&mut payload, body.len() as u32);
            payload.extend_from_slice(body);
        }
        self.section(10, &payload)
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// A function body: local groups followed by the instruction bytes, which
/// should include the final `end`.
pub fn body(locals: &[(u32, u8)], code: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    write_vu32(&mut bytes, locals.len() as u32);
    for (count, value_type) in locals {
        write_vu32(&mut bytes, *count);
        bytes.push(*value_type);
    }
    bytes.extend_from_slice(code);
    bytes
}
