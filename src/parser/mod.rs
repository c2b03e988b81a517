//! Binary format decoder.
//!
//! [`parse`] validates the header, then walks the sections in order. Type,
//! function, export and code sections are decoded into a [`Module`]; every
//! other section is skipped by its declared length. After each section the
//! reader is resynchronised to the declared end, so a decoder that reads too
//! little or too much does not corrupt the following sections. Over-reads
//! are recorded as [`Diagnostic`]s rather than failing the decode.

pub mod encoding;
pub mod error;
pub mod instruction;
pub mod leb128;
pub mod limits;
pub mod module;
pub mod reader;

pub use error::{DecodeError, HeaderField};
pub use module::{Diagnostic, Module};

use log::{debug, trace, warn};

use module::{Export, ExportKind, FuncBody, FuncType, LocalGroup, SectionId, ValueType};
use reader::Reader;

/// Decodes a module from `bytes`.
pub fn parse(bytes: &[u8]) -> Result<Module, DecodeError> {
    if bytes.len() < encoding::HEADER_LEN {
        return Err(DecodeError::TooShort { len: bytes.len() });
    }

    let mut reader = Reader::new(bytes);
    let version = read_header(&mut reader)?;
    let mut module = Module::new(version);

    while !reader.at_end() {
        let sec_id = reader.read_byte()?;
        let sec_len = reader.read_vu32()? as usize;
        let sec_start = reader.pos();

        if !reader.has_at_least(sec_len) {
            debug!(
                "section #{sec_id} declares {sec_len} bytes but only {} remain",
                reader.remaining()
            );
            return Err(DecodeError::UnexpectedEof { offset: sec_start });
        }
        let sec_end = sec_start + sec_len;

        debug!("section #{sec_id} at {sec_start:#x}, len = {sec_len}");
        read_section(sec_id, sec_end, &mut reader, &mut module)?;

        if reader.pos() > sec_end {
            let diagnostic = Diagnostic::SectionOverrun {
                id: sec_id,
                declared_end: sec_end,
                reached: reader.pos(),
            };
            warn!("{diagnostic}");
            module.diagnostics.push(diagnostic);
        }
        reader.skip_to(sec_end);
    }

    check_function_space(&mut module);
    Ok(module)
}

fn read_header(reader: &mut Reader) -> Result<u32, DecodeError> {
    let magic = reader.read_u32()?;
    if magic != encoding::MAGIC {
        return Err(DecodeError::InvalidHeader {
            field: HeaderField::Magic,
            value: magic,
        });
    }

    let version = reader.read_u32()?;
    if version != encoding::VERSION {
        return Err(DecodeError::InvalidHeader {
            field: HeaderField::Version,
            value: version,
        });
    }

    trace!("magic={magic:#x}, version={version}");
    Ok(version)
}

fn read_section(
    sec_id: u8,
    sec_end: usize,
    reader: &mut Reader,
    module: &mut Module,
) -> Result<(), DecodeError> {
    match SectionId::from_byte(sec_id) {
        Some(SectionId::Type) => read_section_type(reader, &mut module.types),
        Some(SectionId::Function) => read_section_function(reader, &mut module.functions),
        Some(SectionId::Export) => read_section_export(reader, &mut module.exports),
        Some(SectionId::Code) => read_section_code(reader, module),
        other => {
            debug!("skipping section #{sec_id} ({other:?})");
            reader.skip_to(sec_end);
            Ok(())
        }
    }
}

// Cross-section consistency. Neither problem stops formatting, so both are
// reported rather than raised.
fn check_function_space(module: &mut Module) {
    if module.functions.len() != module.code.len() {
        let diagnostic = Diagnostic::FunctionCountMismatch {
            functions: module.functions.len(),
            bodies: module.code.len(),
        };
        warn!("{diagnostic}");
        module.diagnostics.push(diagnostic);
    }

    let types = module.types.len();
    let out_of_range: Vec<Diagnostic> = module
        .functions
        .iter()
        .enumerate()
        .filter(|(_, type_index)| **type_index as usize >= types)
        .map(|(func, type_index)| Diagnostic::TypeIndexOutOfRange {
            func: func as u32,
            type_index: *type_index,
            types,
        })
        .collect();
    for diagnostic in out_of_range {
        warn!("{diagnostic}");
        module.diagnostics.push(diagnostic);
    }
}

/* SECTION READERS ************************************************/

fn read_count(reader: &mut Reader, what: &'static str, limit: u32) -> Result<u32, DecodeError> {
    let offset = reader.pos();
    let count = reader.read_vu32()?;
    limits::check(what, u64::from(count), limit, offset)?;
    Ok(count)
}

fn read_value_type(reader: &mut Reader) -> Result<ValueType, DecodeError> {
    let offset = reader.pos();
    let byte = reader.read_byte()?;
    ValueType::decode(byte)
        .ok_or(DecodeError::InvalidValueType { byte, offset })
}

fn read_result_types(
    reader: &mut Reader,
    what: &'static str,
    limit: u32,
) -> Result<Vec<ValueType>, DecodeError> {
    let count = read_count(reader, what, limit)?;
    let mut types = Vec::with_capacity(count as usize);
    for _ in 0..count {
        types.push(read_value_type(reader)?);
    }
    Ok(types)
}

fn read_section_type(reader: &mut Reader, types: &mut Vec<FuncType>) -> Result<(), DecodeError> {
    let count = read_count(reader, "types", limits::MAX_TYPES)?;

    for _ in 0..count {
        let offset = reader.pos();
        let form = reader.read_byte()?;
        if form != encoding::TYPE_FUNC {
            return Err(DecodeError::InvalidTypeForm { form, offset });
        }
        let params = read_result_types(reader, "params", limits::MAX_FUNCTION_PARAMS)?;
        let results = read_result_types(reader, "results", limits::MAX_FUNCTION_RETURNS)?;

        let func_type = FuncType { params, results };
        trace!("type[{}] {}", types.len(), func_type);
        types.push(func_type);
    }

    Ok(())
}

fn read_section_function(
    reader: &mut Reader,
    functions: &mut Vec<u32>,
) -> Result<(), DecodeError> {
    let count = read_count(reader, "functions", limits::MAX_FUNCTIONS)?;

    for _ in 0..count {
        functions.push(reader.read_vu32()?);
    }

    Ok(())
}

fn read_section_export(
    reader: &mut Reader,
    exports: &mut Vec<Export>,
) -> Result<(), DecodeError> {
    let count = read_count(reader, "exports", limits::MAX_EXPORTS)?;

    for _ in 0..count {
        let name = reader.read_string()?;
        let kind = ExportKind::decode(reader.read_byte()?);
        let index = reader.read_vu32()?;
        exports.push(Export { name, kind, index });
    }

    Ok(())
}

fn read_section_code(reader: &mut Reader, module: &mut Module) -> Result<(), DecodeError> {
    let count = read_count(reader, "function bodies", limits::MAX_FUNCTIONS)?;
    let mut module_locals: u64 = module.code.iter().map(FuncBody::local_count).sum();

    for _ in 0..count {
        let func = module.code.len() as u32;
        let size = reader.read_vu32()? as usize;
        let body_start = reader.pos();
        if !reader.has_at_least(size) {
            return Err(DecodeError::UnexpectedEof { offset: body_start });
        }
        let body_end = body_start + size;

        let locals = read_locals(reader)?;
        let local_count: u64 = locals.iter().map(|g| u64::from(g.count)).sum();
        module_locals += local_count;
        limits::check(
            "locals in module",
            module_locals,
            limits::MAX_MODULE_LOCALS,
            body_start,
        )?;

        let instructions = instruction::decode_body(reader, body_end)?;

        if reader.pos() > body_end {
            let diagnostic = Diagnostic::BodyOverrun {
                func,
                declared_end: body_end,
                reached: reader.pos(),
            };
            warn!("{diagnostic}");
            module.diagnostics.push(diagnostic);
        }
        reader.skip_to(body_end);

        trace!(
            "func[{func}] {} local groups, {} instructions",
            locals.len(),
            instructions.len()
        );
        module.code.push(FuncBody {
            locals,
            instructions,
        });
    }

    Ok(())
}

fn read_locals(reader: &mut Reader) -> Result<Vec<LocalGroup>, DecodeError> {
    let groups = read_count(reader, "local groups", limits::MAX_FUNCTION_LOCALS)?;
    let mut locals = Vec::with_capacity(groups as usize);
    let mut total: u64 = 0;

    for _ in 0..groups {
        let offset = reader.pos();
        let count = reader.read_vu32()?;
        total += u64::from(count);
        limits::check("locals", total, limits::MAX_FUNCTION_LOCALS, offset)?;
        let value_type = read_value_type(reader)?;
        locals.push(LocalGroup { count, value_type });
    }

    Ok(locals)
}
