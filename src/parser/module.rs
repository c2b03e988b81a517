use serde::Serialize;
use std::fmt;

use super::encoding;
use super::instruction::Instruction;

/// A decoded module. Only the type, function, export and code sections are
/// modelled; every other section is skipped during decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub version: u32,
    pub types: Vec<FuncType>,
    /// Type index of each defined function, in function index order.
    pub functions: Vec<u32>,
    pub exports: Vec<Export>,
    /// Function bodies, parallel to `functions`.
    pub code: Vec<FuncBody>,
    /// Non-fatal problems found while decoding.
    pub diagnostics: Vec<Diagnostic>,
}

impl Module {
    pub fn new(version: u32) -> Module {
        Module {
            version,
            types: Vec::new(),
            functions: Vec::new(),
            exports: Vec::new(),
            code: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// The type of the function at `index`, if both the function and its type
    /// index are in range.
    pub fn func_type(&self, index: u32) -> Option<&FuncType> {
        let type_index = *self.functions.get(index as usize)?;
        self.types.get(type_index as usize)
    }

    /// Name of the first function export pointing at `index`.
    pub fn get_function_name(&self, index: u32) -> Option<&str> {
        self.exports
            .iter()
            .find(|export| export.kind == ExportKind::Function && export.index == index)
            .map(|export| export.name.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    // Number types
    I32,
    I64,
    F32,
    F64,
    // Vector types
    V128,
    // Reference types
    FuncRef,
    ExternRef,
}

impl ValueType {
    pub fn decode(byte: u8) -> Option<Self> {
        match byte {
            0x7f => Some(ValueType::I32),
            0x7e => Some(ValueType::I64),
            0x7d => Some(ValueType::F32),
            0x7c => Some(ValueType::F64),
            0x7b => Some(ValueType::V128),
            0x70 => Some(ValueType::FuncRef),
            0x6f => Some(ValueType::ExternRef),
            _ => None,
        }
    }

    pub fn byte(&self) -> u8 {
        match self {
            ValueType::I32 => 0x7f,
            ValueType::I64 => 0x7e,
            ValueType::F32 => 0x7d,
            ValueType::F64 => 0x7c,
            ValueType::V128 => 0x7b,
            ValueType::FuncRef => 0x70,
            ValueType::ExternRef => 0x6f,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::V128 => "v128",
            ValueType::FuncRef => "funcref",
            ValueType::ExternRef => "externref",
        })
    }
}

/// Binary section identifiers (§5.5.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionId {
    Custom = 0,
    Type = 1,
    Import = 2,
    Function = 3,
    Table = 4,
    Memory = 5,
    Global = 6,
    Export = 7,
    Start = 8,
    Element = 9,
    Code = 10,
    Data = 11,
}

impl SectionId {
    pub fn from_byte(byte: u8) -> Option<SectionId> {
        use SectionId::*;
        Some(match byte {
            0 => Custom,
            1 => Type,
            2 => Import,
            3 => Function,
            4 => Table,
            5 => Memory,
            6 => Global,
            7 => Export,
            8 => Start,
            9 => Element,
            10 => Code,
            11 => Data,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuncType {
    pub params: Vec<ValueType>,
    pub results: Vec<ValueType>,
}

impl fmt::Display for FuncType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let join = |types: &[ValueType]| {
            types
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "({}) -> ({})", join(&self.params), join(&self.results))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Function,
    Table,
    Memory,
    Global,
    /// A descriptor byte outside the four known kinds, kept as-is.
    Other(u8),
}

impl ExportKind {
    pub fn decode(byte: u8) -> ExportKind {
        match byte {
            encoding::DESC_FUNC => ExportKind::Function,
            encoding::DESC_TABLE => ExportKind::Table,
            encoding::DESC_MEMORY => ExportKind::Memory,
            encoding::DESC_GLOBAL => ExportKind::Global,
            other => ExportKind::Other(other),
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExportKind::Function => f.write_str("func"),
            ExportKind::Table => f.write_str("table"),
            ExportKind::Memory => f.write_str("memory"),
            ExportKind::Global => f.write_str("global"),
            ExportKind::Other(byte) => write!(f, "kind_{byte}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Export {
    pub name: String,
    pub kind: ExportKind,
    pub index: u32,
}

/// A run of `count` locals sharing one type, as encoded in the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocalGroup {
    pub count: u32,
    pub value_type: ValueType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuncBody {
    pub locals: Vec<LocalGroup>,
    pub instructions: Vec<Instruction>,
}

impl FuncBody {
    /// Total number of declared locals after run-length expansion.
    pub fn local_count(&self) -> u64 {
        self.locals.iter().map(|group| u64::from(group.count)).sum()
    }
}

/// A recoverable problem. Decoding continues after recording one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Diagnostic {
    /// A section decoder read past the section's declared end; the cursor was
    /// moved back to the declared end.
    SectionOverrun {
        id: u8,
        declared_end: usize,
        reached: usize,
    },
    /// Instruction decoding ran past a function body's declared end.
    BodyOverrun {
        func: u32,
        declared_end: usize,
        reached: usize,
    },
    FunctionCountMismatch { functions: usize, bodies: usize },
    TypeIndexOutOfRange { func: u32, type_index: u32, types: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Diagnostic::SectionOverrun {
                id,
                declared_end,
                reached,
            } => write!(
                f,
                "section {id} parsed past end: declared end {declared_end:#x}, reached {reached:#x}"
            ),
            Diagnostic::BodyOverrun {
                func,
                declared_end,
                reached,
            } => write!(
                f,
                "body of func[{func}] parsed past end: declared end {declared_end:#x}, reached {reached:#x}"
            ),
            Diagnostic::FunctionCountMismatch { functions, bodies } => write!(
                f,
                "function and code section counts differ: {functions} functions, {bodies} bodies"
            ),
            Diagnostic::TypeIndexOutOfRange {
                func,
                type_index,
                types,
            } => write!(
                f,
                "func[{func}] refers to type {type_index} but only {types} types are defined"
            ),
        }
    }
}
