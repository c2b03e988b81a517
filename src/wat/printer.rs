use crate::parser::instruction::Instruction;
use crate::parser::module::{Export, ExportKind, FuncBody, FuncType, Module, ValueType};

const INDENT: &str = "  ";

const OP_ELSE: u8 = 0x05;
const OP_END: u8 = 0x0b;

/// Line-oriented writer holding the current nesting depth.
pub(crate) struct Printer {
    lines: Vec<String>,
    depth: usize,
}

impl Printer {
    pub(crate) fn new() -> Printer {
        Printer {
            lines: Vec::new(),
            depth: 0,
        }
    }

    pub(crate) fn finish(self) -> String {
        self.lines.join("\n")
    }

    fn emit(&mut self, line: &str) {
        self.lines.push(format!("{}{}", INDENT.repeat(self.depth), line));
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    // Never dedents below `floor`.
    fn dedent_to(&mut self, floor: usize) {
        self.depth = self.depth.saturating_sub(1).max(floor);
    }

    pub(crate) fn print_module(&mut self, module: &Module) {
        self.emit("(module");
        self.indent();

        for (index, func_type) in module.types.iter().enumerate() {
            self.emit(&format!("(type $t{}{})", index, func_signature(func_type)));
        }

        for index in 0..module.functions.len() as u32 {
            self.print_function(module, index);
        }

        // Only the first function export of an existing function is inlined in
        // its header; every other export gets its own line.
        for (position, export) in module.exports.iter().enumerate() {
            if !is_inlined(module, position) {
                self.emit(&format_export(export));
            }
        }

        self.dedent_to(0);
        self.emit(")");
    }

    fn print_function(&mut self, module: &Module, index: u32) {
        let mut header = format!("(func $f{index}");
        if let Some(name) = module.get_function_name(index) {
            header.push_str(&format!(" (export {})", quote(name)));
        }
        if let Some(type_index) = module.functions.get(index as usize) {
            header.push_str(&format!(" (type $t{type_index})"));
        }
        if let Some(func_type) = module.func_type(index) {
            for (i, param) in func_type.params.iter().enumerate() {
                header.push_str(&format!(" (param $p{i} {param})"));
            }
            header.push_str(&results_clause(&func_type.results));
        }

        self.emit(&header);
        self.indent();
        let body_depth = self.depth;

        if let Some(body) = module.code.get(index as usize) {
            self.print_body(body, body_depth);
        }

        self.depth = body_depth;
        self.dedent_to(0);
        self.emit(")");
    }

    fn print_body(&mut self, body: &FuncBody, floor: usize) {
        for group in &body.locals {
            for _ in 0..group.count {
                self.emit(&format!("(local {})", group.value_type));
            }
        }
        for instruction in &body.instructions {
            self.print_instruction(instruction, floor);
        }
    }

    fn print_instruction(&mut self, instruction: &Instruction, floor: usize) {
        if matches!(instruction.opcode, OP_END | OP_ELSE) {
            self.dedent_to(floor);
        }
        self.emit(&instruction.to_string());
        if instruction.opens_block() || instruction.opcode == OP_ELSE {
            self.indent();
        }
    }
}

/// ` (func (param ...) (result ...))`, clauses omitted when empty.
fn func_signature(func_type: &FuncType) -> String {
    let mut text = String::from(" (func");
    if !func_type.params.is_empty() {
        text.push_str(" (param");
        for param in &func_type.params {
            text.push_str(&format!(" {}", param));
        }
        text.push(')');
    }
    text.push_str(&results_clause(&func_type.results));
    text.push(')');
    text
}

fn results_clause(results: &[ValueType]) -> String {
    if results.is_empty() {
        return String::new();
    }
    let types: Vec<String> = results.iter().map(|t| t.to_string()).collect();
    format!(" (result {})", types.join(" "))
}

// True when the export at `position` is the one named in its function's
// header: a function export of a defined function, and the first such export
// for that index.
fn is_inlined(module: &Module, position: usize) -> bool {
    let export = &module.exports[position];
    if export.kind != ExportKind::Function || export.index as usize >= module.functions.len() {
        return false;
    }
    !module.exports[..position]
        .iter()
        .any(|earlier| earlier.kind == ExportKind::Function && earlier.index == export.index)
}

fn format_export(export: &Export) -> String {
    format!(
        "(export {} ({} {}))",
        quote(&export.name),
        export.kind,
        export.index
    )
}

/// Text-format string literal: quotes, backslashes and control characters
/// are escaped, everything else is written as UTF-8.
fn quote(name: &str) -> String {
    let mut text = String::with_capacity(name.len() + 2);
    text.push('"');
    for c in name.chars() {
        match c {
            '"' => text.push_str("\\\""),
            '\\' => text.push_str("\\\\"),
            '\t' => text.push_str("\\t"),
            '\n' => text.push_str("\\n"),
            '\r' => text.push_str("\\r"),
            c if c.is_control() => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    text.push_str(&format!("\\{:02x}", byte));
                }
            }
            c => text.push(c),
        }
    }
    text.push('"');
    text
}
