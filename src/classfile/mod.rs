//! Class-file access on top of the krakatau2 class model
//!
//! Parsing and rebuilding go through krakatau2; this module adds the
//! reference extraction the unit graph needs.

mod descriptor;

pub use descriptor::referenced_type_names;
pub use krakatau2::lib::classfile::parse::Class;

use krakatau2::lib::classfile::cpool::Const;
use krakatau2::lib::{assemble, classfile, parse_utf8, AssemblerOptions, DisassemblerOptions, ParserOptions};
use std::collections::BTreeSet;
use thiserror::Error;

/// Code attributes are always read in their long form
const PARSER_OPTIONS: ParserOptions = ParserOptions {
    no_short_code_attr: true,
};

#[derive(Debug, Error)]
pub enum ClassFileError {
    #[error("Malformed class file: {0}")]
    Parse(String),

    #[error("Failed to disassemble class: {0}")]
    Disassemble(#[source] std::io::Error),

    #[error("Disassembly is not valid UTF-8: {0}")]
    Source(#[from] std::str::Utf8Error),

    #[error("Failed to assemble class: {0}")]
    Assemble(String),
}

/// Parse a class file; the result borrows from `bytes`
pub fn parse(bytes: &[u8]) -> Result<Class<'_>, ClassFileError> {
    classfile::parse(bytes, PARSER_OPTIONS).map_err(|err| ClassFileError::Parse(format!("{:?}", err)))
}

/// Rebuild class bytes by disassembling to source and assembling it back
pub fn reassemble(class: &Class<'_>) -> Result<Vec<u8>, ClassFileError> {
    let mut out = Vec::new();
    krakatau2::lib::disassemble::disassemble(&mut out, class, DisassemblerOptions { roundtrip: true })
        .map_err(ClassFileError::Disassemble)?;

    let source = std::str::from_utf8(&out)?;
    let mut assembled =
        assemble(source, AssemblerOptions {}).map_err(|err| ClassFileError::Assemble(format!("{:?}", err)))?;

    assembled
        .pop()
        .map(|(_, data)| data)
        .ok_or_else(|| ClassFileError::Assemble("no class in assembler output".to_string()))
}

/// Internal name of the class itself (`com/example/Main`)
pub fn this_class_name(class: &Class<'_>) -> Option<String> {
    class.cp.clsutf(class.this).and_then(parse_utf8).map(|name| name.to_string())
}

/// Every class a class file refers to, as dotted names, excluding itself
///
/// Sources: Class constants (array classes included) and every UTF-8
/// constant that parses as a descriptor or generic signature. The second
/// source covers member descriptors, NameAndType and MethodType
/// descriptors, `Signature` attributes and annotation types.
pub fn referenced_classes(class: &Class<'_>) -> BTreeSet<String> {
    let mut internal_names = BTreeSet::new();

    // Pool slots line up with constant indices
    for (index, constant) in class.cp.0.iter().enumerate() {
        let Ok(index) = u16::try_from(index) else {
            break;
        };

        match constant {
            Const::Class(name_index) => {
                let Some(name) = utf8(class, *name_index) else {
                    continue;
                };
                if name.starts_with('[') {
                    internal_names.extend(referenced_type_names(&name));
                } else {
                    internal_names.insert(name);
                }
            }
            Const::Utf8(_) => {
                if let Some(text) = utf8(class, index) {
                    internal_names.extend(referenced_type_names(&text));
                }
            }
            _ => {}
        }
    }

    if let Some(own) = this_class_name(class) {
        internal_names.remove(&own);
    }

    internal_names
        .into_iter()
        .map(|name| name.replace('/', "."))
        .collect()
}

fn utf8(class: &Class<'_>, index: u16) -> Option<String> {
    class.cp.utf8(index).and_then(parse_utf8).map(|text| text.to_string())
}
