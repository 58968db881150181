//! Declarative content descriptions consumed by the printer.

use smol_str::SmolStr;

/// Anything the printer knows how to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Structure {
    Function(FunctionStructure),
    Variable(VariableStructure),
}

/// A function to print.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionStructure {
    pub name: SmolStr,
    pub params: Vec<SmolStr>,
    /// Body statements, one line of source text each. Ignored when
    /// `declaration_only` is set.
    pub body: Vec<String>,
    /// Print as an ambient declaration (`function f(a);`) with no body.
    pub declaration_only: bool,
}

/// A `let` binding to print.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariableStructure {
    pub name: SmolStr,
    /// Initializer expression as source text.
    pub initializer: String,
}
