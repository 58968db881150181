//! Structural printer: declarative descriptions of code to insert.
//!
//! The edit engine never composes source text itself; callers describe what
//! they want as a [`Structure`] and the printer renders it. The engine
//! treats the rendered text as opaque and hands it straight to the parser.

mod structures;
mod writer;

pub use structures::{FunctionStructure, Structure, VariableStructure};
pub use writer::{IndentStyle, PrintSettings};

use writer::TextWriter;

/// Render a structure to insertable source text.
pub fn print_structure(structure: &Structure, settings: &PrintSettings) -> String {
    let mut writer = TextWriter::new(settings);
    match structure {
        Structure::Function(function) => print_function(function, &mut writer),
        Structure::Variable(variable) => print_variable(variable, &mut writer),
    }
    writer.finish()
}

fn print_function(function: &FunctionStructure, writer: &mut TextWriter<'_>) {
    writer.write("function ");
    writer.write(&function.name);
    writer.write("(");
    for (i, param) in function.params.iter().enumerate() {
        if i > 0 {
            writer.write(", ");
        }
        writer.write(param);
    }
    writer.write(")");

    // Ambient declarations have no body at all.
    if function.declaration_only {
        writer.write(";");
        writer.newline();
        return;
    }

    writer.write(" {");
    writer.newline();
    writer.indent();
    for statement in &function.body {
        writer.write_line(statement);
    }
    writer.dedent();
    writer.write_line("}");
}

fn print_variable(variable: &VariableStructure, writer: &mut TextWriter<'_>) {
    writer.write("let ");
    writer.write(&variable.name);
    writer.write(" = ");
    writer.write(&variable.initializer);
    writer.write(";");
    writer.newline();
}

#[cfg(test)]
mod tests {
    use super::*;
    use smol_str::SmolStr;

    #[test]
    fn print_full_function() {
        let structure = Structure::Function(FunctionStructure {
            name: SmolStr::new("add"),
            params: vec![SmolStr::new("a"), SmolStr::new("b")],
            body: vec!["return a + b;".to_string()],
            declaration_only: false,
        });
        let text = print_structure(&structure, &PrintSettings::default());
        assert_eq!(text, "function add(a, b) {\n    return a + b;\n}\n");
    }

    #[test]
    fn print_declaration_only_function() {
        let structure = Structure::Function(FunctionStructure {
            name: SmolStr::new("ambient"),
            params: vec![SmolStr::new("x")],
            body: Vec::new(),
            declaration_only: true,
        });
        let text = print_structure(&structure, &PrintSettings::default());
        assert_eq!(text, "function ambient(x);\n");
    }

    #[test]
    fn print_variable_structure() {
        let structure = Structure::Variable(VariableStructure {
            name: SmolStr::new("count"),
            initializer: "0".to_string(),
        });
        let text = print_structure(&structure, &PrintSettings::default());
        assert_eq!(text, "let count = 0;\n");
    }

    #[test]
    fn tab_indentation() {
        let settings = PrintSettings {
            indent: IndentStyle::Tabs,
            ..PrintSettings::default()
        };
        let structure = Structure::Function(FunctionStructure {
            name: SmolStr::new("f"),
            params: Vec::new(),
            body: vec!["return 1;".to_string()],
            declaration_only: false,
        });
        let text = print_structure(&structure, &settings);
        assert_eq!(text, "function f() {\n\treturn 1;\n}\n");
    }

    #[test]
    fn printed_function_parses_cleanly() {
        let structure = Structure::Function(FunctionStructure {
            name: SmolStr::new("twice"),
            params: vec![SmolStr::new("x")],
            body: vec!["return x + x;".to_string()],
            declaration_only: false,
        });
        let text = print_structure(&structure, &PrintSettings::default());
        let parsed = crate::parser::parse(&text);
        assert!(parsed.ok(), "printer produced unparseable text: {text:?}");
    }
}
