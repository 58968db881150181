//! A small indentation-aware text writer.

/// How printed code is indented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentStyle {
    /// Four spaces per level.
    #[default]
    FourSpaces,
    /// Two spaces per level.
    TwoSpaces,
    /// One tab per level.
    Tabs,
}

impl IndentStyle {
    fn unit(self) -> &'static str {
        match self {
            Self::FourSpaces => "    ",
            Self::TwoSpaces => "  ",
            Self::Tabs => "\t",
        }
    }
}

/// Settings the printer consults while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintSettings {
    pub indent: IndentStyle,
    pub newline: &'static str,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            indent: IndentStyle::FourSpaces,
            newline: "\n",
        }
    }
}

/// Accumulates output, tracking the current indentation level.
pub(crate) struct TextWriter<'a> {
    settings: &'a PrintSettings,
    out: String,
    level: usize,
    at_line_start: bool,
}

impl<'a> TextWriter<'a> {
    pub(crate) fn new(settings: &'a PrintSettings) -> Self {
        Self {
            settings,
            out: String::new(),
            level: 0,
            at_line_start: true,
        }
    }

    pub(crate) fn write(&mut self, text: &str) {
        if self.at_line_start && !text.is_empty() {
            for _ in 0..self.level {
                self.out.push_str(self.settings.indent.unit());
            }
            self.at_line_start = false;
        }
        self.out.push_str(text);
    }

    pub(crate) fn write_line(&mut self, text: &str) {
        self.write(text);
        self.newline();
    }

    pub(crate) fn newline(&mut self) {
        self.out.push_str(self.settings.newline);
        self.at_line_start = true;
    }

    pub(crate) fn indent(&mut self) {
        self.level += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indentation_applies_per_line() {
        let settings = PrintSettings {
            indent: IndentStyle::TwoSpaces,
            newline: "\n",
        };
        let mut writer = TextWriter::new(&settings);
        writer.write_line("a {");
        writer.indent();
        writer.write_line("b;");
        writer.dedent();
        writer.write_line("}");
        assert_eq!(writer.finish(), "a {\n  b;\n}\n");
    }
}
