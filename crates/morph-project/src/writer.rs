use crate::settings::{ManipulationSettings, QuoteKind};

/// Builds source text line by line with relative indentation.
///
/// Lines are always separated by `\n`; the manipulation engine converts them
/// to the configured newline when the text is spliced into a file.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    settings: ManipulationSettings,
    text: String,
    level: usize,
}

impl CodeWriter {
    pub fn new(settings: ManipulationSettings) -> Self {
        Self { settings, text: String::new(), level: 0 }
    }

    pub fn settings(&self) -> ManipulationSettings {
        self.settings
    }

    /// Writes `text`, indenting every line that starts inside it.
    pub fn write(&mut self, text: &str) -> &mut Self {
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                self.text.push('\n');
            }
            if line.is_empty() {
                continue;
            }
            if self.is_at_start_of_line() {
                for _ in 0..self.level {
                    self.text.push_str(self.settings.indentation.as_str());
                }
            }
            self.text.push_str(line);
        }
        self
    }

    pub fn write_line(&mut self, text: &str) -> &mut Self {
        self.write(text).new_line()
    }

    pub fn conditional_write(&mut self, condition: bool, text: &str) -> &mut Self {
        if condition {
            self.write(text);
        }
        self
    }

    pub fn new_line(&mut self) -> &mut Self {
        self.text.push('\n');
        self
    }

    /// A newline, unless the text is empty or already ends a line.
    pub fn new_line_if_last_not(&mut self) -> &mut Self {
        if !self.text.is_empty() && !self.is_at_start_of_line() {
            self.new_line();
        }
        self
    }

    /// Ends the current line and leaves one empty line, never two.
    pub fn blank_line(&mut self) -> &mut Self {
        self.new_line_if_last_not();
        if !self.text.is_empty() && !self.text.ends_with("\n\n") {
            self.new_line();
        }
        self
    }

    pub fn blank_line_if(&mut self, condition: bool) -> &mut Self {
        if condition {
            self.blank_line();
        }
        self
    }

    pub fn space(&mut self) -> &mut Self {
        self.text.push(' ');
        self
    }

    pub fn space_if_last_not(&mut self) -> &mut Self {
        if !self.text.is_empty() && !self.text.ends_with([' ', '\n']) {
            self.space();
        }
        self
    }

    /// Runs `body` one level deeper.
    pub fn indent(&mut self, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.level += 1;
        body(self);
        self.level -= 1;
        self
    }

    /// ` {`, the indented body, then `}` on its own line.
    pub fn block(&mut self, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.space_if_last_not();
        self.inline_block(body)
    }

    /// Like [`block`](Self::block) without the leading space.
    pub fn inline_block(&mut self, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.write("{").new_line();
        self.indent(body);
        self.new_line_if_last_not();
        self.write("}")
    }

    /// Writes `text` as a string literal in the configured quote style.
    pub fn quote(&mut self, text: &str) -> &mut Self {
        let quote = self.settings.quote.as_char();
        let mut literal = String::with_capacity(text.len() + 2);
        literal.push(quote);
        for c in text.chars() {
            match c {
                '\\' => literal.push_str("\\\\"),
                '\n' => literal.push_str("\\n"),
                '\r' => literal.push_str("\\r"),
                c if c == quote => {
                    literal.push('\\');
                    literal.push(c);
                }
                c => literal.push(c),
            }
        }
        literal.push(quote);
        self.write(&literal)
    }

    pub fn is_at_start_of_line(&self) -> bool {
        self.text.is_empty() || self.text.ends_with('\n')
    }

    pub fn quote_kind(&self) -> QuoteKind {
        self.settings.quote
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The written text without trailing newlines.
    pub fn into_text(mut self) -> String {
        let len = self.text.trim_end_matches('\n').len();
        self.text.truncate(len);
        self.text
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;
    use crate::settings::IndentationText;

    #[test]
    fn blocks_indent_relative_to_the_writer() {
        let mut writer = CodeWriter::new(ManipulationSettings::default());
        writer.write("class A").block(|writer| {
            writer.write_line("x: number;");
            writer.blank_line();
            writer.write("m()").block(|writer| {
                writer.write("return 1;\nreturn 2;");
            });
        });

        expect![[r#"
            class A {
                x: number;

                m() {
                    return 1;
                    return 2;
                }
            }"#]]
        .assert_eq(&writer.into_text());
    }

    #[test]
    fn conditional_newlines() {
        let mut writer = CodeWriter::new(ManipulationSettings::default());
        writer.new_line_if_last_not().blank_line().write("a").new_line_if_last_not();
        writer.new_line_if_last_not().blank_line().blank_line().write("b");
        assert_eq!(writer.text(), "a\n\nb");
    }

    #[test]
    fn quotes_follow_settings() {
        let settings = ManipulationSettings {
            quote: QuoteKind::Single,
            indentation: IndentationText::Tab,
            ..ManipulationSettings::default()
        };
        let mut writer = CodeWriter::new(settings);
        writer.quote("it's").write(" ").quote("a\"b");
        assert_eq!(writer.text(), r#"'it\'s' 'a"b'"#);
    }
}
