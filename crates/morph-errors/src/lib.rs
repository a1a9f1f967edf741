use std::fmt::{self, Display};

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;

/// A parse error anchored at a range of the source text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    message: String,
    range: TextRange,
}

impl Diagnostic {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn error(message: impl Into<String>, range: TextRange) -> Self {
        Self { message: message.into(), range }
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let message = Level::Error.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(Level::Error.span(self.range.into()).label("here"))
                .fold(true),
        );
        renderer.render(message)
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:?}", self.message, self.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_render() {
        let text = "class A extends {}";
        let diagnostic = Diagnostic::error("expected a type", TextRange::new(16.into(), 17.into()));
        let renderer = Renderer::plain();
        let rendered = diagnostic.render(&renderer, "main.ts", text).to_string();

        assert!(rendered.starts_with("error: expected a type"));
        assert!(rendered.contains("main.ts"));
        assert!(rendered.contains("class A extends {}"));
        assert!(rendered.contains("^ here"));
    }

    #[test]
    fn display() {
        let diagnostic = Diagnostic::error("expected a type", TextRange::new(3.into(), 5.into()));
        assert_eq!(diagnostic.to_string(), "expected a type at 3..5");
    }
}
