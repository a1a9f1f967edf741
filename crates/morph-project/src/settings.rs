/// Formatting used when text is generated for manipulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManipulationSettings {
    pub indentation: IndentationText,
    pub new_line: NewLineKind,
    pub quote: QuoteKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentationText {
    TwoSpaces,
    #[default]
    FourSpaces,
    EightSpaces,
    Tab,
}

impl IndentationText {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwoSpaces => "  ",
            Self::FourSpaces => "    ",
            Self::EightSpaces => "        ",
            Self::Tab => "\t",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewLineKind {
    #[default]
    LineFeed,
    CarriageReturnLineFeed,
}

impl NewLineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LineFeed => "\n",
            Self::CarriageReturnLineFeed => "\r\n",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteKind {
    #[default]
    Double,
    Single,
}

impl QuoteKind {
    pub fn as_char(self) -> char {
        match self {
            Self::Double => '"',
            Self::Single => '\'',
        }
    }
}
