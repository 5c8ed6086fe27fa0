//! Colorizing for the tagged text the model answers with.
//!
//! The security and explain prompts ask the model to format its answer with
//! a small set of XML-like tags (`<red>`, `<bold>`, ...). Input is parsed into
//! a [`StyledText`] tree first and rendered in a second pass, so nested tags
//! always style the already-rendered inner text.

use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Cyan,
    White,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Reset,
}

impl Tag {
    /// Tags the model is told it may use. `reset` is accepted but never advertised.
    pub const ADVERTISED: [Tag; 11] = [
        Tag::Red,
        Tag::Green,
        Tag::Blue,
        Tag::Yellow,
        Tag::Purple,
        Tag::Cyan,
        Tag::White,
        Tag::Bold,
        Tag::Italic,
        Tag::Underline,
        Tag::Strikethrough,
    ];

    pub fn from_name(name: &str) -> Option<Tag> {
        match name {
            "red" => Some(Tag::Red),
            "green" => Some(Tag::Green),
            "blue" => Some(Tag::Blue),
            "yellow" => Some(Tag::Yellow),
            "purple" => Some(Tag::Purple),
            "cyan" => Some(Tag::Cyan),
            "white" => Some(Tag::White),
            "bold" => Some(Tag::Bold),
            "italic" => Some(Tag::Italic),
            "underline" => Some(Tag::Underline),
            "strikethrough" => Some(Tag::Strikethrough),
            "reset" => Some(Tag::Reset),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::Red => "red",
            Tag::Green => "green",
            Tag::Blue => "blue",
            Tag::Yellow => "yellow",
            Tag::Purple => "purple",
            Tag::Cyan => "cyan",
            Tag::White => "white",
            Tag::Bold => "bold",
            Tag::Italic => "italic",
            Tag::Underline => "underline",
            Tag::Strikethrough => "strikethrough",
            Tag::Reset => "reset",
        }
    }

    /// Applies this tag's terminal style to already-rendered text.
    pub fn apply(self, text: &str) -> String {
        match self {
            Tag::Red => text.red().to_string(),
            Tag::Green => text.green().to_string(),
            Tag::Blue => text.blue().to_string(),
            Tag::Yellow => text.yellow().to_string(),
            Tag::Purple => text.magenta().to_string(),
            Tag::Cyan => text.cyan().to_string(),
            Tag::White => text.white().to_string(),
            Tag::Bold => text.bold().to_string(),
            Tag::Italic => text.italic().to_string(),
            Tag::Underline => text.underline().to_string(),
            Tag::Strikethrough => text.strikethrough().to_string(),
            Tag::Reset => text.clear().to_string(),
        }
    }

    /// `<red>, <green>, ...` for use in prompts.
    pub fn advertised_list() -> String {
        Self::ADVERTISED
            .iter()
            .map(|tag| format!("<{}>", tag.name()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Tagged(Tag, StyledText),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText(pub Vec<Node>);

impl StyledText {
    pub fn parse(input: &str) -> Self {
        Parser {
            input,
            pos: 0,
            open: Vec::new(),
        }
        .parse_sequence()
    }

    pub fn render(&self) -> String {
        self.0
            .iter()
            .map(|node| match node {
                Node::Text(text) => text.clone(),
                Node::Tagged(tag, inner) => tag.apply(&inner.render()),
            })
            .collect()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Node::Text(last)) = self.0.last_mut() {
            last.push_str(text);
        } else {
            self.0.push(Node::Text(text.to_string()));
        }
    }

    fn append(&mut self, other: StyledText) {
        for node in other.0 {
            match node {
                Node::Text(text) => self.push_text(&text),
                tagged => self.0.push(tagged),
            }
        }
    }
}

/// Parses and renders in one go.
pub fn render(input: &str) -> String {
    StyledText::parse(input).render()
}

/// Deepest tag nesting that is styled. Opening tags past it are kept as text.
pub const MAX_DEPTH: usize = 256;

enum Markup {
    Open(Tag, usize),
    Close(Tag, usize),
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    // Tags opened by enclosing calls, innermost last
    open: Vec<Tag>,
}

impl<'a> Parser<'a> {
    /// Reads nodes until the input ends or a closing tag for one of the
    /// enclosing open tags is reached. That closing tag is left unconsumed.
    fn parse_sequence(&mut self) -> StyledText {
        let mut out = StyledText::default();

        while self.pos < self.input.len() {
            let next = self.input[self.pos..]
                .find('<')
                .map(|offset| self.pos + offset)
                .unwrap_or(self.input.len());

            if next > self.pos {
                out.push_text(&self.input[self.pos..next]);
                self.pos = next;
                continue;
            }

            match self.markup_at() {
                Some(Markup::Open(_, len)) if self.open.len() >= MAX_DEPTH => {
                    out.push_text(&self.input[self.pos..self.pos + len]);
                    self.pos += len;
                }
                Some(Markup::Open(tag, len)) => {
                    let opening = &self.input[self.pos..self.pos + len];
                    self.pos += len;

                    self.open.push(tag);
                    let inner = self.parse_sequence();
                    self.open.pop();

                    match self.markup_at() {
                        Some(Markup::Close(closing, close_len)) if closing == tag => {
                            self.pos += close_len;
                            out.0.push(Node::Tagged(tag, inner));
                        }
                        _ => {
                            // Never closed: keep the markup as written
                            out.push_text(opening);
                            out.append(inner);
                        }
                    }
                }
                Some(Markup::Close(tag, _)) if self.open.contains(&tag) => return out,
                _ => {
                    out.push_text("<");
                    self.pos += 1;
                }
            }
        }

        out
    }

    fn markup_at(&self) -> Option<Markup> {
        let rest = self.input[self.pos..].strip_prefix('<')?;
        let (closing, rest) = match rest.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        let end = rest.find('>')?;
        let tag = Tag::from_name(&rest[..end])?;

        if closing {
            Some(Markup::Close(tag, end + 3))
        } else {
            Some(Markup::Open(tag, end + 2))
        }
    }
}
