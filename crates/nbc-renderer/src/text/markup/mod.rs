//! Markdown conversion for text cells.
//!
//! [`MarkupWriter`] walks pulldown-cmark events and delegates every construct
//! to a [`MarkupTarget`]. Nested blocks are rendered bottom-up: a container
//! collects its children's output first, so targets that need indentation
//! (RST list items, block quotes) receive the finished content.

mod html;
mod latex;
mod rst;

use std::marker::PhantomData;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

pub use html::HtmlMarkup;
pub use latex::{LatexMarkup, escape_latex};
pub use rst::RstMarkup;

pub(crate) use latex::section_command;
pub(crate) use rst::underline_heading;

/// Render markdown as an HTML fragment.
///
/// # Examples
///
/// ```
/// use nbc_renderer::text::markup::to_html;
///
/// assert_eq!(to_html("Some *text*"), "<p>Some <em>text</em></p>");
/// ```
#[must_use]
pub fn to_html(markdown: &str) -> String {
    MarkupWriter::<HtmlMarkup>::new().render(markdown)
}

/// Render markdown as reStructuredText.
///
/// # Examples
///
/// ```
/// use nbc_renderer::text::markup::to_rst;
///
/// assert_eq!(to_rst("# Title\n\nSome **bold**"), "Title\n=====\n\nSome **bold**");
/// ```
#[must_use]
pub fn to_rst(markdown: &str) -> String {
    MarkupWriter::<RstMarkup>::new().render(markdown)
}

/// Render markdown as a LaTeX body fragment.
///
/// # Examples
///
/// ```
/// use nbc_renderer::text::markup::to_latex;
///
/// assert_eq!(to_latex("50% *off*"), "50\\% \\emph{off}");
/// ```
#[must_use]
pub fn to_latex(markdown: &str) -> String {
    MarkupWriter::<LatexMarkup>::new().render(markdown)
}

/// Output format for [`MarkupWriter`].
///
/// Inline functions receive already rendered content; block functions write a
/// complete block without surrounding separators.
pub trait MarkupTarget {
    /// Placed between consecutive blocks.
    const BLOCK_SEPARATOR: &'static str;

    /// Plain text, escaped for the target.
    fn text(text: &str, out: &mut String);

    fn inline_code(code: &str, out: &mut String);

    fn inline_math(tex: &str, out: &mut String);

    fn display_math(tex: &str, out: &mut String);

    fn inline_html(html: &str, out: &mut String);

    fn emphasis(content: &str, out: &mut String);

    fn strong(content: &str, out: &mut String);

    /// Targets without strikethrough keep the content unmarked.
    fn strikethrough(content: &str, out: &mut String) {
        out.push_str(content);
    }

    fn link(dest: &str, content: &str, out: &mut String);

    fn image(src: &str, alt: &str, title: &str, out: &mut String);

    fn soft_break(out: &mut String) {
        out.push('\n');
    }

    fn hard_break(out: &mut String);

    fn task_list_marker(checked: bool, out: &mut String) {
        out.push_str(if checked { "[x] " } else { "[ ] " });
    }

    fn paragraph(content: &str, out: &mut String);

    fn heading(level: u8, content: &str, out: &mut String);

    fn code_block(lang: Option<&str>, code: &str, out: &mut String);

    fn block_quote(content: &str, out: &mut String);

    /// `start` is `Some` for ordered lists.
    fn list(start: Option<u64>, items: &[String], out: &mut String);

    fn rule(out: &mut String);

    fn html_block(html: &str, out: &mut String);

    fn table(head: &[String], rows: &[Vec<String>], out: &mut String);
}

enum FrameKind {
    Root,
    Paragraph,
    Heading(u8),
    BlockQuote,
    CodeBlock(Option<String>),
    HtmlBlock,
    List(Option<u64>, Vec<String>),
    Item,
    Table(Vec<String>, Vec<Vec<String>>),
    Row { head: bool, cells: Vec<String> },
    Cell,
    Emphasis,
    Strong,
    Strikethrough,
    Link(String),
    Image { src: String, title: String },
    /// Construct without a target rendering; content passes through.
    Transparent,
}

struct Frame {
    kind: FrameKind,
    buf: String,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            buf: String::new(),
        }
    }
}

/// Markdown walker generic over the output format.
pub struct MarkupWriter<T: MarkupTarget> {
    stack: Vec<Frame>,
    _target: PhantomData<T>,
}

impl<T: MarkupTarget> MarkupWriter<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: vec![Frame::new(FrameKind::Root)],
            _target: PhantomData,
        }
    }

    /// Parser options used for notebook markdown.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_MATH
    }

    /// Render markdown text.
    pub fn render(mut self, markdown: &str) -> String {
        for event in Parser::new_ext(markdown, Self::parser_options()) {
            self.process_event(event);
        }
        while self.stack.len() > 1 {
            self.end();
        }
        self.stack
            .pop()
            .map(|root| root.buf.trim_end().to_owned())
            .unwrap_or_default()
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline(|out| T::inline_code(&code, out)),
            Event::InlineMath(tex) => self.inline(|out| T::inline_math(&tex, out)),
            Event::DisplayMath(tex) => self.inline(|out| T::display_math(&tex, out)),
            Event::Html(html) => self.top().buf.push_str(&html),
            Event::InlineHtml(html) => self.inline(|out| T::inline_html(&html, out)),
            Event::SoftBreak => self.inline(T::soft_break),
            Event::HardBreak => self.inline(T::hard_break),
            Event::Rule => {
                let mut out = String::new();
                T::rule(&mut out);
                self.push_block(out);
            }
            Event::TaskListMarker(checked) => self.inline(|out| T::task_list_marker(checked, out)),
            Event::FootnoteReference(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        let kind = match tag {
            Tag::Paragraph => FrameKind::Paragraph,
            Tag::Heading { level, .. } => FrameKind::Heading(heading_level_to_num(level)),
            Tag::BlockQuote(_) => FrameKind::BlockQuote,
            Tag::CodeBlock(kind) => FrameKind::CodeBlock(match kind {
                CodeBlockKind::Fenced(info) => info
                    .split_whitespace()
                    .next()
                    .map(str::to_owned),
                CodeBlockKind::Indented => None,
            }),
            Tag::HtmlBlock => FrameKind::HtmlBlock,
            Tag::List(start) => FrameKind::List(start, Vec::new()),
            Tag::Item => FrameKind::Item,
            Tag::Table(_) => FrameKind::Table(Vec::new(), Vec::new()),
            Tag::TableHead => FrameKind::Row {
                head: true,
                cells: Vec::new(),
            },
            Tag::TableRow => FrameKind::Row {
                head: false,
                cells: Vec::new(),
            },
            Tag::TableCell => FrameKind::Cell,
            Tag::Emphasis => FrameKind::Emphasis,
            Tag::Strong => FrameKind::Strong,
            Tag::Strikethrough => FrameKind::Strikethrough,
            Tag::Link { dest_url, .. } => FrameKind::Link(dest_url.into_string()),
            Tag::Image {
                dest_url, title, ..
            } => FrameKind::Image {
                src: dest_url.into_string(),
                title: title.into_string(),
            },
            _ => FrameKind::Transparent,
        };
        self.stack.push(Frame::new(kind));
    }

    fn end(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(Frame { kind, buf }) = self.stack.pop() else {
            return;
        };

        let mut out = String::new();
        match kind {
            FrameKind::Root => {}
            FrameKind::Paragraph => {
                T::paragraph(buf.trim(), &mut out);
                self.push_block(out);
            }
            FrameKind::Heading(level) => {
                T::heading(level, buf.trim(), &mut out);
                self.push_block(out);
            }
            FrameKind::BlockQuote => {
                T::block_quote(buf.trim_end(), &mut out);
                self.push_block(out);
            }
            FrameKind::CodeBlock(lang) => {
                T::code_block(lang.as_deref(), &buf, &mut out);
                self.push_block(out);
            }
            FrameKind::HtmlBlock => {
                T::html_block(buf.trim_end(), &mut out);
                self.push_block(out);
            }
            FrameKind::List(start, items) => {
                T::list(start, &items, &mut out);
                self.push_block(out);
            }
            FrameKind::Item => {
                if let FrameKind::List(_, items) = &mut self.top().kind {
                    items.push(buf.trim_end().to_owned());
                }
            }
            FrameKind::Table(head, rows) => {
                T::table(&head, &rows, &mut out);
                self.push_block(out);
            }
            FrameKind::Row { head, cells } => {
                if let FrameKind::Table(table_head, rows) = &mut self.top().kind {
                    if head {
                        *table_head = cells;
                    } else {
                        rows.push(cells);
                    }
                }
            }
            FrameKind::Cell => {
                if let FrameKind::Row { cells, .. } = &mut self.top().kind {
                    cells.push(buf.trim().to_owned());
                }
            }
            FrameKind::Emphasis => self.inline(|out| T::emphasis(&buf, out)),
            FrameKind::Strong => self.inline(|out| T::strong(&buf, out)),
            FrameKind::Strikethrough => self.inline(|out| T::strikethrough(&buf, out)),
            FrameKind::Link(dest) => self.inline(|out| T::link(&dest, &buf, out)),
            FrameKind::Image { src, title } => self.inline(|out| T::image(&src, &buf, &title, out)),
            FrameKind::Transparent => self.top().buf.push_str(&buf),
        }
    }

    fn text(&mut self, text: &str) {
        let frame = self.top();
        match frame.kind {
            FrameKind::CodeBlock(_) | FrameKind::HtmlBlock | FrameKind::Image { .. } => {
                frame.buf.push_str(text);
            }
            _ => T::text(text, &mut frame.buf),
        }
    }

    fn inline(&mut self, write: impl FnOnce(&mut String)) {
        write(&mut self.top().buf);
    }

    fn push_block(&mut self, block: String) {
        if block.is_empty() {
            return;
        }
        let buf = &mut self.top().buf;
        if !buf.is_empty() {
            buf.push_str(T::BLOCK_SEPARATOR);
        }
        buf.push_str(&block);
    }

    fn top(&mut self) -> &mut Frame {
        // The root frame is never popped while events are processed.
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}

impl<T: MarkupTarget> Default for MarkupWriter<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
