//! Filling a prompt's blanks with the chosen responses.

use crate::data::cards::{PromptCard, ResponseCard};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

const BLANK: char = '_';

#[derive(Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Lowercase the first letter of responses inserted mid-sentence
    pub lowercase_insertions: bool,
}

/// A span of rendered text. Inserted spans came from response cards, which lets a presentation
/// layer highlight them.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Segment {
    Literal(String),
    Inserted(String),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Literal(text) | Segment::Inserted(text) => text,
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Rendered {
    segments: Vec<Segment>,
}

impl Rendered {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn to_plain(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    fn push_literal<S: Into<String>>(&mut self, text: S) {
        let text = text.into();
        if !text.is_empty() {
            self.segments.push(Segment::Literal(text));
        }
    }

    fn push_inserted<S: Into<String>>(&mut self, text: S) {
        self.segments.push(Segment::Inserted(text.into()));
    }
}

impl Display for Rendered {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str(segment.text())?;
        }
        Ok(())
    }
}

/// Renders `prompt` with `responses` filled in, in the order given. Works the same for a partial
/// selection as for a complete one.
///
/// Prompts without blanks get the responses appended: a single response verbatim, several as a
/// comma separated list with every trailing period but the last removed. Otherwise each blank is
/// replaced, left to right, by the next response minus its trailing period. Surplus responses are
/// dropped and surplus blanks stay as `_`.
pub fn render<'a, I>(prompt: &PromptCard, responses: I, options: RenderOptions) -> Rendered
where I: IntoIterator<Item = &'a ResponseCard> {
    let responses = responses
        .into_iter()
        .map(|response| response.text.as_str())
        .collect::<Vec<_>>();
    let mut rendered = Rendered::default();

    if responses.is_empty() {
        rendered.push_literal(prompt.text.as_str());
        return rendered;
    }

    let blanks = prompt.blanks();

    if blanks == 0 {
        rendered.push_literal(format!("{} ", prompt.text.trim_end()));

        let last = responses.len() - 1;
        let appended = responses
            .iter()
            .enumerate()
            .map(|(index, text)| {
                if index == last {
                    *text
                } else {
                    strip_period(text)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        rendered.push_inserted(appended);
        return rendered;
    }

    let mut rest = prompt.text.as_str();
    for text in responses.into_iter().take(blanks) {
        let index = match rest.find(BLANK) {
            Some(index) => index,
            None => break,
        };

        let mut insertion = strip_period(text).to_owned();
        if options.lowercase_insertions && index > 0 {
            insertion = lowercase_first(&insertion);
        }

        rendered.push_literal(&rest[.. index]);
        rendered.push_inserted(insertion);
        rest = &rest[index + BLANK.len_utf8() ..];
    }
    rendered.push_literal(rest);

    rendered
}

fn strip_period(text: &str) -> &str {
    text.strip_suffix('.').unwrap_or(text)
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
