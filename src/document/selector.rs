//! Selector engine of [`MemoryDocument`](crate::document::MemoryDocument).
//!
//! Supports a subset of CSS: type and universal selectors, `#id`, `.class`,
//! `[attr]` and `[attr=value]` compounds, the descendant and child
//! combinators, and comma-separated lists. Pseudo-classes, sibling
//! combinators and attribute operators other than `=` are rejected as
//! invalid. The browser host hands selectors to `querySelector` unchanged.

use crate::err;
use crate::result::{UiError, UiResult};
use unscanny::Scanner;

/// Comma-separated list of complex selectors; matches if any member matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<ComplexSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// Compounds left to right; the combinator of the first entry is unused.
    parts: Vec<(Combinator, CompoundSelector)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    pub value: Option<String>,
}

/// Element view the selector engine matches against.
pub trait SelectorElement: Sized {
    fn tag_name(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;
    fn parent_element(&self) -> Option<Self>;
}

pub fn parse_selector(input: &str) -> UiResult<SelectorList> {
    SelectorParser::new(input).parse()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

struct SelectorParser<'a> {
    input: &'a str,
    scanner: Scanner<'a>,
}

impl<'a> SelectorParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            scanner: Scanner::new(input),
        }
    }

    fn error(&self, message: &str) -> UiError {
        err!(
            InvalidSelector,
            "{} at offset {} in '{}'",
            message,
            self.scanner.cursor(),
            self.input
        )
    }

    fn parse(mut self) -> UiResult<SelectorList> {
        let mut selectors = vec![];
        loop {
            self.scanner.eat_whitespace();
            selectors.push(self.parse_complex()?);
            self.scanner.eat_whitespace();
            if self.scanner.eat_if(',') {
                continue;
            }
            if self.scanner.done() {
                break;
            }
            return Err(self.error("Unexpected character"));
        }
        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> UiResult<ComplexSelector> {
        let mut parts = vec![];
        let mut combinator = Combinator::Descendant;
        loop {
            parts.push((combinator, self.parse_compound()?));
            let had_whitespace = !self.scanner.eat_whitespace().is_empty();
            match self.scanner.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.scanner.eat();
                    self.scanner.eat_whitespace();
                    combinator = Combinator::Child;
                }
                Some(_) if had_whitespace => {
                    combinator = Combinator::Descendant;
                }
                Some(_) => return Err(self.error("Unexpected character")),
            }
        }
        Ok(ComplexSelector { parts })
    }

    fn parse_compound(&mut self) -> UiResult<CompoundSelector> {
        let start = self.scanner.cursor();
        let mut compound = CompoundSelector::default();
        if !self.scanner.eat_if('*') {
            let tag = self.scanner.eat_while(is_ident_char);
            if !tag.is_empty() {
                compound.tag = Some(tag.to_ascii_lowercase());
            }
        }
        loop {
            match self.scanner.peek() {
                Some('#') => {
                    self.scanner.eat();
                    compound.id = Some(self.parse_identifier()?);
                }
                Some('.') => {
                    self.scanner.eat();
                    compound.classes.push(self.parse_identifier()?);
                }
                Some('[') => {
                    self.scanner.eat();
                    compound.attributes.push(self.parse_attribute()?);
                }
                _ => break,
            }
        }
        if self.scanner.cursor() == start {
            return Err(self.error("Expected selector"));
        }
        Ok(compound)
    }

    fn parse_identifier(&mut self) -> UiResult<String> {
        let identifier = self.scanner.eat_while(is_ident_char);
        if identifier.is_empty() {
            return Err(self.error("Expected identifier"));
        }
        Ok(identifier.to_string())
    }

    fn parse_attribute(&mut self) -> UiResult<AttributeSelector> {
        self.scanner.eat_whitespace();
        let name = self.parse_identifier()?.to_ascii_lowercase();
        self.scanner.eat_whitespace();
        let mut value = None;
        if self.scanner.eat_if('=') {
            self.scanner.eat_whitespace();
            value = Some(match self.scanner.peek() {
                Some(quote @ ('"' | '\'')) => {
                    self.scanner.eat();
                    let quoted = self.scanner.eat_until(quote).to_string();
                    if !self.scanner.eat_if(quote) {
                        return Err(self.error("Unterminated string"));
                    }
                    quoted
                }
                _ => self.parse_identifier()?,
            });
            self.scanner.eat_whitespace();
        }
        if !self.scanner.eat_if(']') {
            return Err(self.error("Expected ']'"));
        }
        Ok(AttributeSelector { name, value })
    }
}

impl SelectorList {
    pub fn matches<E: SelectorElement>(&self, element: &E) -> bool {
        self.selectors
            .iter()
            .any(|selector| selector.matches(element))
    }
}

impl ComplexSelector {
    pub fn matches<E: SelectorElement>(&self, element: &E) -> bool {
        let last = self.parts.len() - 1;
        self.parts[last].1.matches(element) && self.matches_ancestors(last, element)
    }

    fn matches_ancestors<E: SelectorElement>(&self, index: usize, element: &E) -> bool {
        if index == 0 {
            return true;
        }
        let (combinator, _) = &self.parts[index];
        let (_, previous) = &self.parts[index - 1];
        match combinator {
            Combinator::Child => element.parent_element().is_some_and(|parent| {
                previous.matches(&parent) && self.matches_ancestors(index - 1, &parent)
            }),
            Combinator::Descendant => {
                let mut ancestor = element.parent_element();
                while let Some(candidate) = ancestor {
                    if previous.matches(&candidate) && self.matches_ancestors(index - 1, &candidate)
                    {
                        return true;
                    }
                    ancestor = candidate.parent_element();
                }
                false
            }
        }
    }
}

impl CompoundSelector {
    pub fn matches<E: SelectorElement>(&self, element: &E) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag_name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.attribute("id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class_attribute = element.attribute("class").unwrap_or_default();
            if !self.classes.iter().all(|class| {
                class_attribute
                    .split_ascii_whitespace()
                    .any(|candidate| candidate == class)
            }) {
                return false;
            }
        }
        self.attributes.iter().all(|attribute| {
            match (element.attribute(&attribute.name), &attribute.value) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
            }
        })
    }
}
