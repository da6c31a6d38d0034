//! Textual notation for red-blue graphs.
//!
//! A leaf prints as the lower-case letter of its color, an inner node as the
//! upper-case letter followed by its children in parentheses. The root is blue:
//! the unit is `B(r)`, the gadget `B(R(b,b),r,r)`.

use std::fmt;
use std::str::FromStr;

use nom::{
    character::complete::{char, multispace0, one_of},
    combinator::{cut, map},
    error::{ErrorKind, ParseError},
    multi::separated_list1,
    sequence::{delimited, terminated},
    IResult,
};

use super::types::{Color, Rbg};

impl Color {
    fn letter(self, leaf: bool) -> char {
        match (self, leaf) {
            (Color::Blue, true) => 'b',
            (Color::Blue, false) => 'B',
            (Color::Red, true) => 'r',
            (Color::Red, false) => 'R',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter(false))
    }
}

impl Rbg {
    fn write_colored(&self, f: &mut fmt::Formatter<'_>, color: Color) -> fmt::Result {
        write!(f, "{}", color.letter(self.is_empty()))?;
        if self.is_empty() {
            return Ok(());
        }
        write!(f, "(")?;
        for (idx, child) in self.children().iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            child.write_colored(f, color.flip())?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Rbg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_colored(f, Color::Blue)
    }
}

impl fmt::Debug for Rbg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Errors surfaced while parsing the graph notation. Offsets are byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseGraphError {
    UnexpectedEnd,
    UnexpectedChar { offset: usize, found: char },
    ColorMismatch { offset: usize, expected: Color },
    TrailingInput { offset: usize },
}

impl fmt::Display for ParseGraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEnd => write!(f, "unexpected end of graph notation"),
            Self::UnexpectedChar { offset, found } => {
                write!(f, "unexpected character {found:?} at offset {offset}")
            }
            Self::ColorMismatch { offset, expected } => {
                write!(f, "color out of alternation at offset {offset} (expected {expected})")
            }
            Self::TrailingInput { offset } => write!(f, "trailing input at offset {offset}"),
        }
    }
}

impl std::error::Error for ParseGraphError {}

/// nom error: the unparsed input where parsing stopped and, for an alternation
/// clash, the color the grammar wanted there.
#[derive(Debug)]
struct NotationError<'a> {
    input: &'a str,
    expected: Option<Color>,
}

impl<'a> ParseError<&'a str> for NotationError<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        NotationError {
            input,
            expected: None,
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl NotationError<'_> {
    fn locate(self, src: &str) -> ParseGraphError {
        let offset = src.len() - self.input.len();
        match (self.expected, self.input.chars().next()) {
            (Some(expected), _) => ParseGraphError::ColorMismatch { offset, expected },
            (None, Some(found)) => ParseGraphError::UnexpectedChar { offset, found },
            (None, None) => ParseGraphError::UnexpectedEnd,
        }
    }
}

type NotationResult<'a, O> = IResult<&'a str, O, NotationError<'a>>;

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> NotationResult<'a, O>
where
    F: FnMut(&'a str) -> NotationResult<'a, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// One node whose letter must have color `expected`; children alternate.
fn node<'a>(expected: Color, input: &'a str) -> NotationResult<'a, Rbg> {
    let (input, _) = multispace0::<_, NotationError<'a>>(input)?;
    let (rest, letter) = one_of::<_, _, NotationError<'a>>("bBrR")(input)?;
    let color = if letter.eq_ignore_ascii_case(&'b') {
        Color::Blue
    } else {
        Color::Red
    };
    if color != expected {
        return Err(nom::Err::Failure(NotationError {
            input,
            expected: Some(expected),
        }));
    }
    if letter.is_ascii_lowercase() {
        return Ok((rest, Rbg::leaf()));
    }
    let child = move |i: &'a str| node(expected.flip(), i);
    map(
        delimited(
            ws(char('(')),
            separated_list1(ws(char(',')), cut(child)),
            ws(char(')')),
        ),
        Rbg::new,
    )(rest)
}

fn graph<'a>(input: &'a str) -> NotationResult<'a, Rbg> {
    terminated(|i: &'a str| node(Color::Blue, i), multispace0)(input)
}

impl FromStr for Rbg {
    type Err = ParseGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rest, parsed) = graph(s).map_err(|err| match err {
            nom::Err::Incomplete(_) => ParseGraphError::UnexpectedEnd,
            nom::Err::Error(e) | nom::Err::Failure(e) => e.locate(s),
        })?;
        if !rest.is_empty() {
            return Err(ParseGraphError::TrailingInput {
                offset: s.len() - rest.len(),
            });
        }
        Ok(parsed)
    }
}
