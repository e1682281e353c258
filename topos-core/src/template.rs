/// Positional row templates used by `fmt` on vertex and face arrays
use std::fmt::Write;

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res, opt, value},
    multi::many0,
    sequence::{delimited, pair, preceded},
    IResult,
};

use crate::error::{Result, ToposError};

/// A value that can be substituted into a template field.
pub trait TemplateValue {
    fn render(&self, out: &mut String, precision: Option<usize>);
}

impl TemplateValue for f64 {
    fn render(&self, out: &mut String, precision: Option<usize>) {
        // Debug keeps the trailing ".0" on integral values.
        let _ = match precision {
            Some(p) => write!(out, "{:.*}", p, self),
            None => write!(out, "{:?}", self),
        };
    }
}

impl TemplateValue for usize {
    fn render(&self, out: &mut String, _precision: Option<usize>) {
        let _ = write!(out, "{}", self);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Literal(String),
    Field {
        index: Option<usize>,
        precision: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Field { index: usize, precision: Option<usize> },
}

/// A parsed row template.
///
/// Literal text with brace fields: `{}` takes the next column, `{2}` takes
/// column 2, `{:.3}` / `{1:.3}` render a float with 3 decimals, and `{{` /
/// `}}` produce literal braces. Auto-numbered and explicitly numbered fields
/// cannot be mixed.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
    width: usize,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let pieces = match all_consuming(pieces)(source) {
            Ok((_, pieces)) => pieces,
            Err(e) => return Err(ToposError::template(source, format!("{e:?}"))),
        };

        let mut segments = Vec::with_capacity(pieces.len());
        let mut next_auto = 0;
        let mut auto = None;
        let mut width = 0;

        for piece in pieces {
            match piece {
                Piece::Literal(text) => match segments.last_mut() {
                    Some(Segment::Literal(prev)) => prev.push_str(&text),
                    _ => segments.push(Segment::Literal(text)),
                },
                Piece::Field { index, precision } => {
                    let is_auto = index.is_none();
                    if *auto.get_or_insert(is_auto) != is_auto {
                        return Err(ToposError::template(
                            source,
                            "cannot mix automatic and manual field numbering",
                        ));
                    }

                    let index = index.unwrap_or_else(|| {
                        next_auto += 1;
                        next_auto - 1
                    });
                    width = width.max(index + 1);
                    segments.push(Segment::Field { index, precision });
                }
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments,
            width,
        })
    }

    /// Number of columns a row needs to satisfy every field.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Fail unless rows of `columns` values can fill every field.
    pub fn check_width(&self, columns: usize) -> Result<()> {
        if self.width > columns {
            return Err(ToposError::template(
                &self.source,
                format!(
                    "field index {} out of range for rows of {} values",
                    self.width - 1,
                    columns
                ),
            ));
        }
        Ok(())
    }

    pub fn render<V: TemplateValue>(&self, row: &[V]) -> Result<String> {
        self.check_width(row.len())?;

        let mut out = String::new();
        self.render_into(&mut out, row);
        Ok(out)
    }

    /// Render without the width check; callers must have checked already.
    pub(crate) fn render_into<V: TemplateValue>(&self, out: &mut String, row: &[V]) {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { index, precision } => row[*index].render(out, *precision),
            }
        }
    }
}

/// Render `rows` through `template`, joined by `sep` and wrapped by
/// `prefix`/`suffix`.
pub(crate) fn render_rows<'a, V, I>(
    template: &str,
    prefix: &str,
    suffix: &str,
    sep: &str,
    columns: usize,
    rows: I,
) -> Result<String>
where
    V: TemplateValue + 'a,
    I: IntoIterator<Item = &'a [V]>,
{
    let template = Template::parse(template)?;
    template.check_width(columns)?;

    let mut out = String::from(prefix);
    for (i, row) in rows.into_iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        template.render_into(&mut out, row);
    }
    out.push_str(suffix);

    Ok(out)
}

fn pieces(input: &str) -> IResult<&str, Vec<Piece>> {
    many0(alt((escape, field, literal)))(input)
}

fn escape(input: &str) -> IResult<&str, Piece> {
    alt((
        value(Piece::Literal("{".to_string()), tag("{{")),
        value(Piece::Literal("}".to_string()), tag("}}")),
    ))(input)
}

fn field(input: &str) -> IResult<&str, Piece> {
    map(
        delimited(
            char('{'),
            pair(opt(number), opt(preceded(tag(":."), number))),
            char('}'),
        ),
        |(index, precision)| Piece::Field { index, precision },
    )(input)
}

fn literal(input: &str) -> IResult<&str, Piece> {
    map(is_not("{}"), |text: &str| Piece::Literal(text.to_string()))(input)
}

fn number(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |digits: &str| digits.parse::<usize>())(input)
}
