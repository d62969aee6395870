//! Filter input parsing
//!
//! Turns raw text into filter values, either from GraphQL value syntax
//! (`{age: {gt: 18}, status: {eq: ACTIVE}}`) or from a JSON variables
//! payload. Both paths enforce the size and nesting limits before parsing.

use winnow::{
    ascii::digit1,
    combinator::{alt, cut_err, delimited, eof, not, opt, preceded, repeat, terminated},
    error::{ContextError, ErrMode, StrContext, StrContextValue},
    prelude::*,
    token::{any, one_of, take_till, take_while},
};

use super::error::LiteralError;
use super::filter::FilterLimits;
use super::literal::{Literal, decode};
use super::value::FilterValue;

type Input<'a> = &'a str;
type ParserResult<T> = winnow::ModalResult<T>;

/// Parse GraphQL value syntax into a literal tree
pub fn parse_literal(text: &str, limits: &FilterLimits) -> Result<Literal, LiteralError> {
    check_size(text, limits)?;
    check_depth(text, limits.max_depth)?;

    let mut document = delimited(ignored, parse_value, (ignored, eof));
    document
        .parse(text)
        .map_err(|e| LiteralError::Syntax(e.to_string()))
}

/// Parse and decode a GraphQL value literal
pub fn parse_filter_literal(text: &str, limits: &FilterLimits) -> Result<FilterValue, LiteralError> {
    let literal = parse_literal(text, limits)?;
    Ok(decode(&literal))
}

/// Parse a JSON variables payload into a filter value
pub fn parse_filter_json(text: &str, limits: &FilterLimits) -> Result<FilterValue, LiteralError> {
    check_size(text, limits)?;
    check_depth(text, limits.max_depth)?;

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| LiteralError::InvalidJson(e.to_string()))?;
    Ok(FilterValue::from_json(&value))
}

fn check_size(text: &str, limits: &FilterLimits) -> Result<(), LiteralError> {
    if text.len() > limits.max_input_bytes {
        return Err(LiteralError::TooLarge {
            max: limits.max_input_bytes,
        });
    }
    Ok(())
}

/// Reject inputs whose `{`/`[` nesting exceeds `max`, ignoring string
/// contents and `#` comments. Runs before the recursive parser.
fn check_depth(text: &str, max: usize) -> Result<(), LiteralError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut in_comment = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_comment {
            in_comment = !matches!(c, '\n' | '\r');
        } else if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
        } else {
            match c {
                '"' => in_string = true,
                '#' => in_comment = true,
                '{' | '[' => {
                    depth += 1;
                    if depth > max {
                        return Err(LiteralError::TooDeep { max });
                    }
                }
                '}' | ']' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
    }
    Ok(())
}

/// Skips whitespace, commas and `#` comments (GraphQL ignored tokens)
fn ignored(input: &mut Input<'_>) -> ParserResult<()> {
    repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_whitespace() || c == ',' || c == '\u{feff}').void(),
            ('#', take_till(0.., ['\n', '\r'])).void(),
        )),
    )
    .parse_next(input)
}

fn parse_name<'a>(input: &mut Input<'a>) -> ParserResult<&'a str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

/// `true`, `false`, `null` or an enum value
fn parse_keyword_or_enum(input: &mut Input<'_>) -> ParserResult<Literal> {
    let name = parse_name.parse_next(input)?;
    Ok(match name {
        "true" => Literal::Boolean(true),
        "false" => Literal::Boolean(false),
        "null" => Literal::Null,
        other => Literal::Enum(other.to_string()),
    })
}

fn parse_variable(input: &mut Input<'_>) -> ParserResult<Literal> {
    preceded('$', cut_err(parse_name))
        .map(|name| Literal::Variable(name.to_string()))
        .parse_next(input)
}

/// Int or float; the source text is kept as written
fn parse_number(input: &mut Input<'_>) -> ParserResult<Literal> {
    let text = (
        opt('-'),
        digit1,
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .parse_next(input)?;

    // `12abc` or `1.` is not a number followed by something else
    cut_err(not(one_of(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.')))
        .context(StrContext::Expected(StrContextValue::Description("end of number")))
        .parse_next(input)?;

    if text.contains(['.', 'e', 'E']) {
        Ok(Literal::Float(text.to_string()))
    } else {
        Ok(Literal::Int(text.to_string()))
    }
}

/// Double-quoted string with JSON-style escapes
fn parse_string(input: &mut Input<'_>) -> ParserResult<String> {
    preceded('"', cut_err(parse_string_body)).parse_next(input)
}

fn parse_string_body(input: &mut Input<'_>) -> ParserResult<String> {
    let mut out = String::new();
    loop {
        let chunk = take_till(0.., ['"', '\\', '\n', '\r']).parse_next(input)?;
        out.push_str(chunk);
        match any.parse_next(input)? {
            '"' => return Ok(out),
            '\\' => out.push(parse_escape(input)?),
            _ => return Err(label("unterminated string")),
        }
    }
}

fn parse_escape(input: &mut Input<'_>) -> ParserResult<char> {
    let c = match any.parse_next(input)? {
        '"' => '"',
        '\\' => '\\',
        '/' => '/',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'u' => {
            let unit = parse_code_unit(input)?;
            let code = if (0xD800..=0xDBFF).contains(&unit) {
                // High surrogate: the low half must follow as another `\u` escape
                let low = preceded("\\u", parse_code_unit)
                    .parse_next(input)
                    .map_err(|_| label("low surrogate"))?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(label("low surrogate"));
                }
                0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
            } else {
                unit
            };
            char::from_u32(code).ok_or_else(|| label("unicode escape"))?
        }
        _ => return Err(label("escape sequence")),
    };
    Ok(c)
}

/// Four hex digits of a `\u` escape
fn parse_code_unit(input: &mut Input<'_>) -> ParserResult<u32> {
    let hex = take_while(4, |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    u32::from_str_radix(hex, 16).map_err(|_| label("unicode escape"))
}

fn parse_list(input: &mut Input<'_>) -> ParserResult<Literal> {
    preceded(
        '[',
        cut_err(delimited(
            ignored,
            repeat(0.., terminated(parse_value, ignored)),
            ']',
        )),
    )
    .map(Literal::List)
    .parse_next(input)
}

fn parse_object_field(input: &mut Input<'_>) -> ParserResult<(String, Literal)> {
    let name = parse_name.parse_next(input)?;
    let value = cut_err(delimited((ignored, ':', ignored), parse_value, ignored))
        .parse_next(input)?;
    Ok((name.to_string(), value))
}

fn parse_object(input: &mut Input<'_>) -> ParserResult<Literal> {
    preceded(
        '{',
        cut_err(delimited(ignored, repeat(0.., parse_object_field), '}')),
    )
    .map(Literal::Object)
    .parse_next(input)
}

fn parse_value(input: &mut Input<'_>) -> ParserResult<Literal> {
    alt((
        parse_object,
        parse_list,
        parse_string.map(Literal::String),
        parse_variable,
        parse_number,
        parse_keyword_or_enum,
    ))
    .context(StrContext::Label("value"))
    .parse_next(input)
}

/// Labelled error that stops backtracking
fn label(name: &'static str) -> ErrMode<ContextError> {
    let mut context = ContextError::new();
    context.push(StrContext::Label(name));
    ErrMode::Cut(context)
}
