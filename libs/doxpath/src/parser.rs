//! Path parser - converts path strings to a [`Path`]
//!
//! Grammar, informally:
//!
//! ```text
//! path      := stage ('|' stage)*
//! stage     := segment ('.' segment)*
//! segment   := '#'                       count (last) / map (not last)
//!            | '#(' predicate ')' '#'?   first match / all matches
//!            | '@' name (':' arg)?       transform; arg runs to the next '|'
//!            | key                       field, or index when all digits
//! predicate := path (op value)?
//! op        := '=' | '==' | '!=' | '%' | '!%'
//! ```
//!
//! `\` escapes the next character of a key. A value in double quotes is a
//! JSON string literal; an unquoted `=` value containing `*` is a glob.

use crate::ast::{Path, Predicate, Segment, Stage, Test};
use crate::error::{Error, Result};
use crate::transforms::TransformRegistry;
use glob::Pattern;

const MAX_RECURSION_DEPTH: usize = 64;

/// Parser for path expressions
pub struct Parser<'r> {
    chars: Vec<char>,
    pos: usize,
    transforms: &'r TransformRegistry,
    recursion_depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
    Eq,
    NotEq,
    Match,
    NotMatch,
}

impl<'r> Parser<'r> {
    /// Create a new parser for `input`, validating transform names against `transforms`.
    pub fn new(input: &str, transforms: &'r TransformRegistry) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            transforms,
            recursion_depth: 0,
        }
    }

    fn nested(&self, input: &str) -> Result<Parser<'r>> {
        let depth = self.recursion_depth + 1;
        if depth > MAX_RECURSION_DEPTH {
            return Err(Error::ParseError(format!(
                "Path too deeply nested (max depth: {})",
                MAX_RECURSION_DEPTH
            )));
        }
        let mut parser = Parser::new(input, self.transforms);
        parser.recursion_depth = depth;
        Ok(parser)
    }

    /// Parse the entire input.
    pub fn parse(&mut self) -> Result<Path> {
        if self.chars.is_empty() {
            return Err(Error::ParseError("Empty path".into()));
        }

        let mut stages = vec![self.parse_stage()?];
        while self.peek() == Some('|') {
            self.pos += 1;
            stages.push(self.parse_stage()?);
        }

        if let Some(c) = self.peek() {
            return Err(self.unexpected(c));
        }
        Ok(Path { stages })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn unexpected(&self, c: char) -> Error {
        Error::ParseError(format!("Unexpected '{}' at offset {}", c, self.pos))
    }

    fn parse_stage(&mut self) -> Result<Stage> {
        let mut segments = Vec::new();
        loop {
            segments.push(self.parse_segment()?);
            match self.peek() {
                None | Some('|') => break,
                Some('.') => self.pos += 1,
                Some(c) => return Err(self.unexpected(c)),
            }
        }
        Ok(Stage { segments })
    }

    fn parse_segment(&mut self) -> Result<Segment> {
        match self.peek() {
            None => Err(Error::ParseError(format!(
                "Expected a path segment at offset {}",
                self.pos
            ))),
            Some('|') | Some('.') => Err(Error::ParseError(format!(
                "Empty path segment at offset {}",
                self.pos
            ))),
            Some('#') => self.parse_hash(),
            Some('@') => self.parse_transform(),
            Some(_) => self.parse_key(),
        }
    }

    fn parse_hash(&mut self) -> Result<Segment> {
        self.pos += 1;
        match self.peek() {
            Some('(') => {
                let inner = self.read_group()?;
                let predicate = self.parse_predicate(&inner)?;
                let all = self.peek() == Some('#');
                if all {
                    self.pos += 1;
                }
                Ok(Segment::Filter { predicate, all })
            }
            None | Some('|') => Ok(Segment::Count),
            Some('.') => Ok(Segment::Map),
            Some(c) => Err(self.unexpected(c)),
        }
    }

    fn parse_transform(&mut self) -> Result<Segment> {
        self.pos += 1;
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        if name.is_empty() {
            return Err(Error::ParseError(format!(
                "Missing transform name at offset {}",
                start
            )));
        }

        let arg = if self.peek() == Some(':') {
            self.pos += 1;
            Some(self.read_until_pipe())
        } else {
            None
        };

        if name == "dig" {
            let arg = arg
                .filter(|a| !a.is_empty())
                .ok_or_else(|| Error::ParseError("@dig requires a path argument".into()))?;
            let path = self.nested(&arg)?.parse()?;
            return Ok(Segment::Dig(Box::new(path)));
        }

        if !self.transforms.contains(&name) {
            return Err(Error::TransformNotFound(name));
        }
        Ok(Segment::Transform { name, arg })
    }

    fn parse_key(&mut self) -> Result<Segment> {
        let mut key = String::new();
        let mut escaped = false;
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.pos += 1;
                    if let Some(next) = self.peek() {
                        key.push(next);
                        self.pos += 1;
                        escaped = true;
                    }
                }
                '.' | '|' => break,
                _ => {
                    key.push(c);
                    self.pos += 1;
                }
            }
        }

        if !escaped && !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(index) = key.parse::<usize>() {
                return Ok(Segment::Index(index));
            }
        }
        Ok(Segment::Field(key))
    }

    /// Read a balanced `( ... )` group starting at the current `(`; returns the inside.
    fn read_group(&mut self) -> Result<String> {
        let open = self.pos;
        self.pos += 1;
        let mut depth = 1usize;
        let mut in_quotes = false;
        let mut inner = String::new();

        while let Some(c) = self.peek() {
            self.pos += 1;
            if in_quotes {
                inner.push(c);
                match c {
                    '\\' => {
                        if let Some(next) = self.peek() {
                            inner.push(next);
                            self.pos += 1;
                        }
                    }
                    '"' => in_quotes = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_quotes = true,
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(inner);
                    }
                }
                _ => {}
            }
            inner.push(c);
        }

        Err(Error::ParseError(format!(
            "Unterminated filter starting at offset {}",
            open
        )))
    }

    /// Read raw text up to the next top-level `|` (or the end).
    fn read_until_pipe(&mut self) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        let mut in_quotes = false;

        while let Some(c) = self.peek() {
            if !in_quotes && depth == 0 && c == '|' {
                break;
            }
            self.pos += 1;
            out.push(c);
            match c {
                '\\' => {
                    if let Some(next) = self.peek() {
                        out.push(next);
                        self.pos += 1;
                    }
                }
                '"' => in_quotes = !in_quotes,
                '(' if !in_quotes => depth += 1,
                ')' if !in_quotes => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        out
    }

    fn parse_predicate(&self, inner: &str) -> Result<Predicate> {
        let (lhs, condition) = split_condition(inner);
        let lhs = lhs.trim();
        if lhs.is_empty() {
            return Err(Error::ParseError(format!(
                "Filter '{}' has no field path",
                inner
            )));
        }
        let lhs = self.nested(lhs)?.parse()?;

        let test = match condition {
            None => Test::Exists,
            Some((op, raw)) => {
                let (value, quoted) = parse_value(raw.trim())?;
                match op {
                    CompareOp::Eq | CompareOp::NotEq => {
                        let negate = op == CompareOp::NotEq;
                        if !quoted && value.contains('*') {
                            Test::Matches {
                                pattern: compile_pattern(&value)?,
                                negate,
                            }
                        } else {
                            Test::Equals { value, negate }
                        }
                    }
                    CompareOp::Match | CompareOp::NotMatch => Test::Matches {
                        pattern: compile_pattern(&value)?,
                        negate: op == CompareOp::NotMatch,
                    },
                }
            }
        };

        Ok(Predicate { lhs, test })
    }
}

/// Split a predicate at its first top-level operator.
fn split_condition(inner: &str) -> (&str, Option<(CompareOp, &str)>) {
    let bytes = inner.as_bytes();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_quotes {
            match b {
                b'\\' => i += 1,
                b'"' => in_quotes = false,
                _ => {}
            }
            i += 1;
            continue;
        }
        match b {
            b'\\' => i += 1,
            b'"' => in_quotes = true,
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b'!' if depth == 0 => match bytes.get(i + 1) {
                Some(b'=') => return (&inner[..i], Some((CompareOp::NotEq, &inner[i + 2..]))),
                Some(b'%') => {
                    return (&inner[..i], Some((CompareOp::NotMatch, &inner[i + 2..])))
                }
                _ => {}
            },
            b'=' if depth == 0 => {
                let skip = if bytes.get(i + 1) == Some(&b'=') { 2 } else { 1 };
                return (&inner[..i], Some((CompareOp::Eq, &inner[i + skip..])));
            }
            b'%' if depth == 0 => {
                return (&inner[..i], Some((CompareOp::Match, &inner[i + 1..])));
            }
            _ => {}
        }
        i += 1;
    }
    (inner, None)
}

/// Returns the literal value and whether it was quoted.
fn parse_value(raw: &str) -> Result<(String, bool)> {
    if raw.starts_with('"') {
        let value: String = serde_json::from_str(raw)
            .map_err(|e| Error::ParseError(format!("Invalid quoted value {}: {}", raw, e)))?;
        Ok((value, true))
    } else {
        Ok((raw.to_string(), false))
    }
}

fn compile_pattern(value: &str) -> Result<Pattern> {
    Pattern::new(value).map_err(|e| Error::InvalidPattern {
        pattern: value.to_string(),
        message: e.msg.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Path> {
        let registry = TransformRegistry::builtin();
        Parser::new(input, &registry).parse()
    }

    fn segments(input: &str) -> Vec<Segment> {
        let path = parse(input).unwrap();
        assert_eq!(path.stages.len(), 1, "expected a single stage");
        path.stages.into_iter().next().unwrap().segments
    }

    #[test]
    fn fields_and_indices() {
        assert_eq!(
            segments("children.0.name"),
            vec![
                Segment::Field("children".into()),
                Segment::Index(0),
                Segment::Field("name".into()),
            ]
        );
    }

    #[test]
    fn escaped_dot_stays_in_key() {
        assert_eq!(segments(r"a\.b.c"), vec![
            Segment::Field("a.b".into()),
            Segment::Field("c".into()),
        ]);
    }

    #[test]
    fn escaped_digits_are_a_field() {
        assert_eq!(segments(r"\12"), vec![Segment::Field("12".into())]);
    }

    #[test]
    fn count_and_map() {
        assert_eq!(segments("items.#"), vec![Segment::Field("items".into()), Segment::Count]);
        assert_eq!(
            segments("#.attrs"),
            vec![Segment::Map, Segment::Field("attrs".into())]
        );
    }

    #[test]
    fn filter_first_vs_all() {
        match &segments("#(name=compound)")[0] {
            Segment::Filter { all, predicate } => {
                assert!(!all);
                assert_eq!(
                    predicate.test,
                    Test::Equals { value: "compound".into(), negate: false }
                );
            }
            other => panic!("unexpected segment {:?}", other),
        }
        match &segments("#(name=compound)#")[0] {
            Segment::Filter { all, .. } => assert!(*all),
            other => panic!("unexpected segment {:?}", other),
        }
    }

    #[test]
    fn filter_operators() {
        let test_of = |input: &str| match segments(input).remove(0) {
            Segment::Filter { predicate, .. } => predicate.test,
            other => panic!("unexpected segment {:?}", other),
        };

        assert_eq!(test_of("#(a!=b)"), Test::Equals { value: "b".into(), negate: true });
        assert_eq!(test_of("#(a==b)"), Test::Equals { value: "b".into(), negate: false });
        assert_eq!(test_of("#(a)"), Test::Exists);
        assert!(matches!(test_of("#(a%*.h)"), Test::Matches { negate: false, .. }));
        assert!(matches!(test_of("#(a!%*.h)"), Test::Matches { negate: true, .. }));
        assert!(matches!(test_of("#(a=*.h)"), Test::Matches { negate: false, .. }));
        assert_eq!(
            test_of(r#"#(a="*.h")"#),
            Test::Equals { value: "*.h".into(), negate: false }
        );
    }

    #[test]
    fn filter_lhs_is_a_path() {
        match segments("#(children.0.name=name)#").remove(0) {
            Segment::Filter { predicate, .. } => {
                assert_eq!(
                    predicate.lhs.stages[0].segments,
                    vec![
                        Segment::Field("children".into()),
                        Segment::Index(0),
                        Segment::Field("name".into()),
                    ]
                );
            }
            other => panic!("unexpected segment {:?}", other),
        }
    }

    #[test]
    fn quoted_value_may_contain_parens() {
        match segments(r#"#(a="x)y")"#).remove(0) {
            Segment::Filter { predicate, .. } => {
                assert_eq!(predicate.test, Test::Equals { value: "x)y".into(), negate: false });
            }
            other => panic!("unexpected segment {:?}", other),
        }
    }

    #[test]
    fn pipes_split_stages() {
        let path = parse("a.#(b=c)#|@flatten|@dedup").unwrap();
        assert_eq!(path.stages.len(), 3);
        assert_eq!(
            path.stages[1].segments,
            vec![Segment::Transform { name: "flatten".into(), arg: None }]
        );
    }

    #[test]
    fn dig_takes_rest_of_stage() {
        let path = parse("@dig:#(name=memberdef)#|@flatten").unwrap();
        assert_eq!(path.stages.len(), 2);
        match &path.stages[0].segments[0] {
            Segment::Dig(inner) => {
                assert!(matches!(
                    inner.stages[0].segments[0],
                    Segment::Filter { all: true, .. }
                ));
            }
            other => panic!("unexpected segment {:?}", other),
        }
    }

    #[test]
    fn unknown_transform_is_rejected() {
        assert_eq!(
            parse("@nope"),
            Err(Error::TransformNotFound("nope".into()))
        );
    }

    #[test]
    fn malformed_paths() {
        assert!(parse("").is_err());
        assert!(parse("a..b").is_err());
        assert!(parse("#(a=b").is_err());
        assert!(parse("@dig").is_err());
        assert!(parse("#x").is_err());
    }
}
