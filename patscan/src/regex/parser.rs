use super::ast::{Pattern, Quantifier, Token, TokenKind};

/// Error raised for a pattern the parser cannot make sense of. Carries the
/// character index of the offending construct in the original pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at index {offset}")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        ParseError {
            message: message.into(),
            offset,
        }
    }
}

/// Parses a pattern string into a token sequence plus anchor flags.
///
/// `^` at index 0 and an unescaped `$` at the final index are recorded as
/// anchors and stripped before tokenization. Anywhere else, `^` and `$` are
/// ordinary literals; anchors never occur inside group alternatives.
pub fn parse(pattern: &str) -> Result<Pattern, ParseError> {
    let chars: Vec<char> = pattern.chars().collect();

    let anchored_start = chars.first() == Some(&'^');
    let start = usize::from(anchored_start);
    let mut end = chars.len();
    let anchored_end = end > start && chars[end - 1] == '$' && !is_escaped(&chars, end - 1);
    if anchored_end {
        end -= 1;
    }

    let mut groups = 0;
    let tokens = parse_sequence(&chars[start..end], start, &mut groups)?;
    Ok(Pattern {
        tokens,
        anchored_start,
        anchored_end,
    })
}

/// True if the character at `idx` sits behind an odd run of backslashes.
fn is_escaped(chars: &[char], idx: usize) -> bool {
    let mut backslashes = 0;
    let mut i = idx;
    while i > 0 && chars[i - 1] == '\\' {
        backslashes += 1;
        i -= 1;
    }
    backslashes % 2 == 1
}

/// Tokenizes one alternative-free-at-top-level slice of the pattern.
/// `base` is the slice's offset in the original pattern so errors point at
/// the right index; `groups` is the shared group counter threaded through
/// nested parses so numbering follows opening parentheses left to right.
fn parse_sequence(
    chars: &[char],
    base: usize,
    groups: &mut usize,
) -> Result<Vec<Token>, ParseError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                let Some(&next) = chars.get(i + 1) else {
                    return Err(ParseError::new("trailing backslash", base + i));
                };
                let kind = match next {
                    'd' => TokenKind::Digit,
                    'w' => TokenKind::Word,
                    '1'..='9' => TokenKind::Backreference(next as usize - '0' as usize),
                    other => TokenKind::Literal(other),
                };
                tokens.push(Token::new(kind));
                i += 2;
            }
            '[' => {
                let (token, next) = parse_class(chars, i, base)?;
                tokens.push(token);
                i = next;
            }
            '(' => {
                let close = find_group_end(chars, i)
                    .ok_or_else(|| ParseError::new("unmatched '('", base + i))?;
                *groups += 1;
                let number = *groups;
                let body = &chars[i + 1..close];
                let mut alternatives = Vec::new();
                for (rel, alt) in split_alternatives(body) {
                    alternatives.push(parse_sequence(alt, base + i + 1 + rel, groups)?);
                }
                tokens.push(Token::new(TokenKind::Group {
                    alternatives,
                    number,
                }));
                i = close + 1;
            }
            '.' => {
                tokens.push(Token::new(TokenKind::Wildcard));
                i += 1;
            }
            c @ ('+' | '?') => {
                let quantifier = if c == '+' {
                    Quantifier::OneOrMore
                } else {
                    Quantifier::ZeroOrOne
                };
                match tokens.last_mut() {
                    Some(last) if last.quantifier.is_none() => {
                        last.quantifier = Some(quantifier);
                    }
                    Some(_) => {
                        return Err(ParseError::new(
                            "quantifier follows a quantified token",
                            base + i,
                        ));
                    }
                    None => {
                        return Err(ParseError::new("quantifier has nothing to repeat", base + i));
                    }
                }
                i += 1;
            }
            c => {
                tokens.push(Token::new(TokenKind::Literal(c)));
                i += 1;
            }
        }
    }

    Ok(tokens)
}

/// Parses a character class starting at the `[` at `open`. Returns the token
/// and the index just past the closing `]`.
///
/// A `]` directly after `[` (or after a leading `^`) is a member, ranges
/// `a-z` expand inclusively, and every other metacharacter loses its meaning
/// inside the brackets.
fn parse_class(chars: &[char], open: usize, base: usize) -> Result<(Token, usize), ParseError> {
    let mut k = open + 1;
    let mut negated = false;
    if chars.get(k) == Some(&'^') {
        negated = true;
        k += 1;
    }

    let mut members = Vec::new();
    let mut first = true;
    loop {
        let Some(&c) = chars.get(k) else {
            return Err(ParseError::new("unmatched '['", base + open));
        };
        if c == ']' && !first {
            k += 1;
            break;
        }
        first = false;

        if let (Some(&'-'), Some(&hi)) = (chars.get(k + 1), chars.get(k + 2)) {
            if hi != ']' {
                if (hi as u32) < (c as u32) {
                    return Err(ParseError::new("invalid character class range", base + k));
                }
                members.extend(c..=hi);
                k += 3;
                continue;
            }
        }
        members.push(c);
        k += 1;
    }

    Ok((
        Token::new(TokenKind::Class {
            chars: members,
            negated,
        }),
        k,
    ))
}

/// Index of the `]` closing the class that opens at `open`, if any.
fn class_end(chars: &[char], open: usize) -> Option<usize> {
    let mut k = open + 1;
    if chars.get(k) == Some(&'^') {
        k += 1;
    }
    if chars.get(k) == Some(&']') {
        k += 1;
    }
    while let Some(&c) = chars.get(k) {
        if c == ']' {
            return Some(k);
        }
        k += 1;
    }
    None
}

/// Index of the `)` matching the `(` at `open`, skipping escapes and
/// bracketed classes.
fn find_group_end(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = open + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '[' => {
                if let Some(end) = class_end(chars, i) {
                    i = end;
                }
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Splits a group body on `|` at the top level of this group, skipping
/// escaped characters, nested parentheses, and bracketed classes. Returns
/// each alternative together with its offset inside the body.
fn split_alternatives(body: &[char]) -> Vec<(usize, &[char])> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut i = 0;
    while i < body.len() {
        match body[i] {
            '\\' => i += 1,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '[' => {
                if let Some(end) = class_end(body, i) {
                    i = end;
                }
            }
            '|' if depth == 0 => {
                parts.push((start, &body[start..i]));
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push((start, &body[start..]));
    parts
}
