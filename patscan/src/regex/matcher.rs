//! Recursive backtracking evaluation of a parsed pattern.
//!
//! A match attempt walks the token sequence and the input in lockstep.
//! Quantifiers are greedy: the evaluator first consumes as much as it can,
//! then backs off one occurrence at a time while retrying the rest of the
//! pattern. Group captures are kept in a fixed table of nine slots that is
//! snapshotted before every speculative step and restored when that step is
//! abandoned, so a backreference always sees the captures of the current
//! match path only.

use super::ast::{Pattern, Quantifier, Token, TokenKind};

const MAX_GROUPS: usize = 9;

/// Capture table for one match attempt. Spans index the input character
/// vector; copying the whole table is the snapshot.
#[derive(Debug, Clone, Copy, Default)]
struct Captures {
    spans: [Option<(usize, usize)>; MAX_GROUPS],
}

impl Captures {
    fn get(&self, number: usize) -> Option<(usize, usize)> {
        self.spans.get(number.checked_sub(1)?).copied().flatten()
    }

    /// Groups numbered past the table are accepted and dropped; no
    /// backreference can name them.
    fn set(&mut self, number: usize, span: (usize, usize)) {
        if let Some(slot) = self.spans.get_mut(number - 1) {
            *slot = Some(span);
        }
    }
}

/// Reports whether `pattern` matches anywhere in `input`.
///
/// Comparison is case-exact; callers wanting case folding fold both the
/// pattern (before parsing) and the input. Never panics, whatever the input.
pub fn matches(pattern: &Pattern, input: &str) -> bool {
    let chars: Vec<char> = input.chars().collect();
    let run = MatchRun {
        input: &chars,
        anchored_end: pattern.anchored_end,
    };

    if pattern.anchored_start {
        let mut captures = Captures::default();
        return run.try_match(&pattern.tokens, 0, &mut captures);
    }

    let min_len = min_match_length(&pattern.tokens);
    if min_len > chars.len() {
        return false;
    }
    for start in 0..=(chars.len() - min_len) {
        let mut captures = Captures::default();
        if run.try_match(&pattern.tokens, start, &mut captures) {
            return true;
        }
    }
    false
}

/// Fewest input characters the sequence can consume: `?` contributes zero,
/// a group the minimum over its alternatives, everything else one.
fn min_match_length(tokens: &[Token]) -> usize {
    tokens
        .iter()
        .map(|token| {
            if token.quantifier == Some(Quantifier::ZeroOrOne) {
                return 0;
            }
            match &token.kind {
                TokenKind::Group { alternatives, .. } => alternatives
                    .iter()
                    .map(|alt| min_match_length(alt))
                    .min()
                    .unwrap_or(0),
                _ => 1,
            }
        })
        .sum()
}

/// One match attempt over one input, shared by the whole recursion.
struct MatchRun<'a> {
    input: &'a [char],
    anchored_end: bool,
}

impl MatchRun<'_> {
    /// Matches `tokens` against the input starting at character `j`.
    /// Success of the empty suffix depends only on the end anchor.
    fn try_match(&self, tokens: &[Token], j: usize, captures: &mut Captures) -> bool {
        let Some(token) = tokens.first() else {
            return !self.anchored_end || j == self.input.len();
        };
        let rest = &tokens[1..];

        // An unquantified group backtracks over both its alternatives and
        // the length it consumes: greedy inner quantifiers may have to give
        // characters back for the rest of the pattern to fit.
        if token.quantifier.is_none() {
            if let TokenKind::Group {
                alternatives,
                number,
            } = &token.kind
            {
                let saved = *captures;
                let avail = self.input.len() - j.min(self.input.len());
                for alt in alternatives {
                    for limit in (0..=avail).rev() {
                        let mut trial = saved;
                        if let Some(end) = self.match_sequence(alt, j, limit, &mut trial) {
                            trial.set(*number, (j, end));
                            if self.try_match(rest, end, &mut trial) {
                                *captures = trial;
                                return true;
                            }
                        }
                    }
                }
                *captures = saved;
                return false;
            }
        }

        match token.quantifier {
            Some(Quantifier::OneOrMore) => {
                // Greedy expansion, recording the position and capture state
                // after every repeat so backing off lands exactly where a
                // shorter expansion ended. Repeats that consume nothing end
                // the expansion, otherwise it would never terminate.
                let saved = *captures;
                let mut repeats: Vec<(usize, Captures)> = Vec::new();
                let mut pos = j;
                let mut current = saved;
                while let Some(end) = self.consume(token, pos, &mut current) {
                    repeats.push((end, current));
                    if end == pos {
                        break;
                    }
                    pos = end;
                }
                for &(end, after) in repeats.iter().rev() {
                    let mut trial = after;
                    if self.try_match(rest, end, &mut trial) {
                        *captures = trial;
                        return true;
                    }
                }
                *captures = saved;
                false
            }
            Some(Quantifier::ZeroOrOne) => {
                let mut trial = *captures;
                if let Some(end) = self.consume(token, j, &mut trial) {
                    if self.try_match(rest, end, &mut trial) {
                        *captures = trial;
                        return true;
                    }
                }
                self.try_match(rest, j, captures)
            }
            None => match self.consume(token, j, captures) {
                Some(end) => self.try_match(rest, end, captures),
                None => false,
            },
        }
    }

    /// Consumes one occurrence of `token` at `j`, returning the position
    /// after it. Group consumption takes the first alternative that matches
    /// and records its capture; backreference consumption requires the
    /// referenced group to be captured on the current path.
    fn consume(&self, token: &Token, j: usize, captures: &mut Captures) -> Option<usize> {
        match &token.kind {
            TokenKind::Group {
                alternatives,
                number,
            } => {
                let avail = self.input.len() - j.min(self.input.len());
                let saved = *captures;
                for alt in alternatives {
                    let mut trial = saved;
                    if let Some(end) = self.match_sequence(alt, j, avail, &mut trial) {
                        trial.set(*number, (j, end));
                        *captures = trial;
                        return Some(end);
                    }
                }
                *captures = saved;
                None
            }
            TokenKind::Backreference(number) => {
                let (start, end) = captures.get(*number)?;
                let needle = &self.input[start..end];
                if j + needle.len() > self.input.len() {
                    return None;
                }
                if &self.input[j..j + needle.len()] == needle {
                    Some(j + needle.len())
                } else {
                    None
                }
            }
            kind => {
                let c = *self.input.get(j)?;
                if char_matches(kind, c) {
                    Some(j + 1)
                } else {
                    None
                }
            }
        }
    }

    /// Matches a full alternative inside a group, returning the position it
    /// ends at. This is sequence-local: there is no end-anchor check and no
    /// backtracking into earlier tokens of the sequence; the callers supply
    /// backtracking by retrying with smaller `limit`s or other alternatives.
    /// Greedy `+` runs inside the sequence are clamped to `limit` so a
    /// shorter overall consumption can be forced from outside.
    fn match_sequence(
        &self,
        tokens: &[Token],
        start: usize,
        limit: usize,
        captures: &mut Captures,
    ) -> Option<usize> {
        let entry = *captures;
        let mut j = start;

        for token in tokens {
            if j > start + limit {
                *captures = entry;
                return None;
            }
            let remaining = start + limit - j;

            match &token.kind {
                TokenKind::Group {
                    alternatives,
                    number,
                } => {
                    let saved = *captures;
                    let mut matched = false;
                    for alt in alternatives {
                        let mut trial = saved;
                        if let Some(end) = self.match_sequence(alt, j, remaining, &mut trial) {
                            trial.set(*number, (j, end));
                            *captures = trial;
                            j = end;
                            matched = true;
                            break;
                        }
                    }
                    if !matched && token.quantifier != Some(Quantifier::ZeroOrOne) {
                        *captures = entry;
                        return None;
                    }
                }
                TokenKind::Backreference(number) => match token.quantifier {
                    Some(Quantifier::OneOrMore) => {
                        let mut count = 0;
                        while let Some(end) = self.consume(token, j, captures) {
                            if end > start + limit || end == j {
                                break;
                            }
                            j = end;
                            count += 1;
                        }
                        if count == 0 {
                            *captures = entry;
                            return None;
                        }
                    }
                    Some(Quantifier::ZeroOrOne) => {
                        if let Some(end) = self.consume(token, j, captures) {
                            if end <= start + limit {
                                j = end;
                            }
                        }
                    }
                    None => match self.consume(token, j, captures) {
                        Some(end) => j = end,
                        None => {
                            *captures = entry;
                            return None;
                        }
                    },
                },
                kind => match token.quantifier {
                    Some(Quantifier::OneOrMore) => {
                        let count = self.count_greedy(kind, j).min(remaining);
                        if count == 0 {
                            *captures = entry;
                            return None;
                        }
                        j += count;
                    }
                    Some(Quantifier::ZeroOrOne) => {
                        if remaining > 0 {
                            if let Some(&c) = self.input.get(j) {
                                if char_matches(kind, c) {
                                    j += 1;
                                }
                            }
                        }
                    }
                    None => {
                        match self.input.get(j) {
                            Some(&c) if char_matches(kind, c) => j += 1,
                            _ => {
                                *captures = entry;
                                return None;
                            }
                        };
                    }
                },
            }
        }

        if j > start + limit {
            *captures = entry;
            return None;
        }
        Some(j)
    }

    /// Longest run of consecutive characters matching a single-character
    /// token, starting at `j`.
    fn count_greedy(&self, kind: &TokenKind, j: usize) -> usize {
        self.input[j.min(self.input.len())..]
            .iter()
            .take_while(|&&c| char_matches(kind, c))
            .count()
    }
}

/// Character-level predicate for the single-character token kinds.
fn char_matches(kind: &TokenKind, c: char) -> bool {
    match kind {
        TokenKind::Literal(l) => c == *l,
        TokenKind::Wildcard => true,
        TokenKind::Digit => c.is_ascii_digit(),
        TokenKind::Word => c.is_alphanumeric() || c == '_',
        TokenKind::Class { chars, negated } => chars.contains(&c) != *negated,
        TokenKind::Group { .. } | TokenKind::Backreference(_) => false,
    }
}
