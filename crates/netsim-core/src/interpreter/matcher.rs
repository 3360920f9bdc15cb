// ── Abbreviated command matching ──
//
// Stateless and independent of the command table. Every canonical token
// must be covered by a typed token that is a case-insensitive prefix of
// it; typed tokens past the end of the pattern are arguments.

/// One whitespace-delimited word of a typed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Byte offset into the line.
    pub offset: usize,
    /// Character offset into the line, used for the `^` marker.
    pub column: usize,
}

/// Result of matching typed tokens against one pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// Every pattern token matched; `consumed` typed tokens belong to the
    /// pattern, the rest are arguments.
    Full { consumed: usize },
    /// The typed tokens matched so far but ran out before the pattern did.
    Partial,
    /// Typed token `at` does not abbreviate the pattern token at that position.
    Mismatch { at: usize },
}

impl Match {
    pub fn is_full(self) -> bool {
        matches!(self, Self::Full { .. })
    }
}

/// Split on whitespace, remembering where each word starts.
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<(usize, usize)> = None;
    let mut column = 0;

    for (byte, ch) in line.char_indices() {
        if ch.is_whitespace() {
            if let Some((from, col)) = start.take() {
                tokens.push(Token {
                    text: &line[from..byte],
                    offset: from,
                    column: col,
                });
            }
        } else if start.is_none() {
            start = Some((byte, column));
        }
        column += 1;
    }
    if let Some((from, col)) = start {
        tokens.push(Token {
            text: &line[from..],
            offset: from,
            column: col,
        });
    }
    tokens
}

/// `typed` abbreviates `canonical`: non-empty, case-insensitive prefix.
pub fn abbreviates(typed: &str, canonical: &str) -> bool {
    !typed.is_empty()
        && typed.len() <= canonical.len()
        && canonical.is_char_boundary(typed.len())
        && canonical[..typed.len()].eq_ignore_ascii_case(typed)
}

/// Match typed words against a space-separated canonical pattern.
pub fn match_pattern(pattern: &str, typed: &[&str]) -> Match {
    let mut consumed = 0;
    for (i, canonical) in pattern.split_whitespace().enumerate() {
        let Some(word) = typed.get(i) else {
            return Match::Partial;
        };
        if !abbreviates(word, canonical) {
            return Match::Mismatch { at: i };
        }
        consumed = i + 1;
    }
    Match::Full { consumed }
}

/// Resolve one word against a closed set of keywords, e.g. `tr` → `trunk`.
/// Ambiguous or unknown words yield `None`.
pub fn pick_keyword<'k>(typed: &str, keywords: &[&'k str]) -> Option<&'k str> {
    if let Some(exact) = keywords.iter().find(|k| k.eq_ignore_ascii_case(typed)) {
        return Some(exact);
    }
    let mut hits = keywords.iter().filter(|k| abbreviates(typed, k));
    match (hits.next(), hits.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}
