//! Tailoring-rule grammar.
//!
//! A rule string is a sequence of relations joining tokens:
//!
//! ```text
//! < a < b ; c , d = e        primary / secondary / tertiary / identical
//! << c  <<< d                ASCII aliases for ; and ,
//! & ae < x                   reselect the insertion point ("reset")
//! < c/a                      expansion: c sorts as its own weight then a's
//! < 'a<b'                    quoted literal, '' escapes the quote
//! @                          French secondary ordering for the whole table
//! ```
//!
//! Parsing produces a [`RuleSet`]: an ordered list of [`PatternEntry`]
//! values. The list is the source of truth for the table builder and for
//! [`RuleSet::to_rules`] regeneration, and new rules can be merged into an
//! existing list (`& anchors` pick the insertion point). Weights are never
//! assigned here, so a reset can splice entries anywhere without touching
//! what was already parsed.

use thiserror::Error;

use crate::normalize::decompose_rules;

/// Grammar failure while building a rule set. Raised only at
/// table-construction time, never during comparison or iteration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("rule string is empty")]
    EmptyRules,

    #[error("token `{0}` is not preceded by a relational operator")]
    MissingRelation(String),

    #[error("relational operator is not followed by a token")]
    DanglingRelation,

    #[error("unterminated quoted literal")]
    UnterminatedQuote,

    #[error("expansion marker `/` is not attached to an entry")]
    DanglingExpansion,

    #[error("reset anchor `{0}` does not match any earlier entry")]
    UnknownAnchor(String),

    #[error("adjacent entries for `{0}` have conflicting strengths: a token cannot be unequal to itself")]
    ConflictingEntry(String),

    #[error("tailoring overflows the {0} weight space")]
    WeightOverflow(&'static str),
}

/// Relational operator joining an entry to its predecessor.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Relation {
    /// `<` — differs at the primary level.
    Primary,
    /// `<<` or `;` — differs at the secondary level.
    Secondary,
    /// `<<<` or `,` — differs at the tertiary level.
    Tertiary,
    /// `=` — sorts identically to its predecessor.
    Identical,
}

/// One merged tailoring entry: a contraction key (one or more code points)
/// plus an optional expansion extension.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PatternEntry {
    pub relation: Relation,
    /// Decomposed source sequence the entry matches.
    pub chars: String,
    /// Decomposed extension text: when non-empty, the entry expands to its
    /// own element followed by the elements of each extension char.
    pub extension: String,
}

/// Ordered list of tailoring entries, in final collation order.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    entries: Vec<PatternEntry>,
    french: bool,
}

// ── tokenizer ────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum Token {
    Rel(Relation),
    Reset,
    Slash,
    French,
    Text(String),
}

fn tokenize(rules: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = rules.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            _ if c.is_whitespace() => {
                chars.next();
            }
            '<' => {
                let mut depth = 0usize;
                while chars.peek() == Some(&'<') && depth < 3 {
                    chars.next();
                    depth += 1;
                }
                tokens.push(Token::Rel(match depth {
                    1 => Relation::Primary,
                    2 => Relation::Secondary,
                    _ => Relation::Tertiary,
                }));
            }
            ';' => {
                chars.next();
                tokens.push(Token::Rel(Relation::Secondary));
            }
            ',' => {
                chars.next();
                tokens.push(Token::Rel(Relation::Tertiary));
            }
            '=' => {
                chars.next();
                tokens.push(Token::Rel(Relation::Identical));
            }
            '&' => {
                chars.next();
                tokens.push(Token::Reset);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '@' => {
                chars.next();
                tokens.push(Token::French);
            }
            _ => tokens.push(Token::Text(scan_text(&mut chars)?)),
        }
    }
    Ok(tokens)
}

/// Reserved characters that terminate a bare token (and need quoting on
/// regeneration).
fn is_reserved(c: char) -> bool {
    matches!(c, '<' | ';' | ',' | '=' | '&' | '/' | '@' | '\'') || c.is_whitespace()
}

fn scan_text(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<String, ParseError> {
    let mut text = String::new();
    let mut in_quote = false;

    while let Some(&c) = chars.peek() {
        if in_quote {
            chars.next();
            if c == '\'' {
                // '' inside a quoted run is a literal quote
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    text.push('\'');
                } else {
                    in_quote = false;
                }
            } else {
                text.push(c);
            }
        } else if c == '\'' {
            chars.next();
            in_quote = true;
        } else if is_reserved(c) {
            break;
        } else {
            chars.next();
            text.push(c);
        }
    }
    if in_quote {
        return Err(ParseError::UnterminatedQuote);
    }
    Ok(text)
}

// ── grammar units ────────────────────────────────────────────────────────

/// A syntactic unit: a relation (or reset) plus its token and any explicit
/// `/` extension, before merging.
struct Unit {
    relation: Option<Relation>, // None = reset
    chars: String,
    extension: String,
}

fn scan_units(tokens: Vec<Token>) -> Result<(Vec<Unit>, bool), ParseError> {
    let mut units: Vec<Unit> = Vec::new();
    let mut french = false;
    let mut pending: Option<Option<Relation>> = None;
    let mut iter = tokens.into_iter().peekable();

    while let Some(tok) = iter.next() {
        match tok {
            Token::Rel(r) => {
                if pending.is_some() {
                    return Err(ParseError::DanglingRelation);
                }
                pending = Some(Some(r));
            }
            Token::Reset => {
                if pending.is_some() {
                    return Err(ParseError::DanglingRelation);
                }
                pending = Some(None);
            }
            Token::French => french = true,
            Token::Slash => {
                if pending.is_some() || units.is_empty() {
                    return Err(ParseError::DanglingExpansion);
                }
                match iter.next() {
                    Some(Token::Text(ext)) => {
                        let last = units.last_mut().filter(|u| u.relation.is_some());
                        match last {
                            Some(u) => u.extension.push_str(&ext),
                            None => return Err(ParseError::DanglingExpansion),
                        }
                    }
                    _ => return Err(ParseError::DanglingExpansion),
                }
            }
            Token::Text(text) => match pending.take() {
                Some(relation) => units.push(Unit {
                    relation,
                    chars: text,
                    extension: String::new(),
                }),
                None => return Err(ParseError::MissingRelation(text)),
            },
        }
    }
    if pending.is_some() {
        return Err(ParseError::DanglingRelation);
    }
    Ok((units, french))
}

// ── merging ──────────────────────────────────────────────────────────────

impl RuleSet {
    /// Parse a rule string into a fresh rule set.
    pub fn parse(rules: &str) -> Result<Self, ParseError> {
        let mut set = RuleSet::default();
        set.add_rules(rules)?;
        Ok(set)
    }

    /// Merge additional rules into this set. `&` anchors may address any
    /// entry already present, including entries from earlier calls.
    pub fn add_rules(&mut self, rules: &str) -> Result<(), ParseError> {
        if rules.trim().is_empty() {
            return Err(ParseError::EmptyRules);
        }
        let (units, french) = scan_units(tokenize(rules)?)?;
        self.french |= french;

        // Insertion point starts at the end; resets move it. The excess of
        // a partially matched anchor rides along as an expansion suffix for
        // every following entry until the next reset.
        let mut insert_at = self.entries.len();
        let mut pending_ext = String::new();
        let mut prev: Option<(String, String)> = None;

        for unit in units {
            let chars = decompose_rules(&unit.chars).into_owned();
            match unit.relation {
                None => {
                    let (at, excess) = self.find_anchor(&chars)?;
                    insert_at = at;
                    pending_ext = excess;
                    prev = None;
                }
                Some(relation) => {
                    let mut extension = pending_ext.clone();
                    extension.push_str(&decompose_rules(&unit.extension));

                    if let Some((pc, pe)) = &prev {
                        if *pc == chars && *pe == extension {
                            if relation == Relation::Identical {
                                continue; // restating an equality is harmless
                            }
                            return Err(ParseError::ConflictingEntry(chars));
                        }
                    }

                    // A re-tailored token moves: drop its old position.
                    if let Some(old) = self
                        .entries
                        .iter()
                        .rposition(|e| e.chars == chars && e.extension == extension)
                    {
                        self.entries.remove(old);
                        if old < insert_at {
                            insert_at -= 1;
                        }
                    }

                    self.entries.insert(
                        insert_at,
                        PatternEntry {
                            relation,
                            chars: chars.clone(),
                            extension: extension.clone(),
                        },
                    );
                    insert_at += 1;
                    prev = Some((chars, extension));
                }
            }
        }
        Ok(())
    }

    /// Resolve a reset anchor: exact entry match first, then the latest
    /// entry whose chars are a prefix of the anchor (the remainder becomes
    /// the pending extension).
    fn find_anchor(&self, anchor: &str) -> Result<(usize, String), ParseError> {
        if let Some(i) = self.entries.iter().rposition(|e| e.chars == anchor) {
            return Ok((i + 1, String::new()));
        }
        if let Some(i) = self
            .entries
            .iter()
            .rposition(|e| anchor.starts_with(e.chars.as_str()))
        {
            let excess = anchor[self.entries[i].chars.len()..].to_owned();
            return Ok((i + 1, excess));
        }
        Err(ParseError::UnknownAnchor(anchor.to_owned()))
    }

    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    /// Whether the rules requested French secondary ordering (`@`).
    pub fn is_french(&self) -> bool {
        self.french
    }

    /// Regenerate rule text. The output re-parses to an equivalent rule
    /// set; `/` extensions survive verbatim.
    pub fn to_rules(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(match entry.relation {
                Relation::Primary => "< ",
                Relation::Secondary => "; ",
                Relation::Tertiary => ", ",
                Relation::Identical => "= ",
            });
            append_token(&mut out, &entry.chars);
            if !entry.extension.is_empty() {
                out.push('/');
                append_token(&mut out, &entry.extension);
            }
        }
        if self.french {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push('@');
        }
        out
    }
}

fn append_token(out: &mut String, token: &str) {
    if token.chars().any(is_reserved) {
        out.push('\'');
        for c in token.chars() {
            if c == '\'' {
                out.push_str("''");
            } else {
                out.push(c);
            }
        }
        out.push('\'');
    } else {
        out.push_str(token);
    }
}
