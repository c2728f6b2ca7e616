//! Lexical analysis of s-expression source text.
//!
//! [`Tokenizer`] converts raw text into a lazy stream of [`Token`]s. It is
//! a character-by-character state machine with states for atoms, numbers,
//! hexadecimal literals and strings. The token classes overlap at the
//! lexical level — hyphenated UUIDs and rail names like `+3V3` start out
//! looking numeric — so the number state switches to the atom state
//! mid-token when it sees a letter or a `-`. These disambiguation rules
//! are load-bearing: real files depend on their exact behavior, so they
//! are kept as-is rather than generalized.
//!
//! The tokenizer is pull-based: one token is computed per
//! [`Iterator::next`] call, nothing is buffered beyond a single pending
//! `)` (a paren that terminates a bare token also closes a group, which
//! takes two tokens to express). A consumer may stop pulling at any point
//! to abandon the parse.

use crate::{error::LexError, span::Span};

/// A classified atomic unit of source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `(`
    Open,
    /// `)`
    Close,
    /// A bare identifier, e.g. `kicad_sch`, `+3V3`, or a UUID.
    Atom(String),
    /// A numeric value; hexadecimal literals are widened to `f64`.
    Number(f64),
    /// A quoted string with escapes resolved.
    Text(String),
}

/// The kind of a token, a plain value-comparable tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Open,
    Close,
    Atom,
    Number,
    String,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Open => TokenKind::Open,
            Self::Close => TokenKind::Close,
            Self::Atom(_) => TokenKind::Atom,
            Self::Number(_) => TokenKind::Number,
            Self::Text(_) => TokenKind::String,
        }
    }

    /// A short description of the token for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Open => "`(`".to_string(),
            Self::Close => "`)`".to_string(),
            Self::Atom(s) => format!("atom `{s}`"),
            Self::Number(n) => format!("number `{n}`"),
            Self::Text(s) => format!("string `{s}`"),
        }
    }
}

/// A token together with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken {
    pub token: Token,
    pub span: Span,
}

impl PositionedToken {
    fn new(token: Token, span: Span) -> Self {
        Self { token, span }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    None,
    Atom,
    Number,
    Hex,
    Str,
}

impl State {
    fn name(self) -> &'static str {
        match self {
            State::None => "token",
            State::Atom => "atom",
            State::Number => "number",
            State::Hex => "hex number",
            State::Str => "string",
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\r' | '\t')
}

fn is_atom_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '-' | '_' | '.' | '*' | '&' | '$' | '{' | '}' | '/' | ':' | '%'
        )
}

/// Extracts the enclosing line around `index` for error messages, or the
/// next 20 characters when no newline is nearby.
fn error_context(source: &str, index: usize) -> String {
    let index = index.min(source.len());
    let start = source[..index].rfind('\n').map(|p| p + 1).unwrap_or(0);
    let mut end = match source[index..].find('\n') {
        Some(p) => index + p,
        None => (index + 20).min(source.len()),
    };
    while !source.is_char_boundary(end) {
        end -= 1;
    }
    source[start..end].to_string()
}

/// Parses an accumulated hex literal like `0x1_A` (separators allowed,
/// optional sign) into a numeric value.
fn parse_hex(text: &str, offset: usize) -> Result<f64, LexError> {
    let invalid = || LexError::InvalidNumber {
        text: text.to_string(),
        offset,
    };

    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let (sign, unsigned) = match cleaned.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    let lower = unsigned.to_ascii_lowercase();
    let digits = match lower.strip_prefix("0x") {
        Some(d) if !d.is_empty() => d,
        _ => return Err(invalid()),
    };

    i64::from_str_radix(digits, 16)
        .map(|v| sign * v as f64)
        .map_err(|_| invalid())
}

/// A lazy, forward-only tokenizer over one source string.
///
/// Implements `Iterator<Item = Result<PositionedToken, LexError>>`. After
/// the first error the iterator is fused: the whole parse is abandoned,
/// there is no recovery.
pub struct Tokenizer<'src> {
    source: &'src str,
    chars: std::str::CharIndices<'src>,
    /// Offset of a `)` that ended a bare token and still has to be emitted.
    pending_close: Option<usize>,
    done: bool,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices(),
            pending_close: None,
            done: false,
        }
    }

    fn fail(&mut self, err: LexError) -> Option<Result<PositionedToken, LexError>> {
        self.done = true;
        Some(Err(err))
    }

    fn unexpected(&mut self, ch: char, offset: usize) -> Option<Result<PositionedToken, LexError>> {
        let context = error_context(self.source, offset);
        self.fail(LexError::UnexpectedChar {
            ch,
            offset,
            context,
        })
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Result<PositionedToken, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(offset) = self.pending_close.take() {
            let span = Span::new(offset, offset + 1);
            return Some(Ok(PositionedToken::new(Token::Close, span)));
        }

        let mut state = State::None;
        let mut start = 0usize;
        let mut buf = String::new();
        let mut escaping = false;

        loop {
            let Some((i, c)) = self.chars.next() else {
                // End of input terminates a bare atom or number the same
                // way whitespace would. A string still needs its closing
                // quote, so ending inside one is an error.
                self.done = true;
                let end = self.source.len();
                return match state {
                    State::None => None,
                    State::Str => Some(Err(LexError::UnterminatedToken {
                        kind: state.name(),
                        start,
                        context: error_context(self.source, start),
                    })),
                    State::Atom => Some(Ok(PositionedToken::new(
                        Token::Atom(self.source[start..end].to_string()),
                        Span::new(start, end),
                    ))),
                    State::Number => {
                        let text = &self.source[start..end];
                        match text.parse::<f64>() {
                            Ok(v) => Some(Ok(PositionedToken::new(
                                Token::Number(v),
                                Span::new(start, end),
                            ))),
                            Err(_) => Some(Err(LexError::InvalidNumber {
                                text: text.to_string(),
                                offset: start,
                            })),
                        }
                    }
                    State::Hex => match parse_hex(&self.source[start..end], start) {
                        Ok(v) => Some(Ok(PositionedToken::new(
                            Token::Number(v),
                            Span::new(start, end),
                        ))),
                        Err(err) => Some(Err(err)),
                    },
                };
            };

            match state {
                State::None => match c {
                    '(' => {
                        return Some(Ok(PositionedToken::new(
                            Token::Open,
                            Span::new(i, i + 1),
                        )));
                    }
                    ')' => {
                        return Some(Ok(PositionedToken::new(
                            Token::Close,
                            Span::new(i, i + 1),
                        )));
                    }
                    '"' => {
                        state = State::Str;
                        start = i;
                        buf.clear();
                    }
                    '+' | '-' => {
                        state = State::Number;
                        start = i;
                    }
                    _ if c.is_ascii_digit() => {
                        state = State::Number;
                        start = i;
                    }
                    _ if c.is_ascii_alphabetic() || matches!(c, '*' | '&' | '$' | '/' | '%') => {
                        state = State::Atom;
                        start = i;
                    }
                    _ if is_whitespace(c) => {}
                    _ => return self.unexpected(c, i),
                },

                State::Atom => {
                    if is_atom_char(c) {
                        // keep accumulating
                    } else if c == ')' || is_whitespace(c) {
                        let token = Token::Atom(self.source[start..i].to_string());
                        if c == ')' {
                            self.pending_close = Some(i);
                        }
                        return Some(Ok(PositionedToken::new(token, Span::new(start, i))));
                    } else {
                        return self.unexpected(c, i);
                    }
                }

                State::Number => {
                    if c == '.' || c.is_ascii_digit() {
                        // keep accumulating
                    } else if c == 'x' || c == 'X' {
                        state = State::Hex;
                    } else if c == '-' || matches!(c.to_ascii_lowercase(), 'a'..='f') {
                        // Hyphenated UUIDs and hex-looking identifiers:
                        // this is actually an atom.
                        state = State::Atom;
                    } else if c.is_ascii_alphabetic() {
                        // Unit-suffixed names like +3V3: also an atom.
                        state = State::Atom;
                    } else if c == ')' || is_whitespace(c) {
                        let text = &self.source[start..i];
                        let value = match text.parse::<f64>() {
                            Ok(v) => v,
                            Err(_) => {
                                return self.fail(LexError::InvalidNumber {
                                    text: text.to_string(),
                                    offset: start,
                                });
                            }
                        };
                        if c == ')' {
                            self.pending_close = Some(i);
                        }
                        return Some(Ok(PositionedToken::new(
                            Token::Number(value),
                            Span::new(start, i),
                        )));
                    } else {
                        return self.unexpected(c, i);
                    }
                }

                State::Hex => {
                    if c.is_ascii_hexdigit() || c == '_' {
                        // keep accumulating
                    } else if c == ')' || is_whitespace(c) {
                        let value = match parse_hex(&self.source[start..i], start) {
                            Ok(v) => v,
                            Err(err) => return self.fail(err),
                        };
                        if c == ')' {
                            self.pending_close = Some(i);
                        }
                        return Some(Ok(PositionedToken::new(
                            Token::Number(value),
                            Span::new(start, i),
                        )));
                    } else {
                        return self.unexpected(c, i);
                    }
                }

                State::Str => {
                    if escaping {
                        escaping = false;
                        // `\n` is the only interpreted escape; every other
                        // escaped character is taken verbatim.
                        buf.push(if c == 'n' { '\n' } else { c });
                    } else if c == '\\' {
                        escaping = true;
                    } else if c == '"' {
                        return Some(Ok(PositionedToken::new(
                            Token::Text(std::mem::take(&mut buf)),
                            Span::new(start, i + 1),
                        )));
                    } else {
                        buf.push(c);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Result<Vec<Token>, LexError> {
        Tokenizer::new(input)
            .map(|r| r.map(|t| t.token))
            .collect()
    }

    #[test]
    fn test_integer() {
        assert_eq!(lex("42").unwrap(), vec![Token::Number(42.0)]);
    }

    #[test]
    fn test_float_and_sign() {
        assert_eq!(lex("-12.5").unwrap(), vec![Token::Number(-12.5)]);
        assert_eq!(lex("+0.1").unwrap(), vec![Token::Number(0.1)]);
    }

    #[test]
    fn test_hex() {
        assert_eq!(lex("0x1A").unwrap(), vec![Token::Number(26.0)]);
        assert_eq!(lex("0xdead_beef").unwrap(), vec![Token::Number(3735928559.0)]);
    }

    #[test]
    fn test_string_newline_escape() {
        assert_eq!(
            lex("\"a\\nb\"").unwrap(),
            vec![Token::Text("a\nb".to_string())]
        );
    }

    #[test]
    fn test_string_escaped_quote_and_backslash() {
        assert_eq!(
            lex(r#""say \"hi\"""#).unwrap(),
            vec![Token::Text("say \"hi\"".to_string())]
        );
        assert_eq!(
            lex(r#""a\\b""#).unwrap(),
            vec![Token::Text("a\\b".to_string())]
        );
    }

    #[test]
    fn test_rail_name_is_one_atom() {
        // Starts out numeric, switches to atom on the letter.
        assert_eq!(lex("+3V3").unwrap(), vec![Token::Atom("+3V3".to_string())]);
    }

    #[test]
    fn test_uuid_is_one_atom() {
        let uuid = "00000000-1111-2222-3333-444455556666";
        assert_eq!(lex(uuid).unwrap(), vec![Token::Atom(uuid.to_string())]);
    }

    #[test]
    fn test_hexish_identifier_is_atom() {
        // `a`-`f` after digits switches to atom, not hex.
        assert_eq!(lex("12ab").unwrap(), vec![Token::Atom("12ab".to_string())]);
    }

    #[test]
    fn test_close_after_bare_token() {
        assert_eq!(
            lex("(at 1)").unwrap(),
            vec![
                Token::Open,
                Token::Atom("at".to_string()),
                Token::Number(1.0),
                Token::Close,
            ]
        );
    }

    #[test]
    fn test_atom_character_set() {
        assert_eq!(
            lex("${KIPRJMOD}/lib.pretty").unwrap(),
            vec![Token::Atom("${KIPRJMOD}/lib.pretty".to_string())]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = lex("(a @)").unwrap_err();
        match err {
            LexError::UnexpectedChar { ch, offset, context } => {
                assert_eq!(ch, '@');
                assert_eq!(offset, 3);
                assert_eq!(context, "(a @)");
            }
            other => panic!("expected UnexpectedChar, got {other:?}"),
        }
    }

    #[test]
    fn test_context_is_enclosing_line() {
        let err = lex("line one\n(bad ;)").unwrap_err();
        match err {
            LexError::UnexpectedChar { context, .. } => assert_eq!(context, "(bad ;)"),
            other => panic!("expected UnexpectedChar, got {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_string() {
        let err = lex("\"abc").unwrap_err();
        assert!(matches!(
            err,
            LexError::UnterminatedToken { kind: "string", start: 0, .. }
        ));
    }

    #[test]
    fn test_trailing_token_flushes_at_end_of_input() {
        // Whether the unbalanced paren is an error is the tree builder's
        // call; the lexer emits every token it saw.
        assert_eq!(
            lex("(x 12").unwrap(),
            vec![Token::Open, Token::Atom("x".to_string()), Token::Number(12.0)]
        );
    }

    #[test]
    fn test_trailing_hex_and_atom_flush_at_end_of_input() {
        assert_eq!(lex("0x1A").unwrap(), vec![Token::Number(26.0)]);
        assert_eq!(lex("+3V3").unwrap(), vec![Token::Atom("+3V3".to_string())]);
    }

    #[test]
    fn test_malformed_number() {
        let err = lex("1.2.3 ").unwrap_err();
        assert!(matches!(err, LexError::InvalidNumber { .. }));
    }

    #[test]
    fn test_malformed_number_at_end_of_input() {
        let err = lex("1.2.3").unwrap_err();
        assert!(matches!(err, LexError::InvalidNumber { offset: 0, .. }));
    }

    #[test]
    fn test_lazy_pull_before_error() {
        // The iterator yields good tokens before reaching the bad input;
        // a consumer that stops pulling never observes the error.
        let mut tokens = Tokenizer::new("( ok @");
        assert_eq!(tokens.next().unwrap().unwrap().token, Token::Open);
        assert_eq!(
            tokens.next().unwrap().unwrap().token,
            Token::Atom("ok".to_string())
        );
        assert!(tokens.next().unwrap().is_err());
        assert!(tokens.next().is_none());
    }

    #[test]
    fn test_spans() {
        let tokens: Vec<_> = Tokenizer::new("(pin 7)")
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 1));
        assert_eq!(tokens[1].span, Span::new(1, 4));
        assert_eq!(tokens[2].span, Span::new(5, 6));
        assert_eq!(tokens[3].span, Span::new(6, 7));
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Strategy for atoms that exercise the full continuation set.
    fn atom_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9_.:{}/-]{0,12}"
    }

    fn number_strategy() -> impl Strategy<Value = String> {
        (-99999i64..99999, 0u32..999).prop_map(|(whole, frac)| format!("{whole}.{frac}"))
    }

    proptest! {
        #[test]
        fn lexing_is_deterministic(atom in atom_strategy(), number in number_strategy()) {
            let input = format!("({atom} {number} \"{atom}\")");
            let first: Vec<_> = Tokenizer::new(&input).collect();
            let second: Vec<_> = Tokenizer::new(&input).collect();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn atoms_lex_as_single_token(atom in atom_strategy()) {
            let tokens = Tokenizer::new(&atom)
                .collect::<Result<Vec<_>, _>>()
                .unwrap();
            prop_assert_eq!(tokens.len(), 1);
            prop_assert_eq!(tokens[0].token.kind(), TokenKind::Atom);
        }

        #[test]
        fn numbers_round_trip(number in number_strategy()) {
            let input = format!("{number} ");
            let tokens = Tokenizer::new(&input)
                .collect::<Result<Vec<_>, _>>()
                .unwrap();
            prop_assert_eq!(tokens.len(), 1);
            match &tokens[0].token {
                Token::Number(v) => prop_assert_eq!(*v, number.parse::<f64>().unwrap()),
                other => prop_assert!(false, "expected number, got {:?}", other),
            }
        }
    }
}
