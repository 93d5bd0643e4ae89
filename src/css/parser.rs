//! Recursive descent stylesheet parser.
//!
//! Parses stylesheet text into a [`Stylesheet`] (a vector of [`RuleSet`]s),
//! and selector strings into [`Selector`]s for the query API. Uses the
//! logos-based tokenizer from [`crate::css::tokenizer`].

use logos::Logos;

use crate::css::model::*;
use crate::css::tokenizer::Token;

/// Errors from stylesheet parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token at position {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
}

/// A positioned token with byte-level span information for whitespace
/// detection between selector components.
#[derive(Debug, Clone)]
struct PToken {
    token: Token,
    text: String,
    /// Index in the token stream (for error reporting).
    pos: usize,
    /// Byte offset where this token starts in the source.
    byte_start: usize,
    /// Byte offset where this token ends in the source.
    byte_end: usize,
}

/// Strip block comments (`/* ... */`), replacing each with a single space.
fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    while i < len {
        if i + 1 < len && bytes[i] == b'/' && bytes[i + 1] == b'*' {
            i += 2;
            let mut found_end = false;
            while i + 1 < len {
                if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                    i += 2;
                    found_end = true;
                    break;
                }
                i += 1;
            }
            if !found_end {
                // Unterminated comment consumes the rest of the input.
                i = len;
            }
            result.push(' ');
        } else {
            result.push(bytes[i] as char);
            i += 1;
        }
    }

    result
}

/// Tokenize input with span information preserved.
fn tokenize_with_spans(input: &str) -> Vec<PToken> {
    let lexer = Token::lexer(input);
    let mut tokens = Vec::new();
    let mut idx = 0;

    for (result, span) in lexer.spanned() {
        if let Ok(token) = result {
            tokens.push(PToken {
                text: input[span.clone()].to_string(),
                token,
                pos: idx,
                byte_start: span.start,
                byte_end: span.end,
            });
            idx += 1;
        }
    }

    tokens
}

/// Parse a stylesheet string into a [`Stylesheet`].
pub fn parse_css(input: &str) -> Result<Stylesheet, ParseError> {
    let cleaned = strip_comments(input);
    let tokens = tokenize_with_spans(&cleaned);

    let mut parser = Parser { tokens, cursor: 0 };

    let mut rules = Vec::new();
    while !parser.is_eof() {
        rules.push(parser.parse_rule()?);
    }

    Ok(Stylesheet { rules })
}

/// Parse a standalone selector list, e.g. `"body > button, #go"`.
///
/// This is the entry point used by the element/widget query API.
pub fn parse_selector_list(input: &str) -> Result<Vec<Selector>, ParseError> {
    let tokens = tokenize_with_spans(input);
    let mut parser = Parser { tokens, cursor: 0 };
    let selectors = parser.parse_selector_list()?;
    if !parser.is_eof() {
        return Err(ParseError::UnexpectedToken {
            position: parser.current_pos(),
            message: "trailing tokens after selector".into(),
        });
    }
    Ok(selectors)
}

/// Recursive descent parser state.
struct Parser {
    tokens: Vec<PToken>,
    cursor: usize,
}

impl Parser {
    fn is_eof(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    fn peek(&self) -> Option<&PToken> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Option<&PToken> {
        if self.cursor < self.tokens.len() {
            let tok = &self.tokens[self.cursor];
            self.cursor += 1;
            Some(tok)
        } else {
            None
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<PToken, ParseError> {
        match self.advance() {
            Some(tok) if &tok.token == expected => Ok(tok.clone()),
            Some(tok) => Err(ParseError::UnexpectedToken {
                position: tok.pos,
                message: format!("expected {:?}, got {:?} '{}'", expected, tok.token, tok.text),
            }),
            None => Err(ParseError::UnexpectedEof(format!("expected {:?}", expected))),
        }
    }

    fn current_pos(&self) -> usize {
        self.peek().map(|t| t.pos).unwrap_or(self.tokens.len())
    }

    /// Returns `true` if the current token is immediately adjacent (no
    /// whitespace) to the previous token.
    fn is_adjacent(&self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = &self.tokens[self.cursor - 1];
        match self.peek() {
            Some(curr) => curr.byte_start == prev.byte_end,
            None => false,
        }
    }

    /// Parse a single rule: selector(s) `{` declarations `}`.
    fn parse_rule(&mut self) -> Result<RuleSet, ParseError> {
        let selectors = self.parse_selector_list()?;
        self.expect(&Token::BraceOpen)?;
        let declarations = self.parse_declarations()?;
        self.expect(&Token::BraceClose)?;

        Ok(RuleSet {
            selectors,
            declarations,
        })
    }

    /// Parse a comma-separated list of selectors.
    fn parse_selector_list(&mut self) -> Result<Vec<Selector>, ParseError> {
        let mut selectors = Vec::new();

        selectors.push(self.parse_selector()?);

        while self.peek().is_some_and(|t| t.token == Token::Comma) {
            self.advance(); // consume comma
            selectors.push(self.parse_selector()?);
        }

        Ok(selectors)
    }

    /// Parse a single selector: compound selectors with combinators.
    fn parse_selector(&mut self) -> Result<Selector, ParseError> {
        let mut parts = Vec::new();

        parts.push(SelectorPart::Compound(self.parse_compound_selector()?));

        loop {
            match self.peek() {
                // `>` means child combinator
                Some(t) if t.token == Token::GreaterThan => {
                    self.advance();
                    parts.push(SelectorPart::Combinator(Combinator::Child));
                    parts.push(SelectorPart::Compound(self.parse_compound_selector()?));
                }
                // A selector-starting token after whitespace is a descendant
                // combinator. Adjacent tokens were already consumed by
                // parse_compound_selector.
                Some(t)
                    if matches!(
                        t.token,
                        Token::Ident | Token::Hash | Token::Dot | Token::Star
                    ) =>
                {
                    parts.push(SelectorPart::Combinator(Combinator::Descendant));
                    parts.push(SelectorPart::Compound(self.parse_compound_selector()?));
                }
                _ => break,
            }
        }

        Ok(Selector { parts })
    }

    /// Parse one simple component after a `.` or `#` sigil.
    ///
    /// Id names may be bare numbers (`entry#0`), so both idents and numbers
    /// are accepted as the name token.
    fn parse_sigil_name(&mut self, what: &str) -> Result<String, ParseError> {
        let name_tok = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(format!("expected {what} name")))?;
        match name_tok.token {
            Token::Ident | Token::Number => Ok(name_tok.text.clone()),
            _ => Err(ParseError::UnexpectedToken {
                position: name_tok.pos,
                message: format!(
                    "expected {what} name, got {:?} '{}'",
                    name_tok.token, name_tok.text
                ),
            }),
        }
    }

    /// Parse a compound selector: simple components with no whitespace
    /// between them, e.g. `button#go.big`.
    ///
    /// Uses span-based adjacency detection: `.class` and `#id` are only
    /// appended to the current compound if they appear immediately after the
    /// previous token.
    fn parse_compound_selector(&mut self) -> Result<CompoundSelector, ParseError> {
        let mut components = Vec::new();

        match self.peek() {
            Some(t) if t.token == Token::Ident => {
                let name = t.text.clone();
                self.advance();
                components.push(SelectorComponent::Type(name));
            }
            Some(t) if t.token == Token::Star => {
                self.advance();
                components.push(SelectorComponent::Universal);
            }
            Some(t) if t.token == Token::Dot => {
                self.advance();
                let name = self.parse_sigil_name("class")?;
                components.push(SelectorComponent::Class(name));
            }
            Some(t) if t.token == Token::Hash => {
                self.advance();
                let name = self.parse_sigil_name("id")?;
                components.push(SelectorComponent::Id(name));
            }
            _ => {
                return Err(ParseError::UnexpectedToken {
                    position: self.current_pos(),
                    message: "expected selector part".into(),
                });
            }
        }

        // Continue appending only while the next token touches the previous.
        loop {
            if !self.is_adjacent() {
                break;
            }

            match self.peek() {
                Some(t) if t.token == Token::Dot => {
                    self.advance();
                    let name = self.parse_sigil_name("class")?;
                    components.push(SelectorComponent::Class(name));
                }
                Some(t) if t.token == Token::Hash => {
                    self.advance();
                    let name = self.parse_sigil_name("id")?;
                    components.push(SelectorComponent::Id(name));
                }
                _ => break,
            }
        }

        Ok(CompoundSelector { components })
    }

    /// Parse declarations until the closing brace.
    fn parse_declarations(&mut self) -> Result<Vec<Declaration>, ParseError> {
        let mut declarations = Vec::new();

        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::UnexpectedEof(
                        "expected declaration or '}'".into(),
                    ))
                }
                Some(t) if t.token == Token::BraceClose => break,
                Some(t) if t.token == Token::Semicolon => {
                    // Stray semicolons between declarations are tolerated.
                    self.advance();
                }
                _ => declarations.push(self.parse_declaration()?),
            }
        }

        Ok(declarations)
    }

    /// Parse one declaration: `property : value-tokens ;?`.
    ///
    /// The value is every token up to the next `;` or `}`, joined with
    /// single spaces. Quoted strings lose their quotes.
    fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        let prop_tok = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof("expected property name".into()))?;
        if prop_tok.token != Token::Ident {
            return Err(ParseError::UnexpectedToken {
                position: prop_tok.pos,
                message: format!(
                    "expected property name, got {:?} '{}'",
                    prop_tok.token, prop_tok.text
                ),
            });
        }
        let property = prop_tok.text.clone();

        self.expect(&Token::Colon)?;

        let mut pieces: Vec<String> = Vec::new();
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::UnexpectedEof(format!(
                        "unterminated declaration for '{property}'"
                    )))
                }
                Some(t) if t.token == Token::Semicolon => {
                    self.advance();
                    break;
                }
                Some(t) if t.token == Token::BraceClose => break,
                Some(t) => {
                    let piece = match t.token {
                        Token::StringLiteral | Token::StringLiteralSingle => {
                            t.text[1..t.text.len() - 1].to_string()
                        }
                        _ => t.text.clone(),
                    };
                    pieces.push(piece);
                    self.advance();
                }
            }
        }

        if pieces.is_empty() {
            return Err(ParseError::UnexpectedToken {
                position: self.current_pos(),
                message: format!("empty value for property '{property}'"),
            });
        }

        Ok(Declaration {
            property,
            value: pieces.join(" "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Rules ────────────────────────────────────────────────────────

    #[test]
    fn parse_single_rule() {
        let sheet = parse_css("button { width: 8; }").unwrap();
        assert_eq!(sheet.rules.len(), 1);
        let rule = &sheet.rules[0];
        assert_eq!(rule.selectors.len(), 1);
        assert_eq!(rule.declarations.len(), 1);
        assert_eq!(rule.declarations[0].property, "width");
        assert_eq!(rule.declarations[0].value, "8");
    }

    #[test]
    fn parse_multiple_declarations() {
        let sheet = parse_css("left > button { width: 8; text: nouse; }").unwrap();
        let rule = &sheet.rules[0];
        assert_eq!(rule.declarations.len(), 2);
        assert_eq!(rule.declarations[1].property, "text");
        assert_eq!(rule.declarations[1].value, "nouse");
    }

    #[test]
    fn parse_multiple_rules() {
        let sheet = parse_css("button { width: 8; } entry { show: x; }").unwrap();
        assert_eq!(sheet.rules.len(), 2);
    }

    #[test]
    fn parse_selector_combinators() {
        let sheet = parse_css("body > grid gd { pad: 2; }").unwrap();
        let sel = &sheet.rules[0].selectors[0];
        assert_eq!(sel.parts.len(), 5);
        assert_eq!(sel.parts[1], SelectorPart::Combinator(Combinator::Child));
        assert_eq!(
            sel.parts[3],
            SelectorPart::Combinator(Combinator::Descendant)
        );
    }

    #[test]
    fn parse_selector_group() {
        let sheet = parse_css("button, entry { width: 4; }").unwrap();
        assert_eq!(sheet.rules[0].selectors.len(), 2);
    }

    #[test]
    fn parse_compound_selector_components() {
        let selectors = parse_selector_list("button#go.big").unwrap();
        let parts = &selectors[0].parts;
        assert_eq!(parts.len(), 1);
        let SelectorPart::Compound(compound) = &parts[0] else {
            panic!("expected compound");
        };
        assert_eq!(
            compound.components,
            vec![
                SelectorComponent::Type("button".into()),
                SelectorComponent::Id("go".into()),
                SelectorComponent::Class("big".into()),
            ]
        );
    }

    #[test]
    fn parse_numeric_id() {
        let selectors = parse_selector_list("entry#0").unwrap();
        let SelectorPart::Compound(compound) = &selectors[0].parts[0] else {
            panic!("expected compound");
        };
        assert_eq!(compound.components[1], SelectorComponent::Id("0".into()));
    }

    #[test]
    fn parse_universal() {
        let selectors = parse_selector_list("*").unwrap();
        let SelectorPart::Compound(compound) = &selectors[0].parts[0] else {
            panic!("expected compound");
        };
        assert_eq!(compound.components, vec![SelectorComponent::Universal]);
    }

    #[test]
    fn detached_class_is_descendant() {
        // `left .cell` is a descendant combinator, `left.cell` is compound.
        let detached = parse_selector_list("left .cell").unwrap();
        assert_eq!(detached[0].parts.len(), 3);

        let compound = parse_selector_list("left.cell").unwrap();
        assert_eq!(compound[0].parts.len(), 1);
    }

    // ── Values ───────────────────────────────────────────────────────

    #[test]
    fn quoted_value_loses_quotes() {
        let sheet = parse_css(r#"button { text: "hello there"; }"#).unwrap();
        assert_eq!(sheet.rules[0].declarations[0].value, "hello there");
    }

    #[test]
    fn multi_token_value_joined() {
        let sheet = parse_css("button { pad: 1 2; }").unwrap();
        assert_eq!(sheet.rules[0].declarations[0].value, "1 2");
    }

    #[test]
    fn binding_value_preserved() {
        let sheet = parse_css("button { command: {self.onClick}; }").unwrap();
        assert_eq!(sheet.rules[0].declarations[0].value, "{self.onClick}");
    }

    #[test]
    fn last_declaration_may_omit_semicolon() {
        let sheet = parse_css("button { width: 8 }").unwrap();
        assert_eq!(sheet.rules[0].declarations[0].value, "8");
    }

    // ── Comments ─────────────────────────────────────────────────────

    #[test]
    fn comments_are_stripped() {
        let sheet = parse_css("/* header */ button { /* inner */ width: 8; }").unwrap();
        assert_eq!(sheet.rules[0].declarations[0].property, "width");
    }

    #[test]
    fn unterminated_comment_consumes_rest() {
        let sheet = parse_css("button { width: 8; } /* trailing").unwrap();
        assert_eq!(sheet.rules.len(), 1);
    }

    // ── Errors ───────────────────────────────────────────────────────

    #[test]
    fn missing_brace_is_error() {
        assert!(parse_css("button width: 8; }").is_err());
    }

    #[test]
    fn missing_value_is_error() {
        assert!(parse_css("button { width: ; }").is_err());
    }

    #[test]
    fn unterminated_block_is_error() {
        assert!(parse_css("button { width: 8;").is_err());
    }

    #[test]
    fn trailing_tokens_after_selector_list_is_error() {
        assert!(parse_selector_list("button {").is_err());
    }

    #[test]
    fn empty_stylesheet_ok() {
        let sheet = parse_css("   ").unwrap();
        assert!(sheet.rules.is_empty());
    }
}
