use crate::token::{Token, TokenType};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScanError {
    #[error("[line {line}] Error: Unexpected character '{character}'.")]
    UnexpectedCharacter { character: char, line: usize },
    #[error("[line {line}] Error: Integer literal out of range.")]
    IntegerOutOfRange { line: usize },
}

/// Scans the whole source in one left-to-right pass. Lexical errors are
/// collected rather than aborting the pass; the token list is still usable
/// and always ends with a single `Eof` token.
pub fn scan(source: &str) -> (Vec<Token>, Vec<ScanError>) {
    let mut scanner = Scanner::new(source);
    scanner.scan_tokens();
    (scanner.tokens, scanner.errors)
}

struct Scanner<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    errors: Vec<ScanError>,
    start: usize,
    current: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            errors: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    fn scan_tokens(&mut self) {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens.push(Token::new(TokenType::Eof, "", self.line));
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            '[' => self.add_token(TokenType::LeftBracket),
            ']' => self.add_token(TokenType::RightBracket),
            ',' => self.add_token(TokenType::Comma),
            '-' => self.add_token(TokenType::Minus),
            '+' => self.add_token(TokenType::Plus),
            '*' => self.add_token(TokenType::Star),
            '%' => self.add_token(TokenType::Percent),
            ';' => self.add_token(TokenType::Semicolon),
            '.' => {
                let token_type = if self.match_char('.') {
                    TokenType::DotDot
                } else {
                    TokenType::Dot
                };
                self.add_token(token_type);
            }
            ':' => {
                let token_type = if self.match_char('=') {
                    TokenType::Walrus
                } else {
                    TokenType::Colon
                };
                self.add_token(token_type);
            }
            '=' => {
                let token_type = if self.match_char('=') {
                    TokenType::EqualEqual
                } else {
                    TokenType::Equal
                };
                self.add_token(token_type);
            }
            '<' => {
                let token_type = if self.match_char('=') {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                };
                self.add_token(token_type);
            }
            '>' => {
                let token_type = if self.match_char('=') {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                };
                self.add_token(token_type);
            }
            '/' => {
                if self.match_char('=') {
                    self.add_token(TokenType::SlashEqual);
                } else if self.match_char('/') {
                    // Line comment, discarded up to (not including) the newline.
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenType::Slash);
                }
            }

            ' ' | '\r' | '\t' => {}

            '\n' => self.line += 1,

            c if c.is_ascii_digit() => self.number(),
            c if is_alpha(c) => self.identifier(),

            c => self.errors.push(ScanError::UnexpectedCharacter {
                character: c,
                line: self.line,
            }),
        }
    }

    fn identifier(&mut self) {
        while is_alphanumeric(self.peek()) {
            self.advance();
        }

        let text = &self.source[self.start..self.current];
        let token_type =
            TokenType::keyword(text).unwrap_or_else(|| TokenType::Identifier(text.to_string()));
        self.add_token(token_type);
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // Real only when the dot is immediately followed by a digit, so
        // `1..3` still scans as integer, dot-dot, integer.
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }

            let value = self.source[self.start..self.current]
                .parse()
                .expect("scanned real literal is a valid f64");
            self.add_token(TokenType::Real(value));
            return;
        }

        match self.source[self.start..self.current].parse() {
            Ok(value) => self.add_token(TokenType::Integer(value)),
            Err(_) => self
                .errors
                .push(ScanError::IntegerOutOfRange { line: self.line }),
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current..]
            .chars()
            .next()
            .expect("advance is only called before end of input");
        self.current += c.len_utf8();
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() != expected {
            return false;
        }
        self.current += expected.len_utf8();
        true
    }

    fn peek(&self) -> char {
        self.source[self.current..].chars().next().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next().unwrap_or('\0')
    }

    fn add_token(&mut self, token_type: TokenType) {
        let lexeme = &self.source[self.start..self.current];
        self.tokens.push(Token::new(token_type, lexeme, self.line));
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alphanumeric(c: char) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod test {
    use super::*;

    fn token_types(source: &str) -> Vec<TokenType> {
        let (tokens, errors) = scan(source);
        assert!(errors.is_empty(), "unexpected scan errors: {:?}", errors);
        tokens.into_iter().map(|t| t.token_type).collect()
    }

    #[test]
    fn test_var_declaration() {
        let expected = vec![
            TokenType::Var,
            TokenType::Identifier("x".to_string()),
            TokenType::Is,
            TokenType::Integer(1),
            TokenType::Semicolon,
            TokenType::Eof,
        ];
        assert_eq!(token_types("var x is 1;"), expected);
    }

    #[test]
    fn test_real_literal_requires_digit_after_dot() {
        assert_eq!(
            token_types("1.5"),
            vec![TokenType::Real(1.5), TokenType::Eof]
        );
        assert_eq!(
            token_types("1."),
            vec![TokenType::Integer(1), TokenType::Dot, TokenType::Eof]
        );
    }

    #[test]
    fn test_range_is_not_a_real() {
        let expected = vec![
            TokenType::Integer(1),
            TokenType::DotDot,
            TokenType::Integer(3),
            TokenType::Eof,
        ];
        assert_eq!(token_types("1..3"), expected);
    }

    #[test]
    fn test_two_character_operators() {
        let expected = vec![
            TokenType::Walrus,
            TokenType::EqualEqual,
            TokenType::SlashEqual,
            TokenType::LessEqual,
            TokenType::GreaterEqual,
            TokenType::Eof,
        ];
        assert_eq!(token_types(":= == /= <= >="), expected);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let expected = vec![
            TokenType::Routine,
            TokenType::Identifier("main".to_string()),
            TokenType::LeftParen,
            TokenType::RightParen,
            TokenType::Is,
            TokenType::End,
            TokenType::Eof,
        ];
        assert_eq!(token_types("routine main() is end"), expected);
    }

    #[test]
    fn test_line_counting() {
        let (tokens, errors) = scan("var x is 1;\nvar y is 2;");
        assert!(errors.is_empty());
        assert_eq!(tokens.first().map(|t| t.line), Some(1));
        assert_eq!(tokens.last().map(|t| t.line), Some(2));
    }

    #[test]
    fn test_unexpected_character_is_collected() {
        let (tokens, errors) = scan("var x is 1 # 2;");
        assert_eq!(
            errors,
            vec![ScanError::UnexpectedCharacter {
                character: '#',
                line: 1
            }]
        );
        // Scanning continued past the bad character.
        assert!(tokens
            .iter()
            .any(|t| t.token_type == TokenType::Integer(2)));
    }

    #[test]
    fn test_comment_is_discarded() {
        let expected = vec![
            TokenType::Print,
            TokenType::Integer(1),
            TokenType::Semicolon,
            TokenType::Eof,
        ];
        assert_eq!(token_types("print 1; // trailing note"), expected);
    }

    #[test]
    fn test_lexemes_reconstruct_source() {
        let source = "routine add(a : integer, b : integer) : integer is return a + b; end";
        let (tokens, errors) = scan(source);
        assert!(errors.is_empty());
        // Concatenated lexemes reproduce the input modulo discarded whitespace.
        let rebuilt: String = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        let squeezed: String = source.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(rebuilt, squeezed);
    }
}
