#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: &str, line: usize) -> Self {
        Self {
            token_type,
            lexeme: lexeme.to_string(),
            line,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Dot,
    Minus,
    Plus,
    Star,
    Slash,
    Percent,
    Semicolon,
    Colon,

    // One- or two-character tokens.
    DotDot,
    /// `:=`
    Walrus,
    Equal,
    EqualEqual,
    /// `/=`
    SlashEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier(String),
    Integer(i32),
    Real(f64),

    // Keywords.
    And,
    Array,
    Boolean,
    Else,
    End,
    False,
    For,
    If,
    In,
    IntegerType,
    Is,
    Loop,
    Not,
    Or,
    Print,
    RealType,
    Record,
    Return,
    Reverse,
    Routine,
    Then,
    True,
    Type,
    Var,
    While,
    Xor,

    Eof,
}

impl TokenType {
    /// The keyword token for `text`, or `None` when it is a plain identifier.
    pub fn keyword(text: &str) -> Option<TokenType> {
        let token_type = match text {
            "and" => TokenType::And,
            "array" => TokenType::Array,
            "boolean" => TokenType::Boolean,
            "else" => TokenType::Else,
            "end" => TokenType::End,
            "false" => TokenType::False,
            "for" => TokenType::For,
            "if" => TokenType::If,
            "in" => TokenType::In,
            "integer" => TokenType::IntegerType,
            "is" => TokenType::Is,
            "loop" => TokenType::Loop,
            "not" => TokenType::Not,
            "or" => TokenType::Or,
            "print" => TokenType::Print,
            "real" => TokenType::RealType,
            "record" => TokenType::Record,
            "return" => TokenType::Return,
            "reverse" => TokenType::Reverse,
            "routine" => TokenType::Routine,
            "then" => TokenType::Then,
            "true" => TokenType::True,
            "type" => TokenType::Type,
            "var" => TokenType::Var,
            "while" => TokenType::While,
            "xor" => TokenType::Xor,
            _ => return None,
        };
        Some(token_type)
    }
}
