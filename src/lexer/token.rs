use nom::{InputIter, InputTake, Needed};
use std::{
    fmt::{self, Display, Formatter},
    iter::Enumerate,
    slice::Iter,
};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub line: u32,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: impl Into<String>, line: u32) -> Self {
        Self {
            token_type,
            lexeme: lexeme.into(),
            line,
        }
    }

    /// Text used to point at this token in error messages.
    pub fn text(&self) -> &str {
        match self.token_type {
            TokenType::Eof => "EOF",
            _ => &self.lexeme,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.token_type, self.lexeme)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Eof,

    // Symbols
    LeftParen,
    RightParen,
    Colon,
    Comma,
    Semicolon,

    // Operators
    Minus,
    Plus,
    Slash,
    Star,
    Equal,
    BangEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    LessMinus,

    // Literals
    Identifier,
    String,
    EntierNumber,
    ReelNumber,

    // Structure
    Algorithme,
    Tdo,
    Debut,
    Fin,

    // Types
    Entier,
    Reel,
    Chaine,
    Char,
    Bool,

    // Control flow
    Si,
    Alors,
    Sinon,
    Finsi,
    Tantque,
    Faire,
    Fintantque,

    // Keywords
    Vrai,
    Faux,
    Non,
    Et,
    Ou,
    Ecrire,
    Div,
    Mod,
}

impl TokenType {
    pub fn keyword(text: &str) -> Option<Self> {
        let token_type = match text {
            "Algorithme" => TokenType::Algorithme,
            "TDO" => TokenType::Tdo,
            "Debut" => TokenType::Debut,
            "Fin" => TokenType::Fin,
            "entier" => TokenType::Entier,
            "reel" => TokenType::Reel,
            "chaine" => TokenType::Chaine,
            "char" => TokenType::Char,
            "bool" => TokenType::Bool,
            "si" => TokenType::Si,
            "alors" => TokenType::Alors,
            "sinon" => TokenType::Sinon,
            "finsi" => TokenType::Finsi,
            "tantque" => TokenType::Tantque,
            "faire" => TokenType::Faire,
            "fintantque" => TokenType::Fintantque,
            "vrai" => TokenType::Vrai,
            "faux" => TokenType::Faux,
            "non" => TokenType::Non,
            "et" => TokenType::Et,
            "ou" => TokenType::Ou,
            "ecrire" => TokenType::Ecrire,
            "div" => TokenType::Div,
            "mod" => TokenType::Mod,
            _ => return None,
        };

        Some(token_type)
    }
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Eof => write!(f, "EOF"),
            TokenType::LeftParen => write!(f, "("),
            TokenType::RightParen => write!(f, ")"),
            TokenType::Colon => write!(f, ":"),
            TokenType::Comma => write!(f, ","),
            TokenType::Semicolon => write!(f, ";"),
            TokenType::Minus => write!(f, "-"),
            TokenType::Plus => write!(f, "+"),
            TokenType::Slash => write!(f, "/"),
            TokenType::Star => write!(f, "*"),
            TokenType::Equal => write!(f, "="),
            TokenType::BangEqual => write!(f, "!="),
            TokenType::Greater => write!(f, ">"),
            TokenType::GreaterEqual => write!(f, ">="),
            TokenType::Less => write!(f, "<"),
            TokenType::LessEqual => write!(f, "<="),
            TokenType::LessMinus => write!(f, "<-"),
            TokenType::Identifier => write!(f, "identifier"),
            TokenType::String => write!(f, "string literal"),
            TokenType::EntierNumber => write!(f, "integer literal"),
            TokenType::ReelNumber => write!(f, "real literal"),
            TokenType::Algorithme => write!(f, "Algorithme"),
            TokenType::Tdo => write!(f, "TDO"),
            TokenType::Debut => write!(f, "Debut"),
            TokenType::Fin => write!(f, "Fin"),
            TokenType::Entier => write!(f, "entier"),
            TokenType::Reel => write!(f, "reel"),
            TokenType::Chaine => write!(f, "chaine"),
            TokenType::Char => write!(f, "char"),
            TokenType::Bool => write!(f, "bool"),
            TokenType::Si => write!(f, "si"),
            TokenType::Alors => write!(f, "alors"),
            TokenType::Sinon => write!(f, "sinon"),
            TokenType::Finsi => write!(f, "finsi"),
            TokenType::Tantque => write!(f, "tantque"),
            TokenType::Faire => write!(f, "faire"),
            TokenType::Fintantque => write!(f, "fintantque"),
            TokenType::Vrai => write!(f, "vrai"),
            TokenType::Faux => write!(f, "faux"),
            TokenType::Non => write!(f, "non"),
            TokenType::Et => write!(f, "et"),
            TokenType::Ou => write!(f, "ou"),
            TokenType::Ecrire => write!(f, "ecrire"),
            TokenType::Div => write!(f, "div"),
            TokenType::Mod => write!(f, "mod"),
        }
    }
}

/// The evaluator's cursor: the tokens that have not been consumed yet.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TokenSlice<'a> {
    pub slice: &'a [Token],
}

impl<'a> TokenSlice<'a> {
    pub fn from_tokens(tokens: &'a [Token]) -> Self {
        Self { slice: tokens }
    }

    pub fn current(&self) -> Option<&'a Token> {
        self.slice.first()
    }

    pub fn last(&self) -> Option<&'a Token> {
        self.slice.last()
    }
}

impl<'a> InputTake for TokenSlice<'a> {
    fn take(&self, count: usize) -> Self {
        Self {
            slice: &self.slice[..count],
        }
    }

    fn take_split(&self, count: usize) -> (Self, Self) {
        let (front, back) = self.slice.split_at(count);
        (Self { slice: back }, Self { slice: front })
    }
}

impl<'a> InputIter for TokenSlice<'a> {
    type Item = &'a Token;
    type Iter = Enumerate<Iter<'a, Token>>;
    type IterElem = Iter<'a, Token>;

    fn iter_indices(&self) -> Self::Iter {
        self.slice.iter().enumerate()
    }

    fn iter_elements(&self) -> Self::IterElem {
        self.slice.iter()
    }

    fn position<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(Self::Item) -> bool,
    {
        self.slice.iter().position(predicate)
    }

    fn slice_index(&self, count: usize) -> Result<usize, Needed> {
        if self.slice.len() >= count {
            Ok(count)
        } else {
            Err(Needed::new(count - self.slice.len()))
        }
    }
}
