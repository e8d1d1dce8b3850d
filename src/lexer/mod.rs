pub mod token;

use crate::error::AlgoError;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{alpha1, char, digit1, multispace0},
    combinator::{map, opt, peek, recognize},
    multi::many0,
    sequence::{pair, preceded},
    Err, IResult,
};
use nom_locate::LocatedSpan;
use token::{Token, TokenType};
use tracing::trace;

pub type Span<'a> = LocatedSpan<&'a str>;

type LexResult<'a, O> = IResult<Span<'a>, O, AlgoError>;

pub struct Lexer;

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Self
    }

    pub fn lex_input(&self, source: &str) -> Result<Vec<Token>, AlgoError> {
        let (rest, mut tokens) = match many0(Self::token_lexer)(Span::new(source)) {
            Ok(result) => result,
            Err(Err::Error(e)) | Err(Err::Failure(e)) => return Err(e),
            Err(Err::Incomplete(_)) => {
                return Err(AlgoError::lexical(0, "Unexpected end of input."))
            }
        };

        let rest = Self::skip_whitespace(rest);
        if let Some(c) = rest.fragment().chars().next() {
            return Err(AlgoError::lexical(
                rest.location_line(),
                format!("Unexpected character '{}'.", c),
            ));
        }

        tokens.push(Token::new(TokenType::Eof, "", rest.location_line()));

        Ok(tokens)
    }

    fn token_lexer(input: Span<'_>) -> LexResult<'_, Token> {
        let (i, token) = preceded(
            multispace0,
            alt((
                Self::string_literal_lexer,
                Self::number_lexer,
                Self::ident_lexer,
                Self::operator_lexer,
                Self::punctuation_lexer,
            )),
        )(input)?;

        trace!(line = token.line, token = %token, "[LEXER] token");

        Ok((i, token))
    }

    fn operator_lexer(input: Span<'_>) -> LexResult<'_, Token> {
        alt((
            Self::static_token_lexer_generator("<=", TokenType::LessEqual),
            Self::static_token_lexer_generator("<-", TokenType::LessMinus),
            Self::static_token_lexer_generator("<", TokenType::Less),
            Self::static_token_lexer_generator(">=", TokenType::GreaterEqual),
            Self::static_token_lexer_generator(">", TokenType::Greater),
            Self::static_token_lexer_generator("!=", TokenType::BangEqual),
            Self::static_token_lexer_generator("=", TokenType::Equal),
            Self::static_token_lexer_generator("+", TokenType::Plus),
            Self::static_token_lexer_generator("-", TokenType::Minus),
            Self::static_token_lexer_generator("*", TokenType::Star),
            Self::static_token_lexer_generator("/", TokenType::Slash),
        ))(input)
    }

    fn punctuation_lexer(input: Span<'_>) -> LexResult<'_, Token> {
        alt((
            Self::static_token_lexer_generator("(", TokenType::LeftParen),
            Self::static_token_lexer_generator(")", TokenType::RightParen),
            Self::static_token_lexer_generator(":", TokenType::Colon),
            Self::static_token_lexer_generator(",", TokenType::Comma),
            Self::static_token_lexer_generator(";", TokenType::Semicolon),
        ))(input)
    }

    fn static_token_lexer_generator<'a>(
        symbol: &'static str,
        token_type: TokenType,
    ) -> impl FnMut(Span<'a>) -> LexResult<'a, Token> {
        map(tag(symbol), move |span: Span<'a>| {
            Token::new(token_type, *span.fragment(), span.location_line())
        })
    }

    fn string_literal_lexer(input: Span<'_>) -> LexResult<'_, Token> {
        let (i, quote) = tag::<_, _, AlgoError>("\"")(input)?;
        let (i, contents) = take_while::<_, _, AlgoError>(|c: char| c != '"')(i)?;

        match tag::<_, _, AlgoError>("\"")(i) {
            Ok((i, _)) => Ok((
                i,
                Token::new(TokenType::String, *contents.fragment(), quote.location_line()),
            )),
            Err(_) => Err(Err::Failure(AlgoError::lexical(
                quote.location_line(),
                "Unterminated string.",
            ))),
        }
    }

    fn ident_lexer(input: Span<'_>) -> LexResult<'_, Token> {
        map(
            preceded(
                peek(alt((alpha1, tag("_")))),
                take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
            ),
            |ident: Span<'_>| {
                let token_type = TokenType::keyword(ident.fragment()).unwrap_or(TokenType::Identifier);
                Token::new(token_type, *ident.fragment(), ident.location_line())
            },
        )(input)
    }

    fn number_lexer(input: Span<'_>) -> LexResult<'_, Token> {
        let (i, number) =
            recognize::<_, _, AlgoError, _>(pair(digit1, opt(pair(char('.'), digit1))))(input)?;
        let text = *number.fragment();

        let (token_type, valid) = if text.contains('.') {
            let finite = text.parse::<f64>().map_or(false, f64::is_finite);
            (TokenType::ReelNumber, finite)
        } else {
            (TokenType::EntierNumber, text.parse::<i64>().is_ok())
        };

        if !valid {
            return Err(Err::Failure(AlgoError::lexical(
                number.location_line(),
                format!("Invalid number format: {}", text),
            )));
        }

        Ok((i, Token::new(token_type, text, number.location_line())))
    }

    fn skip_whitespace(input: Span<'_>) -> Span<'_> {
        match multispace0::<_, AlgoError>(input) {
            Ok((rest, _)) => rest,
            Err(_) => input,
        }
    }
}
