//! Recursive-descent evaluation straight off the token stream.
//!
//! There is no syntax tree: every grammar rule takes the remaining tokens,
//! performs its effect and hands back the advanced cursor in nom's
//! `IResult` shape. Branches that are not taken are skipped by counting
//! nested keywords, and loops re-run their guard by resuming from a saved
//! cursor.

use crate::{
    error::AlgoError,
    eval::{
        environment::{Environment, VarType},
        operator::BinaryOp,
        value::Value,
    },
    lexer::token::{Token, TokenSlice, TokenType},
};
use nom::{
    branch::alt, bytes::complete::take, combinator::map, error::ErrorKind, error::ParseError, Err,
    IResult, InputIter, InputTake, Parser,
};
use std::{fmt, io::Write};
use tracing::{debug, trace};

pub mod environment;
pub mod operator;
pub mod value;

pub type EvalResult<'a, O> = IResult<TokenSlice<'a>, O, AlgoError>;

type Operand<'a, W> = fn(&mut Evaluator<W>, TokenSlice<'a>) -> EvalResult<'a, Value>;

const MISSING_FINSI: &str = "Expected 'finsi' to close the si block.";
const MISSING_FINTANTQUE: &str = "Expected 'fintantque' to close the tantque block.";

static END_OF_INPUT: Token = Token {
    token_type: TokenType::Eof,
    lexeme: String::new(),
    line: 0,
};

pub struct Evaluator<W: Write> {
    environment: Environment,
    out: W,
}

impl<W: Write> Evaluator<W> {
    pub fn new(out: W) -> Self {
        Self {
            environment: Environment::new(),
            out,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn into_environment(self) -> Environment {
        self.environment
    }

    pub fn interpret(&mut self, tokens: &[Token]) -> Result<(), AlgoError> {
        let result = match self.program(TokenSlice::from_tokens(tokens)) {
            Ok(_) => Ok(()),
            Err(Err::Error(e)) | Err(Err::Failure(e)) => Err(e),
            Err(Err::Incomplete(_)) => Err(AlgoError::syntax(
                tokens.last().unwrap_or(&END_OF_INPUT),
                "Unexpected end of input.",
            )),
        };

        self.out
            .flush()
            .map_err(|e| AlgoError::Output(e.to_string()))?;

        result
    }

    fn program<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, ()> {
        let (i, _) = Self::consume(
            input,
            TokenType::Algorithme,
            "Expected 'Algorithme' at the start of the program.",
        )?;
        let (i, name) = Self::consume(
            i,
            TokenType::Identifier,
            "Expected program name after 'Algorithme'.",
        )?;
        debug!(program = %name.lexeme, "running algorithm");
        let (i, _) = Self::consume(i, TokenType::Tdo, "Expected 'TDO' after program name.")?;
        let (i, _) = self.declarations(i)?;
        let (i, _) = Self::consume(i, TokenType::Debut, "Expected 'Debut' to start program body.")?;
        let (i, _) = self.statements_until(i, &[TokenType::Fin], "Expected 'Fin'.")?;
        Self::consume(i, TokenType::Fin, "Expected 'Fin'.").map(|(i, _)| (i, ()))
    }

    fn declarations<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, ()> {
        let mut i = input;

        while let Ok((rest, name)) = Self::tag(TokenType::Identifier)(i.clone()) {
            let (rest, _) = Self::consume(
                rest,
                TokenType::Colon,
                &format!("Expected ':' after {}.", name.lexeme),
            )?;
            let (rest, var_type) = Self::var_type(rest)?;
            let (rest, _) = Self::consume(
                rest,
                TokenType::Semicolon,
                &format!("Expected ';' after {}.", var_type),
            )?;

            debug!(name = %name.lexeme, %var_type, "declaring variable");
            self.environment.declare(&name.lexeme, var_type);
            i = rest;
        }

        Ok((i, ()))
    }

    fn var_type<'a>(input: TokenSlice<'a>) -> EvalResult<'a, VarType> {
        let (i, token) = Self::next_token(input)?;

        match VarType::from_token(token.token_type) {
            Some(var_type) => Ok((i, var_type)),
            None => Err(Err::Failure(AlgoError::syntax(
                token,
                "Expected type after ':'.",
            ))),
        }
    }

    /// Runs statements until the lookahead is one of `terminators`, which is
    /// left in place.
    fn statements_until<'a>(
        &mut self,
        input: TokenSlice<'a>,
        terminators: &[TokenType],
        missing: &str,
    ) -> EvalResult<'a, ()> {
        let mut i = input;

        loop {
            let token = Self::current(&i);

            if terminators.contains(&token.token_type) {
                return Ok((i, ()));
            }
            if token.token_type == TokenType::Eof {
                return Err(Err::Failure(AlgoError::syntax(token, missing)));
            }

            i = self.statement(i)?.0;
        }
    }

    fn statement<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, ()> {
        match Self::current(&input).token_type {
            TokenType::Ecrire => self.print_statement(input),
            TokenType::Si => self.if_statement(input),
            TokenType::Tantque => self.while_statement(input),
            TokenType::Identifier => self.assignment(input),
            _ => self.expression_statement(input),
        }
    }

    fn print_statement<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, ()> {
        let (i, _) = Self::tag(TokenType::Ecrire)(input)?;
        let (mut i, _) = Self::consume(i, TokenType::LeftParen, "Expected '(' after ecrire.")?;

        let mut first = true;
        loop {
            if let Ok((rest, _)) = Self::tag(TokenType::RightParen)(i.clone()) {
                i = rest;
                break;
            }
            if !first {
                i = Self::consume(i, TokenType::Comma, "Expected ',' between expressions.")?.0;
            }

            let (rest, value) = self.expression(i)?;
            self.emit(format_args!("{} ", value))?;
            first = false;
            i = rest;
        }

        self.emit(format_args!("\n"))?;
        Self::consume(
            i,
            TokenType::Semicolon,
            "Expected ';' after print statement.",
        )
        .map(|(i, _)| (i, ()))
    }

    fn if_statement<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, ()> {
        let (i, keyword) = Self::tag(TokenType::Si)(input)?;
        let (i, guard) = self.expression(i)?;
        let (i, _) = Self::consume(i, TokenType::Alors, "Expected 'alors' after condition.")?;
        let condition = Self::guard(keyword, guard)?;

        debug!(line = keyword.line, condition, "si");

        let i = if condition {
            let (i, _) = self.statements_until(
                i,
                &[TokenType::Sinon, TokenType::Finsi],
                MISSING_FINSI,
            )?;
            match Self::tag(TokenType::Sinon)(i.clone()) {
                Ok((rest, _)) => Self::skip_branch(rest, false)?.0,
                Err(_) => i,
            }
        } else {
            let (i, _) = Self::skip_branch(i, true)?;
            match Self::tag(TokenType::Sinon)(i.clone()) {
                Ok((rest, _)) => {
                    self.statements_until(rest, &[TokenType::Finsi], MISSING_FINSI)?
                        .0
                }
                Err(_) => i,
            }
        };

        Self::consume(i, TokenType::Finsi, MISSING_FINSI).map(|(i, _)| (i, ()))
    }

    /// Moves the cursor onto the `finsi` closing the current conditional, or
    /// onto its `sinon` when `stop_at_sinon` is set. The terminator is not
    /// consumed.
    fn skip_branch(input: TokenSlice<'_>, stop_at_sinon: bool) -> EvalResult<'_, ()> {
        let mut depth = 1usize;

        for (index, token) in input.iter_indices() {
            match token.token_type {
                TokenType::Si => depth += 1,
                TokenType::Finsi if depth == 1 => return Ok((input.take_split(index).0, ())),
                TokenType::Finsi => depth -= 1,
                TokenType::Sinon if depth == 1 && stop_at_sinon => {
                    return Ok((input.take_split(index).0, ()))
                }
                TokenType::Eof => break,
                _ => {}
            }
        }

        Err(Err::Failure(AlgoError::syntax(
            Self::last(&input),
            MISSING_FINSI,
        )))
    }

    fn while_statement<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, ()> {
        let (guard_start, keyword) = Self::tag(TokenType::Tantque)(input)?;
        let (mut i, mut condition) = self.loop_guard(guard_start.clone(), keyword)?;

        let mut iterations = 0u64;
        while condition {
            let (rest, _) = self.statements_until(i, &[TokenType::Fintantque], MISSING_FINTANTQUE)?;
            Self::consume(rest, TokenType::Fintantque, MISSING_FINTANTQUE)?;

            iterations += 1;
            debug!(line = keyword.line, iterations, "tantque: back to the guard");

            let (rest, next) = self.loop_guard(guard_start.clone(), keyword)?;
            i = rest;
            condition = next;
        }

        debug!(line = keyword.line, iterations, "tantque done");
        Self::skip_loop_body(i)
    }

    fn loop_guard<'a>(
        &mut self,
        input: TokenSlice<'a>,
        keyword: &'a Token,
    ) -> EvalResult<'a, bool> {
        let (i, guard) = self.expression(input)?;
        let (i, _) = Self::consume(i, TokenType::Faire, "Expected 'faire' after condition.")?;
        let condition = Self::guard(keyword, guard)?;

        Ok((i, condition))
    }

    /// Moves the cursor past the `fintantque` matching the loop being left.
    fn skip_loop_body(input: TokenSlice<'_>) -> EvalResult<'_, ()> {
        let mut depth = 0usize;

        for (index, token) in input.iter_indices() {
            match token.token_type {
                TokenType::Tantque => depth += 1,
                TokenType::Fintantque if depth == 0 => {
                    return Ok((input.take_split(index + 1).0, ()))
                }
                TokenType::Fintantque => depth -= 1,
                TokenType::Eof => break,
                _ => {}
            }
        }

        Err(Err::Failure(AlgoError::syntax(
            Self::last(&input),
            MISSING_FINTANTQUE,
        )))
    }

    fn guard(keyword: &Token, value: Value) -> Result<bool, Err<AlgoError>> {
        match value {
            Value::Boolean(condition) => Ok(condition),
            other => Err(Err::Failure(AlgoError::runtime(
                keyword,
                format!(
                    "Condition in '{}' must evaluate to a boolean, found {}.",
                    keyword.token_type,
                    other.type_name()
                ),
            ))),
        }
    }

    fn assignment<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, ()> {
        let (i, name) = Self::tag(TokenType::Identifier)(input)?;
        let (i, _) = Self::consume(
            i,
            TokenType::LessMinus,
            &format!("Expected '<-' after {}.", name.lexeme),
        )?;
        let (i, value) = self.expression(i)?;

        trace!(name = %name.lexeme, %value, "assigning");
        self.environment
            .assign(&name.lexeme, value)
            .map_err(|e| Err::Failure(AlgoError::runtime(name, e)))?;

        Self::consume(i, TokenType::Semicolon, "Expected ';' after assignment.")
            .map(|(i, _)| (i, ()))
    }

    fn expression_statement<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, ()> {
        let (i, _) = self.expression(input)?;

        Self::consume(i, TokenType::Semicolon, "Expected ';' after expression.")
            .map(|(i, _)| (i, ()))
    }

    fn expression<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, Value> {
        self.logical_or(input)
    }

    fn logical_or<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, Value> {
        self.fold_binary(
            input,
            map(Self::tag(TokenType::Ou), |token| (BinaryOp::Or, token)),
            Self::logical_and,
        )
    }

    fn logical_and<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, Value> {
        self.fold_binary(
            input,
            map(Self::tag(TokenType::Et), |token| (BinaryOp::And, token)),
            Self::equality,
        )
    }

    fn equality<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, Value> {
        self.fold_binary(
            input,
            alt((
                map(Self::tag(TokenType::Equal), |token| (BinaryOp::Equal, token)),
                map(Self::tag(TokenType::BangEqual), |token| {
                    (BinaryOp::NotEqual, token)
                }),
            )),
            Self::comparison,
        )
    }

    fn comparison<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, Value> {
        self.fold_binary(
            input,
            alt((
                map(Self::tag(TokenType::Less), |token| (BinaryOp::Less, token)),
                map(Self::tag(TokenType::Greater), |token| {
                    (BinaryOp::Greater, token)
                }),
                map(Self::tag(TokenType::LessEqual), |token| {
                    (BinaryOp::LessEqual, token)
                }),
                map(Self::tag(TokenType::GreaterEqual), |token| {
                    (BinaryOp::GreaterEqual, token)
                }),
                map(Self::tag(TokenType::Equal), |token| (BinaryOp::Equal, token)),
            )),
            Self::additive,
        )
    }

    fn additive<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, Value> {
        self.fold_binary(
            input,
            alt((
                map(Self::tag(TokenType::Plus), |token| (BinaryOp::Add, token)),
                map(Self::tag(TokenType::Minus), |token| {
                    (BinaryOp::Subtract, token)
                }),
            )),
            Self::multiplicative,
        )
    }

    fn multiplicative<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, Value> {
        self.fold_binary(
            input,
            alt((
                map(Self::tag(TokenType::Star), |token| {
                    (BinaryOp::Multiply, token)
                }),
                map(Self::tag(TokenType::Slash), |token| (BinaryOp::Divide, token)),
                map(Self::tag(TokenType::Div), |token| (BinaryOp::Div, token)),
                map(Self::tag(TokenType::Mod), |token| (BinaryOp::Mod, token)),
            )),
            Self::unary,
        )
    }

    /// Left-associative fold of `operand (operator operand)*`.
    fn fold_binary<'a, P>(
        &mut self,
        input: TokenSlice<'a>,
        mut operator: P,
        operand: Operand<'a, W>,
    ) -> EvalResult<'a, Value>
    where
        P: Parser<TokenSlice<'a>, (BinaryOp, &'a Token), AlgoError>,
    {
        let (mut i, mut left) = operand(self, input)?;

        loop {
            let (rest, (op, token)) = match operator.parse(i.clone()) {
                Ok(matched) => matched,
                Err(Err::Error(_)) => return Ok((i, left)),
                Err(e) => return Err(e),
            };

            let (rest, right) = operand(self, rest)?;
            left = op
                .apply(left, right)
                .map_err(|e| Err::Failure(AlgoError::runtime(token, e)))?;
            i = rest;
        }
    }

    fn unary<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, Value> {
        if let Ok((i, token)) = Self::tag(TokenType::Minus)(input.clone()) {
            let (i, operand) = self.primary(i)?;
            let value =
                operator::negate(operand).map_err(|e| Err::Failure(AlgoError::runtime(token, e)))?;
            return Ok((i, value));
        }

        if let Ok((i, token)) = Self::tag(TokenType::Non)(input.clone()) {
            let (i, operand) = self.unary(i)?;
            let value =
                operator::not(operand).map_err(|e| Err::Failure(AlgoError::runtime(token, e)))?;
            return Ok((i, value));
        }

        self.primary(input)
    }

    fn primary<'a>(&mut self, input: TokenSlice<'a>) -> EvalResult<'a, Value> {
        let (i, token) = Self::next_token(input)?;

        let value = match token.token_type {
            TokenType::EntierNumber => token
                .lexeme
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| Err::Failure(AlgoError::runtime(token, e)))?,
            TokenType::ReelNumber => token
                .lexeme
                .parse::<f64>()
                .map(Value::Real)
                .map_err(|e| Err::Failure(AlgoError::runtime(token, e)))?,
            TokenType::String => Value::Text(token.lexeme.clone()),
            TokenType::Vrai => Value::Boolean(true),
            TokenType::Faux => Value::Boolean(false),
            TokenType::LeftParen => {
                let (i, value) = self.expression(i)?;
                let (i, _) =
                    Self::consume(i, TokenType::RightParen, "Expected ')' after expression.")?;
                return Ok((i, value));
            }
            TokenType::Identifier => self
                .environment
                .get(&token.lexeme)
                .map(Value::clone)
                .map_err(|e| Err::Failure(AlgoError::runtime(token, e)))?,
            _ => {
                return Err(Err::Failure(AlgoError::syntax(
                    token,
                    "Expected an expression.",
                )))
            }
        };

        Ok((i, value))
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) -> Result<(), Err<AlgoError>> {
        self.out
            .write_fmt(args)
            .map_err(|e| Err::Failure(AlgoError::Output(e.to_string())))
    }

    fn current<'a>(input: &TokenSlice<'a>) -> &'a Token {
        input.current().unwrap_or(&END_OF_INPUT)
    }

    fn last<'a>(input: &TokenSlice<'a>) -> &'a Token {
        input.last().unwrap_or(&END_OF_INPUT)
    }

    fn next_token<'a>(input: TokenSlice<'a>) -> EvalResult<'a, &'a Token> {
        let (i, taken) = take::<_, _, AlgoError>(1usize)(input.clone())?;

        match taken.iter_elements().next() {
            Some(token) => Ok((i, token)),
            None => Err(Err::Error(AlgoError::from_error_kind(input, ErrorKind::Eof))),
        }
    }

    fn tag<'a>(token_type: TokenType) -> impl Fn(TokenSlice<'a>) -> EvalResult<'a, &'a Token> {
        move |input: TokenSlice<'a>| {
            let (i, token) = Self::next_token(input.clone())?;

            if token.token_type == token_type {
                trace!(line = token.line, token = %token, "[INTERPRETER] consuming");
                Ok((i, token))
            } else {
                Err(Err::Error(AlgoError::from_error_kind(input, ErrorKind::Tag)))
            }
        }
    }

    /// Like [`Self::tag`], but a mismatch is fatal and reported with `message`.
    fn consume<'a>(
        input: TokenSlice<'a>,
        token_type: TokenType,
        message: &str,
    ) -> EvalResult<'a, &'a Token> {
        Self::tag(token_type)(input.clone())
            .map_err(|_| Err::Failure(AlgoError::syntax(Self::current(&input), message)))
    }
}

#[cfg(test)]
mod test {
    use crate::{
        error::AlgoError,
        eval::{value::Value, Evaluator},
        lexer::Lexer,
    };

    #[derive(Debug)]
    struct TestDataSimple<T> {
        input: &'static str,
        expected: T,
    }

    fn run(source: &str) -> (Result<(), AlgoError>, String) {
        let tokens = Lexer::new().lex_input(source).unwrap();
        let mut out = Vec::new();
        let result = Evaluator::new(&mut out).interpret(&tokens);

        (result, String::from_utf8(out).unwrap())
    }

    fn run_ok(source: &str) -> String {
        let (result, output) = run(source);
        assert_eq!(result, Ok(()), "{}", source);
        output
    }

    fn run_err(source: &str) -> (AlgoError, String) {
        let (result, output) = run(source);
        (result.unwrap_err(), output)
    }

    fn print_expression(expression: &str) -> Result<String, AlgoError> {
        let (result, output) = run(&format!(
            "Algorithme T TDO Debut ecrire({}); Fin",
            expression
        ));
        result.map(|_| output.trim_end_matches('\n').trim_end().to_string())
    }

    fn runtime_message(error: AlgoError) -> String {
        match error {
            AlgoError::Runtime { message, .. } => message,
            other => panic!("expected a runtime error, got {:?}", other),
        }
    }

    #[test]
    fn eval_integer_expression() {
        let test_data = vec![
            TestDataSimple {
                input: "5",
                expected: "5",
            },
            TestDataSimple {
                input: "-5",
                expected: "-5",
            },
            TestDataSimple {
                input: "5 + 5 + 5 + 5 - 10",
                expected: "10",
            },
            TestDataSimple {
                input: "2 * 2 * 2 * 2 * 2",
                expected: "32",
            },
            TestDataSimple {
                input: "-50 + 100 + -50",
                expected: "0",
            },
            TestDataSimple {
                input: "5 + 2 * 10",
                expected: "25",
            },
            TestDataSimple {
                input: "2 * (5 + 10)",
                expected: "30",
            },
            TestDataSimple {
                input: "17 div 5 * 5 + 17 mod 5",
                expected: "17",
            },
            TestDataSimple {
                input: "10 - 2 - 3",
                expected: "5",
            },
            TestDataSimple {
                input: "-7 div 2",
                expected: "-3",
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            assert_eq!(
                print_expression(test_datum.input),
                Ok(test_datum.expected.to_string()),
                "{}",
                test_datum.input
            );
        });
    }

    #[test]
    fn eval_real_expression() {
        let test_data = vec![
            TestDataSimple {
                input: "1.5 + 1",
                expected: "2.5",
            },
            TestDataSimple {
                input: "7.0 / 2",
                expected: "3.5",
            },
            TestDataSimple {
                input: "2 * 3.0",
                expected: "6.0",
            },
            TestDataSimple {
                input: "-0.5 - 1",
                expected: "-1.5",
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            assert_eq!(
                print_expression(test_datum.input),
                Ok(test_datum.expected.to_string()),
                "{}",
                test_datum.input
            );
        });
    }

    #[test]
    fn eval_boolean_expression() {
        let test_data = vec![
            TestDataSimple {
                input: "vrai",
                expected: true,
            },
            TestDataSimple {
                input: "1 < 2",
                expected: true,
            },
            TestDataSimple {
                input: "1 >= 2",
                expected: false,
            },
            TestDataSimple {
                input: "2 <= 2",
                expected: true,
            },
            TestDataSimple {
                input: "1 = 1.0",
                expected: true,
            },
            TestDataSimple {
                input: "1 != 2",
                expected: true,
            },
            TestDataSimple {
                input: "vrai = faux",
                expected: false,
            },
            TestDataSimple {
                input: "1 < 2 et 3 > 4",
                expected: false,
            },
            TestDataSimple {
                input: "1 < 2 et 3 > 4 ou vrai",
                expected: true,
            },
            TestDataSimple {
                input: "faux ou faux et vrai",
                expected: false,
            },
            TestDataSimple {
                input: "non vrai",
                expected: false,
            },
            TestDataSimple {
                input: "non (1 > 2) et vrai",
                expected: true,
            },
            TestDataSimple {
                input: "(1 < 2) = vrai",
                expected: true,
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            assert_eq!(
                print_expression(test_datum.input),
                Ok(test_datum.expected.to_string()),
                "{}",
                test_datum.input
            );
        });
    }

    #[test]
    fn eval_runtime_errors() {
        let test_data = vec![
            TestDataSimple {
                input: "1 div 0",
                expected: "Division by zero.",
            },
            TestDataSimple {
                input: "1 mod 0",
                expected: "Modulo by zero.",
            },
            TestDataSimple {
                input: "1.0 / 0.0",
                expected: "Division by zero.",
            },
            TestDataSimple {
                input: "7 / 2",
                expected: "Invalid operator for integers: /",
            },
            TestDataSimple {
                input: "7.5 div 2",
                expected: "Invalid operator for reals: div",
            },
            TestDataSimple {
                input: "\"a\" + 1",
                expected: "Invalid operands for '+': chaine and entier.",
            },
            TestDataSimple {
                input: "1 et vrai",
                expected: "Invalid operands for 'et': entier and bool.",
            },
            TestDataSimple {
                input: "-vrai",
                expected: "Invalid operand for '-': bool.",
            },
            TestDataSimple {
                input: "inconnu + 1",
                expected: "Undefined variable: inconnu",
            },
            TestDataSimple {
                input: "9223372036854775807 + 1",
                expected: "Integer overflow.",
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            let error = print_expression(test_datum.input).unwrap_err();
            assert_eq!(runtime_message(error), test_datum.expected, "{}", test_datum.input);
        });
    }

    #[test]
    fn reals_print_with_a_decimal_point() {
        assert_eq!(
            print_expression("10000000000000000.0"),
            Ok("10000000000000000.0".to_string())
        );

        let near_max = format!("1{}.0", "0".repeat(308));
        let error = print_expression(&format!("{} * 10.0", near_max)).unwrap_err();
        assert_eq!(runtime_message(error), "Real overflow.");
    }

    #[test]
    fn runtime_errors_point_at_the_operator() {
        let error = print_expression("4 +\n 2 div\n 0").unwrap_err();

        assert_eq!(
            error,
            AlgoError::Runtime {
                line: 2,
                lexeme: "div".to_string(),
                message: "Division by zero.".to_string(),
            }
        );
    }

    #[test]
    fn print_statement() {
        let output = run_ok(
            r#"Algorithme Affiche TDO
            Debut
                ecrire("total", 1 + 2, 2.5, vrai);
                ecrire();
                ecrire("fin");
            Fin"#,
        );

        assert_eq!(output, "total 3 2.5 true \n\nfin \n");
    }

    #[test]
    fn print_keeps_output_written_before_an_error() {
        let (error, output) = run_err("Algorithme T TDO Debut ecrire(1, 2 div 0, 3); Fin");

        assert_eq!(runtime_message(error), "Division by zero.");
        assert_eq!(output, "1 ");
    }

    #[test]
    fn assignment() {
        let tokens = Lexer::new()
            .lex_input(
                r#"Algorithme Vars TDO
                    n: entier;
                    r: reel;
                    s: chaine;
                    c: char;
                    b: bool;
                Debut
                    n <- 2 + 3;
                    r <- n;
                    s <- "texte";
                    c <- "x";
                    b <- n > 4;
                Fin"#,
            )
            .unwrap();
        let mut out = Vec::new();
        let mut evaluator = Evaluator::new(&mut out);

        assert_eq!(evaluator.interpret(&tokens), Ok(()));

        let environment = evaluator.environment();
        assert_eq!(environment.get("n"), Ok(&Value::Integer(5)));
        assert_eq!(environment.get("r"), Ok(&Value::Real(5.0)));
        assert_eq!(environment.get("s"), Ok(&Value::Text("texte".to_string())));
        assert_eq!(environment.get("c"), Ok(&Value::Text("x".to_string())));
        assert_eq!(environment.get("b"), Ok(&Value::Boolean(true)));
    }

    #[test]
    fn assignment_errors() {
        let test_data = vec![
            TestDataSimple {
                input: "Algorithme T TDO n: entier; Debut n <- 1.5; Fin",
                expected: "Type mismatch: cannot assign reel to entier variable n.",
            },
            TestDataSimple {
                input: "Algorithme T TDO b: bool; Debut b <- 1; Fin",
                expected: "Type mismatch: cannot assign entier to bool variable b.",
            },
            TestDataSimple {
                input: "Algorithme T TDO c: char; Debut c <- \"ab\"; Fin",
                expected: "Type mismatch: cannot assign chaine to char variable c.",
            },
            TestDataSimple {
                input: "Algorithme T TDO Debut z <- 1; Fin",
                expected: "Undefined variable: z",
            },
            TestDataSimple {
                input: "Algorithme T TDO n: entier; m: entier; Debut n <- m + 1; Fin",
                expected: "Variable used before assignment: m",
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            let (error, _) = run_err(test_datum.input);
            assert_eq!(runtime_message(error), test_datum.expected, "{}", test_datum.input);
        });
    }

    #[test]
    fn if_else_statements() {
        let test_data = vec![
            TestDataSimple {
                input: "si vrai alors ecrire(1); finsi",
                expected: "1 \n",
            },
            TestDataSimple {
                input: "si faux alors ecrire(1); finsi",
                expected: "",
            },
            TestDataSimple {
                input: "si 1 < 2 alors ecrire(1); sinon ecrire(2); finsi",
                expected: "1 \n",
            },
            TestDataSimple {
                input: "si 1 > 2 alors ecrire(1); sinon ecrire(2); finsi",
                expected: "2 \n",
            },
            TestDataSimple {
                input: "si faux alors ecrire(1); finsi ecrire(2);",
                expected: "2 \n",
            },
            TestDataSimple {
                input: "si vrai alors si faux alors ecrire(1); sinon ecrire(2); finsi sinon ecrire(3); finsi",
                expected: "2 \n",
            },
            TestDataSimple {
                input: "si faux alors si vrai alors ecrire(1); sinon ecrire(2); finsi sinon ecrire(3); finsi",
                expected: "3 \n",
            },
            TestDataSimple {
                input: "si faux alors si vrai alors ecrire(1); finsi ecrire(4); finsi ecrire(5);",
                expected: "5 \n",
            },
            TestDataSimple {
                input: "si vrai alors ecrire(1); sinon si vrai alors ecrire(2); finsi ecrire(3); finsi ecrire(4);",
                expected: "1 \n4 \n",
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            let output = run_ok(&format!("Algorithme T TDO Debut {} Fin", test_datum.input));
            assert_eq!(output, test_datum.expected, "{}", test_datum.input);
        });
    }

    #[test]
    fn if_errors() {
        let (error, _) = run_err("Algorithme T TDO Debut si 1 alors ecrire(1); finsi Fin");
        assert_eq!(
            error,
            AlgoError::Runtime {
                line: 1,
                lexeme: "si".to_string(),
                message: "Condition in 'si' must evaluate to a boolean, found entier.".to_string(),
            }
        );

        let (error, _) = run_err("Algorithme T TDO Debut si faux alors ecrire(1);\n Fin");
        assert_eq!(
            error,
            AlgoError::Syntax {
                line: 2,
                lexeme: "EOF".to_string(),
                message: "Expected 'finsi' to close the si block.".to_string(),
            }
        );

        let (error, _) = run_err("Algorithme T TDO Debut si vrai ecrire(1); finsi Fin");
        assert!(matches!(error, AlgoError::Syntax { ref message, .. } if message == "Expected 'alors' after condition."));
    }

    #[test]
    fn while_statements() {
        let output = run_ok(
            r#"Algorithme Boucle TDO
                i: entier;
            Debut
                i <- 0;
                tantque i < 3 faire
                    ecrire(i);
                    i <- i + 1;
                fintantque
                ecrire("fin", i);
            Fin"#,
        );

        assert_eq!(output, "0 \n1 \n2 \nfin 3 \n");
    }

    #[test]
    fn nested_while_statements() {
        let output = run_ok(
            r#"Algorithme Table TDO
                i: entier;
                j: entier;
            Debut
                i <- 1;
                tantque i <= 2 faire
                    j <- 1;
                    tantque j <= 3 faire
                        si (i + j) mod 2 = 0 alors
                            ecrire(i * j);
                        finsi
                        j <- j + 1;
                    fintantque
                    i <- i + 1;
                fintantque
            Fin"#,
        );

        assert_eq!(output, "1 \n3 \n4 \n");
    }

    #[test]
    fn false_guard_skips_the_whole_loop() {
        let output = run_ok(
            r#"Algorithme T TDO Debut
                tantque faux faire
                    ecrire(1 div 0);
                    tantque vrai faire ecrire("jamais"); fintantque
                fintantque
                ecrire("apres");
            Fin"#,
        );

        assert_eq!(output, "apres \n");
    }

    #[test]
    fn while_errors() {
        let (error, _) = run_err("Algorithme T TDO Debut tantque 1 faire fintantque Fin");
        assert_eq!(
            runtime_message(error),
            "Condition in 'tantque' must evaluate to a boolean, found entier."
        );

        let (error, _) = run_err("Algorithme T TDO Debut tantque faux faire ecrire(1); Fin");
        assert!(matches!(error, AlgoError::Syntax { ref message, .. } if message == "Expected 'fintantque' to close the tantque block."));
    }

    #[test]
    fn program_structure_errors() {
        let test_data = vec![
            TestDataSimple {
                input: "Debut Fin",
                expected: "Expected 'Algorithme' at the start of the program.",
            },
            TestDataSimple {
                input: "Algorithme TDO Debut Fin",
                expected: "Expected program name after 'Algorithme'.",
            },
            TestDataSimple {
                input: "Algorithme T Debut Fin",
                expected: "Expected 'TDO' after program name.",
            },
            TestDataSimple {
                input: "Algorithme T TDO x entier; Debut Fin",
                expected: "Expected ':' after x.",
            },
            TestDataSimple {
                input: "Algorithme T TDO x: nombre; Debut Fin",
                expected: "Expected type after ':'.",
            },
            TestDataSimple {
                input: "Algorithme T TDO x: entier Debut Fin",
                expected: "Expected ';' after entier.",
            },
            TestDataSimple {
                input: "Algorithme T TDO ecrire(1); Fin",
                expected: "Expected 'Debut' to start program body.",
            },
            TestDataSimple {
                input: "Algorithme T TDO Debut ecrire(1);",
                expected: "Expected 'Fin'.",
            },
            TestDataSimple {
                input: "Algorithme T TDO Debut ecrire(1 2); Fin",
                expected: "Expected ',' between expressions.",
            },
            TestDataSimple {
                input: "Algorithme T TDO Debut ecrire((1; Fin",
                expected: "Expected ')' after expression.",
            },
            TestDataSimple {
                input: "Algorithme T TDO Debut ; Fin",
                expected: "Expected an expression.",
            },
            TestDataSimple {
                input: "Algorithme T TDO x: entier; Debut x = 1; Fin",
                expected: "Expected '<-' after x.",
            },
            TestDataSimple {
                input: "Algorithme T TDO Debut 1 + 2 Fin",
                expected: "Expected ';' after expression.",
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            let (error, _) = run_err(test_datum.input);
            match error {
                AlgoError::Syntax { message, .. } => {
                    assert_eq!(message, test_datum.expected, "{}", test_datum.input)
                }
                other => panic!("{}: expected a syntax error, got {:?}", test_datum.input, other),
            }
        });
    }

    #[test]
    fn expression_statement_is_evaluated() {
        let (error, output) =
            run_err("Algorithme T TDO Debut ecrire(1); 1 div 0; ecrire(2); Fin");

        assert_eq!(runtime_message(error), "Division by zero.");
        assert_eq!(output, "1 \n");
    }

    #[test]
    fn tokens_after_fin_are_ignored() {
        assert_eq!(run_ok("Algorithme T TDO Debut ecrire(1); Fin ecrire(2);"), "1 \n");
    }
}
