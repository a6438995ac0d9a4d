//! Parser for RQL text
//!
//! Builds a [`Query`] tree from tokens.
//!
//! Grammar:
//!
//! ```text
//! query := call
//! call  := WORD '(' args ')'
//! args  := ε | arg (',' arg)*
//! arg   := call | array | WORD | ε          (ε is the empty string)
//! array := '(' args ')' | '[' args ']'
//! ```

use super::lexer::Token;
use super::{Operator, Query, RqlError, Value};

/// Parser for building a query tree from tokens
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Create a new parser
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            position: 0,
        }
    }

    /// Parse tokens into a query tree
    pub fn parse(tokens: Vec<Token>) -> Result<Query, RqlError> {
        let mut parser = Parser::new(tokens);
        let query = parser.parse_call()?;

        if let Some(token) = parser.current_token() {
            return Err(RqlError::TrailingInput(token.to_string()));
        }

        Ok(query)
    }

    fn parse_call(&mut self) -> Result<Query, RqlError> {
        let name = match self.current_token() {
            Some(Token::Word(name)) => name.clone(),
            Some(token) => {
                return Err(RqlError::UnexpectedToken {
                    expected: "operator name",
                    found: token.to_string(),
                })
            }
            None => return Err(RqlError::UnexpectedEnd),
        };
        self.advance();

        self.expect(&Token::LParen, "'('")?;
        let args = self.parse_args(&Token::RParen, ')')?;

        Ok(Query {
            operator: Operator::from(name.as_str()),
            args,
        })
    }

    /// Parse a comma-separated argument list up to and including `close`
    fn parse_args(&mut self, close: &Token, close_char: char) -> Result<Vec<Value>, RqlError> {
        let mut args = Vec::new();

        if self.match_token(close) {
            self.advance();
            return Ok(args);
        }

        loop {
            args.push(self.parse_arg()?);

            match self.current_token() {
                Some(Token::Comma) => self.advance(),
                Some(token) if token == close => {
                    self.advance();
                    return Ok(args);
                }
                Some(token) => {
                    return Err(RqlError::UnexpectedToken {
                        expected: "',' or closing delimiter",
                        found: token.to_string(),
                    })
                }
                None => return Err(RqlError::Unclosed(close_char)),
            }
        }
    }

    fn parse_arg(&mut self) -> Result<Value, RqlError> {
        match self.current_token() {
            // Nothing between separators is the empty string
            None | Some(Token::Comma | Token::RParen | Token::RBracket) => {
                Ok(Value::String(String::new()))
            }
            Some(Token::LParen) => {
                self.advance();
                Ok(Value::Array(self.parse_args(&Token::RParen, ')')?))
            }
            Some(Token::LBracket) => {
                self.advance();
                Ok(Value::Array(self.parse_args(&Token::RBracket, ']')?))
            }
            Some(Token::Word(word)) => {
                if matches!(self.peek_token(), Some(Token::LParen)) {
                    return Ok(Value::Query(self.parse_call()?));
                }
                let literal = parse_literal(word)?;
                self.advance();
                Ok(literal)
            }
        }
    }

    fn expect(&mut self, expected: &Token, description: &'static str) -> Result<(), RqlError> {
        match self.current_token() {
            Some(token) if token == expected => {
                self.advance();
                Ok(())
            }
            Some(token) => Err(RqlError::UnexpectedToken {
                expected: description,
                found: token.to_string(),
            }),
            None => Err(RqlError::UnexpectedEnd),
        }
    }

    fn match_token(&self, expected: &Token) -> bool {
        self.current_token() == Some(expected)
    }

    fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.tokens.get(self.position + 1)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Convert a bare word into a typed literal.
///
/// Bare integers become [`Value::Integer`] and `NaN` becomes
/// [`Value::NotANumber`]; `string:` and `number:` prefixes force the type.
fn parse_literal(word: &str) -> Result<Value, RqlError> {
    if let Some(rest) = word.strip_prefix("string:") {
        return decode(rest).map(Value::String);
    }

    if let Some(rest) = word.strip_prefix("number:") {
        if rest == "NaN" {
            return Ok(Value::NotANumber);
        }
        return rest
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| RqlError::InvalidNumber(rest.to_string()));
    }

    if word == "NaN" {
        return Ok(Value::NotANumber);
    }

    if is_integer_literal(word) {
        if let Ok(number) = word.parse::<i64>() {
            return Ok(Value::Integer(number));
        }
    }

    decode(word).map(Value::String)
}

pub(super) fn is_integer_literal(word: &str) -> bool {
    let digits = word.strip_prefix('-').unwrap_or(word);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn decode(word: &str) -> Result<String, RqlError> {
    urlencoding::decode(word)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| RqlError::InvalidEncoding(word.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rql::lexer::Lexer;

    fn parse(input: &str) -> Result<Query, RqlError> {
        Parser::parse(Lexer::tokenize(input)?)
    }

    #[test]
    fn test_parse_single_call() {
        let query = parse("match(cancer,Mica.name)").unwrap();

        assert_eq!(query.operator, Operator::Match);
        assert_eq!(
            query.args,
            vec![Value::from("cancer"), Value::from("Mica.name")]
        );
    }

    #[test]
    fn test_parse_array_argument() {
        let query = parse("in(Mica.sex,(male,female))").unwrap();

        assert_eq!(query.operator, Operator::In);
        assert_eq!(
            query.args[1],
            Value::Array(vec![Value::from("male"), Value::from("female")])
        );
    }

    #[test]
    fn test_parse_bracket_array() {
        let query = parse("in(Mica.sex,[male])").unwrap();
        assert_eq!(query.args[1], Value::Array(vec![Value::from("male")]));
    }

    #[test]
    fn test_parse_empty_array() {
        let query = parse("between(Mica.age,())").unwrap();
        assert_eq!(query.args[1], Value::Array(vec![]));
    }

    #[test]
    fn test_parse_integers_and_nan() {
        let query = parse("between(Mica.age,(10,-3,NaN))").unwrap();
        assert_eq!(
            query.args[1],
            Value::Array(vec![
                Value::Integer(10),
                Value::Integer(-3),
                Value::NotANumber
            ])
        );
    }

    #[test]
    fn test_parse_typed_prefixes() {
        let query = parse("in(Mica.code,(string:10,number:7))").unwrap();
        assert_eq!(
            query.args[1],
            Value::Array(vec![Value::from("10"), Value::Integer(7)])
        );
    }

    #[test]
    fn test_parse_empty_arguments() {
        let query = parse("match(,Mica.name)").unwrap();
        assert_eq!(query.args, vec![Value::from(""), Value::from("Mica.name")]);

        let query = parse("match(cancer,)").unwrap();
        assert_eq!(query.args, vec![Value::from("cancer"), Value::from("")]);
    }

    #[test]
    fn test_parse_no_arguments() {
        let query = parse("exists()").unwrap();
        assert_eq!(query.operator, Operator::Exists);
        assert!(query.args.is_empty());
    }

    #[test]
    fn test_parse_percent_decoding() {
        let query = parse("match(breast%20cancer,Mica.name)").unwrap();
        assert_eq!(query.args[0], Value::from("breast cancer"));
    }

    #[test]
    fn test_parse_nested_connectives() {
        let query = parse("and(in(Mica.sex,(male)),or(ge(Mica.age,10),exists(Mica.bmi)))").unwrap();

        assert_eq!(query.operator, Operator::And);
        match &query.args[1] {
            Value::Query(inner) => {
                assert_eq!(inner.operator, Operator::Or);
                assert_eq!(inner.args.len(), 2);
            }
            other => panic!("Expected nested query, found {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_unclosed_call() {
        assert_eq!(parse("in(Mica.sex,(male)"), Err(RqlError::Unclosed(')')));
    }

    #[test]
    fn test_parse_error_unclosed_bracket() {
        assert_eq!(parse("in(Mica.sex,[male"), Err(RqlError::Unclosed(']')));
    }

    #[test]
    fn test_parse_error_trailing_input() {
        assert!(matches!(
            parse("exists(Mica.sex))"),
            Err(RqlError::TrailingInput(_))
        ));
    }

    #[test]
    fn test_parse_error_missing_operator() {
        assert!(matches!(
            parse("(male,female)"),
            Err(RqlError::UnexpectedToken { .. })
        ));
        assert_eq!(parse("cancer"), Err(RqlError::UnexpectedEnd));
    }

    #[test]
    fn test_parse_error_empty_input() {
        assert_eq!(parse(""), Err(RqlError::UnexpectedEnd));
    }

    #[test]
    fn test_parse_error_bad_number() {
        assert_eq!(
            parse("ge(Mica.age,number:ten)"),
            Err(RqlError::InvalidNumber("ten".to_string()))
        );
    }

    #[test]
    fn test_parse_error_bad_encoding() {
        assert!(matches!(
            parse("match(%FF,Mica.name)"),
            Err(RqlError::InvalidEncoding(_))
        ));
    }
}
