//! Lexical analysis for RQL query text
//!
//! Converts raw query strings into tokens for parsing.

use super::RqlError;
use std::fmt;

/// Token types in RQL text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Operator name or literal, still percent-encoded (e.g., "in", "Mica.sex", "string:10")
    Word(String),
    /// Left parenthesis (call arguments or array)
    LParen,
    /// Right parenthesis
    RParen,
    /// Left bracket (array, accepted on input only)
    LBracket,
    /// Right bracket
    RBracket,
    /// Argument separator
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => write!(f, "'{}'", word),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Comma => write!(f, "','"),
        }
    }
}

/// Lexer for tokenizing RQL strings
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    /// Tokenize the entire input string
    pub fn tokenize(input: &str) -> Result<Vec<Token>, RqlError> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();

        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>, RqlError> {
        self.skip_whitespace();

        let Some(ch) = self.current_char() else {
            return Ok(None);
        };

        let token = match ch {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            // FIQL-style shorthand (`a=b&c=d`) is not part of the accepted syntax
            '&' | '|' | '=' => {
                return Err(RqlError::UnexpectedCharacter {
                    ch,
                    position: self.position,
                })
            }
            _ => return Ok(Some(Token::Word(self.read_word()))),
        };

        self.advance(ch);
        Ok(Some(token))
    }

    fn read_word(&mut self) -> String {
        let start = self.position;

        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() || is_delimiter(ch) {
                break;
            }
            self.advance(ch);
        }

        self.input[start..self.position].to_string()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if !ch.is_whitespace() {
                break;
            }
            self.advance(ch);
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn advance(&mut self, ch: char) {
        self.position += ch.len_utf8();
    }
}

fn is_delimiter(ch: char) -> bool {
    matches!(ch, '(' | ')' | '[' | ']' | ',' | '&' | '|' | '=')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_tokenize_simple_call() {
        let tokens = Lexer::tokenize("match(cancer,Mica.name)").unwrap();
        assert_eq!(
            tokens,
            vec![
                word("match"),
                Token::LParen,
                word("cancer"),
                Token::Comma,
                word("Mica.name"),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_nested_array() {
        let tokens = Lexer::tokenize("in(Mica.sex,(male,female))").unwrap();
        assert_eq!(tokens.len(), 10);
        assert_eq!(tokens[4], Token::LParen);
        assert_eq!(tokens[8], Token::RParen);
        assert_eq!(tokens[9], Token::RParen);
    }

    #[test]
    fn test_tokenize_brackets() {
        let tokens = Lexer::tokenize("in(Mica.sex,[male])").unwrap();
        assert_eq!(tokens[4], Token::LBracket);
        assert_eq!(tokens[6], Token::RBracket);
    }

    #[test]
    fn test_tokenize_empty_argument_keeps_commas() {
        let tokens = Lexer::tokenize("match(,Mica.name)").unwrap();
        assert_eq!(
            tokens,
            vec![
                word("match"),
                Token::LParen,
                Token::Comma,
                word("Mica.name"),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_whitespace_handling() {
        let tokens = Lexer::tokenize("  ge( Mica.age ,  10 ) ").unwrap();
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[4], word("10"));
    }

    #[test]
    fn test_tokenize_multibyte_word() {
        let tokens = Lexer::tokenize("match(café,Mica.name)").unwrap();
        assert_eq!(tokens[2], word("café"));
    }

    #[test]
    fn test_tokenize_error_fiql_shorthand() {
        let result = Lexer::tokenize("Mica.sex=male");
        assert_eq!(
            result,
            Err(RqlError::UnexpectedCharacter {
                ch: '=',
                position: 8
            })
        );
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert!(Lexer::tokenize("   ").unwrap().is_empty());
    }
}
