use crate::core::error::{Error, Result};
use crate::query::ast::Operator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// One `.`-separated piece of a field path
    Segment(String),
    /// Comparison read right after `:`
    Operator(Operator),
    /// Literal the field is compared with
    Value(String),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Path,
    Value,
}

/// Query lexer. Alternates between path mode and value mode: `:` enters
/// value mode, a space after a value goes back to path mode.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    mode: Mode,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            mode: Mode::Path,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        self.skip_spaces();

        loop {
            match self.peek() {
                None => {
                    tokens.push(Token::Eof);
                    break;
                }
                Some('"') => {
                    self.advance();
                    let text = self.read_quoted()?;
                    tokens.push(self.text_token(text));
                }
                Some(':') => {
                    if self.mode == Mode::Value {
                        return Err(self.error("unexpected ':' inside a value"));
                    }
                    self.advance();
                    self.mode = Mode::Value;
                    tokens.push(Token::Operator(self.read_operator()?));
                }
                Some('.') if self.mode == Mode::Path => self.advance(),
                Some(' ') => {
                    if self.mode == Mode::Path {
                        return Err(self.error("unexpected space inside a path"));
                    }
                    self.skip_spaces();
                    self.mode = Mode::Path;
                }
                Some(_) => {
                    let word = self.read_word();
                    tokens.push(self.text_token(word));
                }
            }
        }

        Ok(tokens)
    }

    fn text_token(&self, text: String) -> Token {
        match self.mode {
            Mode::Path => Token::Segment(text),
            Mode::Value => Token::Value(text),
        }
    }

    fn read_operator(&mut self) -> Result<Operator> {
        match self.peek() {
            None => Err(self.error("expected a value after ':'")),
            Some('<') => {
                self.advance();
                Ok(Operator::Lt)
            }
            Some('>') => {
                self.advance();
                Ok(Operator::Gt)
            }
            Some(_) => Ok(Operator::Eq),
        }
    }

    /// Everything up to the closing quote. No escapes.
    fn read_quoted(&mut self) -> Result<String> {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if ch == '"' {
                let text = self.input[start..self.position].iter().collect();
                self.advance();
                return Ok(text);
            }
            self.advance();
        }
        Err(Error::invalid_query(format!(
            "unterminated quoted string starting at position {}",
            start.saturating_sub(1)
        )))
    }

    fn read_word(&mut self) -> String {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if self.ends_word(ch) {
                break;
            }
            self.advance();
        }
        self.input[start..self.position].iter().collect()
    }

    fn ends_word(&self, ch: char) -> bool {
        match ch {
            ' ' | ':' | '"' => true,
            '.' => self.mode == Mode::Path,
            _ => false,
        }
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(' ') {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn error(&self, message: &str) -> Error {
        Error::invalid_query(format!("{} at position {}", message, self.position))
    }
}
