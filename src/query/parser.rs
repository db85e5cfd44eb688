use crate::core::error::{Error, Result};
use crate::query::ast::{Clause, Operator, Query};
use crate::query::lexer::{Lexer, Token};

/// Query parser for converting query strings to a clause list
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParser;

impl QueryParser {
    pub fn new() -> Self {
        QueryParser
    }

    /// Parse a query string into a `Query`
    /// Examples:
    /// - "a.b:1" -> a.b equals 1
    /// - "a:<10" / "a:>10" -> numeric comparison
    /// - "x:1 y:hi" -> both must hold
    /// - "\"first name\":\"Ada L\"" -> quoted path segment and value
    /// - "" -> no clauses
    pub fn parse(&self, input: &str) -> Result<Query> {
        if input.is_empty() {
            return Ok(Query::default());
        }

        let tokens = Lexer::new(input).tokenize()?;
        let clauses = assemble(tokens)?;

        if clauses.is_empty() {
            return Err(Error::invalid_query(format!("no clauses in query {:?}", input)));
        }
        Ok(Query::new(clauses))
    }
}

/// Shorthand for `QueryParser::new().parse(input)`.
pub fn parse_query(input: &str) -> Result<Query> {
    QueryParser::new().parse(input)
}

#[derive(Default)]
struct PartialClause {
    path: Vec<String>,
    op: Option<Operator>,
}

impl PartialClause {
    fn is_started(&self) -> bool {
        !self.path.is_empty() || self.op.is_some()
    }

    fn finish(self, value: String) -> Result<Clause> {
        if self.path.is_empty() {
            return Err(Error::invalid_query(format!("clause for value {:?} has no path", value)));
        }
        let op = self.op.ok_or_else(|| {
            Error::invalid_query(format!("clause {} has no ':'", self.path.join(".")))
        })?;
        if value.is_empty() {
            return Err(Error::invalid_query(format!(
                "clause {} has an empty value",
                self.path.join(".")
            )));
        }
        Ok(Clause {
            path: self.path,
            op,
            value,
        })
    }
}

fn assemble(tokens: Vec<Token>) -> Result<Vec<Clause>> {
    let mut clauses = Vec::new();
    let mut current = PartialClause::default();

    for token in tokens {
        match token {
            Token::Segment(segment) => current.path.push(segment),
            Token::Operator(op) => current.op = Some(op),
            Token::Value(value) => {
                let clause = std::mem::take(&mut current).finish(value)?;
                clauses.push(clause);
            }
            Token::Eof => {
                if current.is_started() {
                    return Err(Error::invalid_query(format!(
                        "incomplete clause {:?}",
                        current.path.join(".")
                    )));
                }
            }
        }
    }

    Ok(clauses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    fn clause(path: &[&str], op: Operator, value: &str) -> Clause {
        Clause::new(path.iter().copied(), op, value)
    }

    #[test]
    fn test_equality() {
        let query = parse_query("a.b:1").unwrap();
        assert_eq!(query.clauses, vec![clause(&["a", "b"], Operator::Eq, "1")]);
    }

    #[test]
    fn test_less_and_greater() {
        assert_eq!(
            parse_query("a:<10").unwrap().clauses,
            vec![clause(&["a"], Operator::Lt, "10")]
        );
        assert_eq!(
            parse_query("a:>10").unwrap().clauses,
            vec![clause(&["a"], Operator::Gt, "10")]
        );
    }

    #[test]
    fn test_multiple_clauses() {
        assert_eq!(
            parse_query("a.b:>10 a.c:hello").unwrap().clauses,
            vec![
                clause(&["a", "b"], Operator::Gt, "10"),
                clause(&["a", "c"], Operator::Eq, "hello"),
            ]
        );
    }

    #[test]
    fn test_quoted() {
        assert_eq!(
            parse_query("\" a \":\" hello \"").unwrap().clauses,
            vec![clause(&[" a "], Operator::Eq, " hello ")]
        );
    }

    #[test]
    fn test_quoted_segment_keeps_dot() {
        assert_eq!(
            parse_query("\"a.b\".c:1").unwrap().clauses,
            vec![clause(&["a.b", "c"], Operator::Eq, "1")]
        );
    }

    #[test]
    fn test_surrounding_spaces() {
        assert_eq!(
            parse_query(" a:hello ").unwrap().clauses,
            vec![clause(&["a"], Operator::Eq, "hello")]
        );
    }

    #[test]
    fn test_empty_query_has_no_clauses() {
        assert!(parse_query("").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_queries() {
        for input in ["a", "a:", ":1", "a:<", "a:\"\"", "a:1 b", "   ", "a:\"open", "a:1:2"] {
            let err = parse_query(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidQuery, "input {:?}", input);
        }
    }
}
