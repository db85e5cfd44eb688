use serde::{Deserialize, Serialize};
use std::fmt;

use crate::index::flatten::{path_key, path_value_key};

/// Comparison applied by a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Eq, // field text equals the literal
    Lt, // numeric, strict
    Gt, // numeric, strict
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Gt => ">",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One `path op value` unit of a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub path: Vec<String>,
    pub op: Operator,
    pub value: String,
}

impl Clause {
    pub fn new<P, S>(path: P, op: Operator, value: impl Into<String>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Clause {
            path: path.into_iter().map(Into::into).collect(),
            op,
            value: value.into(),
        }
    }

    /// Key probed in the index for this clause. Relational clauses can only
    /// be narrowed by field presence.
    pub fn index_key(&self) -> String {
        match self.op {
            Operator::Eq => path_value_key(&self.path, &self.value),
            Operator::Lt | Operator::Gt => path_key(&self.path),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            Operator::Eq => "",
            other => other.symbol(),
        };
        write!(f, "{}:{}{}", self.path.join("."), op, self.value)
    }
}

/// Implicit AND over its clauses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub clauses: Vec<Clause>,
}

impl Query {
    pub fn new(clauses: Vec<Clause>) -> Self {
        Query { clauses }
    }

    pub fn with_clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clause> {
        self.clauses.iter()
    }
}
