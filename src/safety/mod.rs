//! Statement classification for generated SQL.
//!
//! Parses SQL and sorts each statement into safe, mutating, or destructive so
//! that generated statements which would change the database can be refused
//! before they run.

mod parser;

pub use parser::SqlClassifier;

use std::fmt;

/// How much a statement can change the database, in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SafetyLevel {
    /// Read-only queries (SELECT, EXPLAIN).
    Safe,
    /// Data modification queries (INSERT, UPDATE).
    Mutating,
    /// Data loss or schema changes (DELETE, DROP, ALTER, CREATE, PRAGMA, ...).
    Destructive,
}

impl SafetyLevel {
    /// Returns true if statements at this level only read data.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Safe)
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "Safe"),
            Self::Mutating => write!(f, "Mutating"),
            Self::Destructive => write!(f, "Destructive"),
        }
    }
}

/// The kind of statement found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Drop,
    Alter,
    Create,
    Explain,
    /// Several statements; holds the kind of the most dangerous one.
    Multiple(Box<StatementType>),
    Unknown,
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Drop => write!(f, "DROP"),
            Self::Alter => write!(f, "ALTER"),
            Self::Create => write!(f, "CREATE"),
            Self::Explain => write!(f, "EXPLAIN"),
            Self::Multiple(inner) => write!(f, "Multiple ({})", inner),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Level and kind of a parsed statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub level: SafetyLevel,
    pub statement_type: StatementType,
}

impl Classification {
    pub fn new(level: SafetyLevel, statement_type: StatementType) -> Self {
        Self {
            level,
            statement_type,
        }
    }

    /// A plain read-only SELECT.
    pub(crate) fn select() -> Self {
        Self::new(SafetyLevel::Safe, StatementType::Select)
    }

    /// Returns true if the statement only reads data.
    pub fn is_read_only(&self) -> bool {
        self.level.is_read_only()
    }

    /// Keeps whichever of the two is more dangerous; ties keep `self`.
    pub(crate) fn most_dangerous(self, other: Self) -> Self {
        if other.level > self.level {
            other
        } else {
            self
        }
    }
}
