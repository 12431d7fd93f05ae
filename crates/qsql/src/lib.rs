//! qsql: boolean search queries to SQL.
//!
//! qsql turns a query typed by a person (`rust or golang`, `(async or await) and tokio`) into a
//! parameterized SQL filter: a `WHERE`-clause fragment with one `LIKE ?` predicate per word and
//! the ordered list of values to bind. Word text is never spliced into the SQL.

#![warn(missing_docs)]

pub mod cli;
