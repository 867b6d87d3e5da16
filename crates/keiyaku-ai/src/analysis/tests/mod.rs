mod common;

mod catalog;
mod clauses;
mod scorer;
