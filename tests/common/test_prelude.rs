//! What the binary-driving tests need from `assert_cmd` and `predicates`.
pub use assert_cmd::Command;
pub use predicates::boolean::PredicateBooleanExt;
pub use predicates::str::contains;
