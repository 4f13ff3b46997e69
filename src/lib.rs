//! Cross-crate integration tests for the respool workspace live in `tests/`.
