//! Whole-stack integration tests.

mod session;
mod undo_redo;
