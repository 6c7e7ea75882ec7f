//! Workflows behind the command-line interface

pub mod orchestration;

pub use orchestration::{run_notes_workflow, NotesOutcome, NotesWorkflowArgs, ReleaseNotes};
