//! User interface module - formatting of notes and status output.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_check_outcome, display_error, display_status,
    display_success, render_release_notes,
};
