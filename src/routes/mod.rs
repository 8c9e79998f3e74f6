pub mod notes;

pub use notes::configure_notes_routes;
