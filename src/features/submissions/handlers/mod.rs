pub mod submission_handler;

pub use submission_handler::{__path_save_location, save_location};
