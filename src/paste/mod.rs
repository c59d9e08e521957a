pub mod batch;
pub mod controller;

pub use batch::{BlockStyles, PasteBatch};
pub use controller::PasteController;
