pub mod clock;
pub mod editor;
pub mod errors;
pub mod services;
pub mod utils;
