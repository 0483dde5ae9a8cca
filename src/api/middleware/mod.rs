pub mod errors;

pub use errors::unhandled_errors;
