// Core modules implementing extraction, repair, stream splitting, and error modeling.
pub mod error;
pub mod extract;
pub mod repair;
pub mod stream;
