//! Bearer credential validation.

mod validator;


pub use validator::{Claims, TokenValidator};
