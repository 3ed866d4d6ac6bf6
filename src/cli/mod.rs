//! Command line interface of the `typedkvs` binary.

pub mod compile;
pub mod delete;
pub mod get;
pub mod index;
pub mod set;

mod root;
pub use root::{initializer, parse, ClientOptions, Command, TypedkvsCommand};
