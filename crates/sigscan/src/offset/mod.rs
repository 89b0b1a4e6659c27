mod collection;
mod resolver;
mod signature;

pub use collection::*;
pub use resolver::*;
pub use signature::*;
