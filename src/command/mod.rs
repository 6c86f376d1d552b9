pub mod compiler;
pub mod switches;

pub use compiler::{CompiledCommand, DEFAULT_FILETYPE, Destination, compile};
pub use switches::{Arg, Switches};
