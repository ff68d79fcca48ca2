//! Console surface: the interactive loop, the message pretty-printer and the
//! verbose echo around the model.

pub mod echo;
pub mod printer;
pub mod repl;

pub use echo::EchoingModel;
pub use repl::{ConsoleLoop, EXIT_SENTINEL};
