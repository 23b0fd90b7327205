pub mod builtins;
pub mod external;
pub mod registry;

pub use external::{run_external_command, strip_newline};
pub use registry::{BuiltinCommand, CommandTable, ShellContext};
