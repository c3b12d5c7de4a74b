pub mod common;
pub mod completions;
pub mod lookup;
pub mod settings;
pub mod watch;
