pub mod clear;
pub mod find;
pub mod history;
pub mod ls;
pub mod pull;
pub mod read;
pub mod write;

pub use clear::{clear_command, recover_command, remove_command};
pub use find::find_command;
pub use history::{history_command, restore_command, revert_command};
pub use ls::ls_command;
pub use pull::{inherit_command, pull_command};
pub use read::read_command;
pub use write::write_command;
