//! CLI command implementations

pub mod config;
pub mod release;
pub mod status;
pub mod update;
pub mod watch;

pub use config::execute as config;
pub use release::execute as release;
pub use status::execute as status;
pub use update::execute as update;
pub use watch::execute as watch;
