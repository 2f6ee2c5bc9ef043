mod create_admin;
mod init;
mod seed;

pub use create_admin::cmd_create_admin;
pub use init::cmd_init;
pub use seed::cmd_seed;
