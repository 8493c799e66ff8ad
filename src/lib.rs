pub mod cli;
pub mod client;
pub mod protocols;
pub mod view_info;
