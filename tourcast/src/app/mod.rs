pub mod cli_args;
pub mod error;
pub mod rows;
pub mod run;
pub mod run_config;
