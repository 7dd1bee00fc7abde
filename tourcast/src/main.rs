use clap::Parser;
use tourcast::app::cli_args::CliArgs;

fn main() {
    env_logger::init();

    log::debug!("cwd: {:?}", std::env::current_dir());
    let args = CliArgs::parse();
    match tourcast::app::run::command_line_runner(&args) {
        Ok(_) => {}
        Err(e) => log::error!("{e}"),
    }
}
