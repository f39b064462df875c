mod codegen;
mod commands;
mod config;
mod cpp_ast;
mod image;
mod manifest;
mod options;
mod spritesheet;
mod symbol_name;

use std::process;

use structopt::StructOpt;

use crate::options::Options;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = Options::from_args();

    if let Err(err) = commands::pack(options) {
        eprintln!("Error: {:?}", err);
        process::exit(1);
    }
}
