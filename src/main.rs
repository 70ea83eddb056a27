use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod commands;
mod config;
mod core;
mod dispatch;
mod display;
mod input;
mod plan;
mod protocol;
mod providers;
mod utils;

use crate::app::Application;
use crate::cli::Args;
use crate::commands::create_command_registry;
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::providers::factory::ProviderFactory;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            display::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let dispatcher = Dispatcher::new(ProviderFactory::new());
    let command_dispatcher = create_command_registry();

    let result = Application::new(args, config, dispatcher, command_dispatcher);
    let mut application = match result {
        Ok(application) => application,
        Err(e) => {
            display::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    if let Err(e) = application.run().await {
        display::display_error(&e.to_string());
        std::process::exit(1);
    }
}
