use crate::core::system::System;
use crate::utils::logging::Logging;
use macros::log;
use std::process::ExitCode;

mod core;
mod interface;
mod model;
mod platform;
mod utils;

#[tokio::main]
async fn main() -> ExitCode {
    let _guard = Logging::initialize();

    let system = match System::new().await {
        Ok(system) => system,
        Err(err) => {
            log!(err);
            return ExitCode::FAILURE;
        }
    };
    let result = system.run().await;
    system.terminate().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log!(err);
            ExitCode::FAILURE
        }
    }
}
