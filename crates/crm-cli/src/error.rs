use anyhow::Error;
use crm_api::ApiError;
use crm_config::ConfigError;
use crm_core::CoreError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Remote(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn remote_failure(message: impl Into<String>) -> Error {
    CliError::Remote(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::Remote(_) => EXIT_FAILURE,
            });
        }
        if let Some(api_err) = cause.downcast_ref::<ApiError>() {
            return ExitCode::from(api_exit_code(api_err));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn api_exit_code(err: &ApiError) -> u8 {
    match err {
        ApiError::Url(_) => EXIT_INVALID_INPUT,
        ApiError::Http(_) | ApiError::Status { .. } | ApiError::Decode(_) | ApiError::Core(_) => {
            EXIT_FAILURE
        }
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir | ConfigError::Read { .. } => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InvalidBaseUrl { .. }
        | ConfigError::InvalidTimeout { .. }
        | ConfigError::EmptyUserAgent
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}
