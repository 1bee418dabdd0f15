use crate::commands::{print_json, Context};
use crate::error::{invalid_input, remote_failure};
use anyhow::Result;
use clap::{Args, Subcommand};
use crm_api::{AdminAction, AdminClient};
use serde::Serialize;

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Ask the backend to generate bulk test data
    Generate,
    /// Delete all customer data on the backend
    Reset(ResetArgs),
}

#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Confirm the reset; nothing is deleted without it
    #[arg(long)]
    pub yes: bool,
}

#[derive(Debug, Serialize)]
struct AdminOutput<'a, T: Serialize> {
    action: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a T>,
}

pub fn generate(ctx: &Context<'_>) -> Result<()> {
    let action = AdminAction::GenerateData;
    let client = AdminClient::new(&ctx.admin_options())?;
    if !ctx.json {
        eprintln!("{}", action.progress_message());
    }
    let report = client
        .generate_data()
        .map_err(|err| remote_failure(action.failure_message(&err)))?;
    let message = report.summary();
    if ctx.json {
        return print_json(&AdminOutput {
            action: "generate",
            message: &message,
            report: Some(&report),
        });
    }
    println!("{message}");
    Ok(())
}

pub fn reset(ctx: &Context<'_>, args: ResetArgs) -> Result<()> {
    if !args.yes {
        return Err(invalid_input(
            "reset deletes all customer data; pass --yes to confirm",
        ));
    }
    let action = AdminAction::ResetDatabase;
    let client = AdminClient::new(&ctx.admin_options())?;
    if !ctx.json {
        eprintln!("{}", action.progress_message());
    }
    let message = client
        .perform(action)
        .map_err(|err| remote_failure(action.failure_message(&err)))?;
    if ctx.json {
        return print_json(&AdminOutput::<()> {
            action: "reset",
            message: &message,
            report: None,
        });
    }
    println!("{message}");
    Ok(())
}
