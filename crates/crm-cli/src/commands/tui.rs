use anyhow::{anyhow, Result};
use clap::Args;
use std::env;
use std::path::PathBuf;
use std::process::Command;

const TUI_BINARY: &str = "crm-tui";

#[derive(Debug, Args)]
pub struct TuiArgs {
    /// Start with the built-in sample customers instead of the endpoint
    #[arg(long)]
    pub offline: bool,
}

pub fn launch(
    config_path: Option<PathBuf>,
    api_url: Option<String>,
    args: TuiArgs,
    verbose: bool,
) -> Result<()> {
    let binary = find_tui_binary();
    if verbose {
        eprintln!("tui: {}", binary.display());
    }
    let mut command = Command::new(&binary);
    if let Some(path) = config_path {
        command.arg("--config").arg(path);
    }
    if let Some(url) = api_url {
        command.arg("--api-url").arg(url);
    }
    if args.offline {
        command.arg("--offline");
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        let err = command.exec();
        Err(exec_error(err))
    }

    #[cfg(not(unix))]
    {
        use anyhow::Context as _;
        let status = command
            .status()
            .with_context(|| format!("launch {TUI_BINARY}"))?;
        std::process::exit(status.code().unwrap_or(1));
    }
}

fn find_tui_binary() -> PathBuf {
    let name = format!("{TUI_BINARY}{}", env::consts::EXE_SUFFIX);
    env::current_exe()
        .ok()
        .and_then(|current| current.parent().map(|dir| dir.join(&name)))
        .filter(|candidate| candidate.is_file())
        .unwrap_or_else(|| PathBuf::from(name))
}

#[cfg_attr(not(unix), allow(dead_code))]
fn exec_error(err: std::io::Error) -> anyhow::Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        return anyhow!("{TUI_BINARY} not found; build it with `cargo build -p crm-tui`");
    }
    anyhow::Error::new(err).context(format!("launch {TUI_BINARY}"))
}
