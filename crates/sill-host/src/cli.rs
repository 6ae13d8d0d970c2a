use std::path::PathBuf;

use clap::Parser;

/// Privileged host process for the sill desktop shell.
#[derive(Parser, Debug)]
#[command(name = "sill-host", version, about)]
pub struct Cli {
    /// Suppress non-error log output
    #[arg(long)]
    pub quiet: bool,

    /// Override the bridge socket path (default: <sill_dir>/host.sock)
    #[arg(long)]
    pub socket: Option<PathBuf>,

    /// Override the presentation command from the config file
    #[arg(long)]
    pub presentation_command: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["sill-host"]);
        assert!(!cli.quiet);
        assert!(cli.socket.is_none());
        assert!(cli.presentation_command.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "sill-host",
            "--quiet",
            "--socket",
            "/tmp/test.sock",
            "--presentation-command",
            "renderer",
        ]);
        assert!(cli.quiet);
        assert_eq!(cli.socket, Some(PathBuf::from("/tmp/test.sock")));
        assert_eq!(cli.presentation_command.as_deref(), Some("renderer"));
    }
}
