use clap::{Parser, Subcommand};

/// Web editor for the scheduled-job table.
#[derive(Parser, Debug)]
#[command(name = "cronpad-gateway")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path (defaults to $CRONPAD_CONFIG, then ~/.cronpad/cronpad.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTTP API (default)
    Serve {
        /// Override gateway.bind
        #[arg(long)]
        bind: Option<String>,

        /// Override gateway.port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the current table as JSON entries and exit
    Show,
}
