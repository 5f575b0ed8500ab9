//! Subcommand definitions.

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the node and stream lifecycle events until it exits
    ///
    /// Each event is printed as one JSON line. Ctrl-C stops the node and
    /// waits for it to exit.
    Start {
        /// Node option as key=value, or a bare key for a flag (repeatable)
        #[arg(short = 'p', long = "param", value_name = "KEY[=VALUE]")]
        params: Vec<String>,
    },
    /// Terminate every running node process
    Stop,
    /// List running node processes
    Status,
    /// Show resolved data, binary and config paths
    Paths,
    /// List the RPC methods the wallet calls on the node
    RpcMethods {
        /// Print the catalog as a JSON array
        #[arg(long)]
        json: bool,
    },
}
