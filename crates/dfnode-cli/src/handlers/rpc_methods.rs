//! RPC catalog handler.

use dfnode_core::RpcMethod;

use crate::error::CliError;

/// Print every RPC method name, one per line or as a JSON array.
pub fn execute(json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(&RpcMethod::ALL)?);
    } else {
        for method in RpcMethod::ALL {
            println!("{method}");
        }
    }
    Ok(())
}
