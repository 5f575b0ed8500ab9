//! Catalog of node JSON-RPC method names used by the wallet.
//!
//! The supervisor does not depend on this; it is shared with RPC clients so
//! method names are spelled in exactly one place.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unknown RPC method name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown RPC method '{0}'")]
pub struct UnknownRpcMethod(pub String);

macro_rules! rpc_methods {
    ($($variant:ident => $wire:literal),* $(,)?) => {
        /// A node JSON-RPC method.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum RpcMethod {
            $(
                #[serde(rename = $wire)]
                $variant,
            )*
        }

        impl RpcMethod {
            /// Every method, in catalog order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Wire name sent in the `method` field.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)*
                }
            }
        }

        impl FromStr for RpcMethod {
            type Err = UnknownRpcMethod;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)*
                    other => Err(UnknownRpcMethod(other.to_string())),
                }
            }
        }
    };
}

rpc_methods! {
    GetBlockchainInfo => "getblockchaininfo",
    SendToAddress => "sendtoaddress",
    SendMany => "sendmany",
    ValidateAddress => "validateaddress",
    ListReceivedByAddress => "listreceivedbyaddress",
    GetNewAddress => "getnewaddress",
    GetBlock => "getblock",
    GetBlockHash => "getblockhash",
    GetBalance => "getbalance",
    GetBlockCount => "getblockcount",
    GetPeerInfo => "getpeerinfo",
    ListTransactions => "listtransactions",
    GetWalletInfo => "getwalletinfo",
    GetBalances => "getbalances",
    GetRawTransaction => "getrawtransaction",
    ListUnspent => "listunspent",
    WalletCreateFundedPsbt => "walletcreatefundedpsbt",
    WalletProcessPsbt => "walletprocesspsbt",
    FinalizePsbt => "finalizepsbt",
    DecodeRawTransaction => "decoderawtransaction",
    CreateMasternode => "createmasternode",
    CreateToken => "createtoken",
    MintTokens => "minttokens",
    UpdateToken => "updatetoken",
    ListMasternodes => "listmasternodes",
    ListTokens => "listtokens",
    DestroyToken => "destroytoken",
    GetAccount => "getaccount",
    ListAccounts => "listaccounts",
    ResignMasternode => "resignmasternode",
    GetToken => "gettoken",
    GetTokenBalances => "gettokenbalances",
    DumpPrivKey => "dumpprivkey",
    ImportPrivKey => "importprivkey",
    GetAddressInfo => "getaddressinfo",
    Stop => "stop",
    DumpWallet => "dumpwallet",
    BackupWallet => "backupwallet",
    ImportWallet => "importwallet",
    AccountToAccount => "accounttoaccount",
    SendTokensToAddress => "sendtokenstoaddress",
    AccountToUtxos => "accounttoutxos",
    UtxosToAccount => "utxostoaccount",
    GetTransaction => "gettransaction",
    SetLabel => "setlabel",
    SetHdSeed => "sethdseed",
    GetReceivedByAddress => "getreceivedbyaddress",
    EncryptWallet => "encryptwallet",
    WalletPassphrase => "walletpassphrase",
    WalletLock => "walletlock",
    ImportPubKey => "importpubkey",
    ImportAddress => "importaddress",
    WalletPassphraseChange => "walletpassphrasechange",
    ListPoolPairs => "listpoolpairs",
    ListPoolShares => "listpoolshares",
    GetPoolPair => "getpoolpair",
    AddPoolLiquidity => "addpoolliquidity",
    PoolSwap => "poolswap",
    RemovePoolLiquidity => "removepoolliquidity",
    TestPoolSwap => "testpoolswap",
    GetGov => "getgov",
    ListAccountHistory => "listaccounthistory",
    AccountHistoryCount => "accounthistorycount",
    CreateWallet => "createwallet",
    SendRawTransaction => "sendrawtransaction",
    CreateRawTransaction => "createrawtransaction",
}

impl std::fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
