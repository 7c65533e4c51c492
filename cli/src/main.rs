//! EvmKit CLI: calldata, typed data and signature tools from the terminal.
//!
//! # Commands
//! ```text
//! evmkit functions       --abi <file|json>
//! evmkit selector        <signature>
//! evmkit encode-call     (--signature <sig> | --abi <file|json> --function <key>) [ARGS]...
//! evmkit decode-call     (--signature <sig> | --abi <file|json> [--function <key>]) --calldata <hex>
//! evmkit typed-hash      (--payload <file|json> | --domain .. --types .. --message ..)
//! evmkit typed-verify    <typed inputs> --signature <hex> [--expected <addr>]
//! evmkit personal-hash   <message> [--hex]
//! evmkit personal-verify <message> --signature <hex> [--expected <addr>] [--hex]
//! evmkit recover         --digest <hex> (--signature <hex> | --r <hex> --s <hex> (--v <n> | --y-parity <n>))
//! evmkit address         <address>
//! evmkit keccak          <input> [--hex] [--strip-whitespace]
//! evmkit units           <amount> [--unit ether] [--hex-as-wei]
//! evmkit hex             <input> [--decode]
//! evmkit number          <input> [--from-hex]
//! evmkit info
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use evmkit_evm::{HashMode, Unit};
use evmkit_observability::{init_tracing, LogConfig};

mod cmd_abi;
mod cmd_sign;
mod cmd_tools;
mod cmd_typed;
mod input;

#[derive(Parser)]
#[command(
    name = "evmkit",
    about = "EVM developer utilities: ABI calldata, EIP-712, personal_sign and friends",
    long_about = "
EvmKit CLI: encode and decode function calldata, hash and verify EIP-712
typed data and personal_sign messages, recover signers, and convert
addresses, units and hex.

Arguments that take ABI or JSON documents accept either a file path or the
JSON text itself.

ENVIRONMENT VARIABLES:
  EVMKIT_LOG    Log filter directive, e.g. 'warn,evmkit_evm=debug'
",
    version
)]
struct Cli {
    /// Print structured JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log level or filter directive
    #[arg(long, global = true, env = "EVMKIT_LOG", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where a function comes from: an inline signature or an ABI lookup.
#[derive(clap::Args)]
pub struct FunctionSource {
    /// Human-readable signature, e.g. 'transfer(address to, uint256 amount)'
    #[arg(long, conflicts_with = "abi")]
    signature: Option<String>,
    /// ABI JSON array (file path or inline JSON)
    #[arg(long)]
    abi: Option<String>,
    /// Function name, canonical signature or selector within --abi
    #[arg(long, requires = "abi")]
    function: Option<String>,
}

/// The three typed-data sections, or a full v4 payload.
#[derive(clap::Args)]
pub struct TypedSource {
    /// Full eth_signTypedData_v4 payload {types, primaryType, domain, message}
    #[arg(long, conflicts_with_all = ["domain", "types", "message"])]
    payload: Option<String>,
    /// Domain object (file path or inline JSON)
    #[arg(long, requires_all = ["types", "message"])]
    domain: Option<String>,
    /// Types object (file path or inline JSON)
    #[arg(long)]
    types: Option<String>,
    /// Message object (file path or inline JSON)
    #[arg(long)]
    message: Option<String>,
    /// Primary type; defaults to the first declared non-domain type
    #[arg(long, conflicts_with = "payload")]
    primary_type: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the functions of an ABI with their selectors
    Functions {
        /// ABI JSON array (file path or inline JSON)
        #[arg(long)]
        abi: String,
    },

    /// Canonical form and selector of a function signature
    Selector {
        signature: String,
    },

    /// Encode a function call to ABI calldata
    #[command(name = "encode-call")]
    EncodeCall {
        #[command(flatten)]
        source: FunctionSource,
        /// One raw value per parameter; arrays and tuples as JSON
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Decode calldata into display values
    #[command(name = "decode-call")]
    DecodeCall {
        #[command(flatten)]
        source: FunctionSource,
        /// Calldata hex (selector included unless --args-only)
        #[arg(long)]
        calldata: String,
        /// Calldata has no 4-byte selector
        #[arg(long)]
        args_only: bool,
    },

    /// EIP-712 type string, domain separator, struct hash and digest
    #[command(name = "typed-hash")]
    TypedHash {
        #[command(flatten)]
        source: TypedSource,
    },

    /// Recover the signer of EIP-712 typed data
    #[command(name = "typed-verify")]
    TypedVerify {
        #[command(flatten)]
        source: TypedSource,
        /// 65-byte signature hex
        #[arg(long)]
        signature: String,
        /// Address the signer should match
        #[arg(long)]
        expected: Option<String>,
    },

    /// EIP-191 personal_sign digest of a message
    #[command(name = "personal-hash")]
    PersonalHash {
        message: String,
        /// Message is hex bytes rather than text
        #[arg(long)]
        hex: bool,
    },

    /// Recover the signer of a personal_sign message
    #[command(name = "personal-verify")]
    PersonalVerify {
        message: String,
        #[arg(long)]
        signature: String,
        #[arg(long)]
        expected: Option<String>,
        #[arg(long)]
        hex: bool,
    },

    /// Recover a signer from a raw 32-byte digest
    Recover {
        /// 32-byte digest hex
        #[arg(long)]
        digest: String,
        /// Combined 65-byte signature
        #[arg(long, conflicts_with_all = ["r", "s"], required_unless_present_all = ["r", "s"])]
        signature: Option<String>,
        #[arg(long, requires = "s")]
        r: Option<String>,
        #[arg(long, requires = "r")]
        s: Option<String>,
        /// Recovery byte: 0, 1, 27 or 28
        #[arg(long, conflicts_with = "y_parity")]
        v: Option<u64>,
        /// EIP-2098 style parity: 0 or 1
        #[arg(long)]
        y_parity: Option<u8>,
    },

    /// Validate an address and compute its EIP-55 checksum
    Address {
        address: String,
    },

    /// Keccak256 of text or hex bytes
    Keccak {
        #[arg(allow_hyphen_values = true)]
        input: String,
        /// Input is hex bytes rather than text
        #[arg(long)]
        hex: bool,
        /// Strip whitespace from hex input before decoding
        #[arg(long, requires = "hex")]
        strip_whitespace: bool,
    },

    /// Convert an amount between wei, gwei and ether
    Units {
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Unit of the input amount
        #[arg(long, default_value = "ether")]
        unit: Unit,
        /// Read 0x input as a wei amount regardless of --unit
        #[arg(long)]
        hex_as_wei: bool,
    },

    /// UTF-8 text to hex, or hex back to text with --decode
    Hex {
        input: String,
        #[arg(long)]
        decode: bool,
    },

    /// Decimal to hex, or hex to decimal with --from-hex
    Number {
        #[arg(allow_hyphen_values = true)]
        input: String,
        #[arg(long)]
        from_hex: bool,
    },

    /// Show EvmKit build and capability info
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log = LogConfig::default()
        .with_level(cli.log_level.as_str())
        .with_json(cli.log_json);
    init_tracing(&log)?;

    let json = cli.json;
    match cli.command {
        Commands::Functions { abi } => cmd_abi::functions(&abi, json),
        Commands::Selector { signature } => cmd_abi::selector(&signature, json),
        Commands::EncodeCall { source, args } => cmd_abi::encode_call(&source, &args, json),
        Commands::DecodeCall {
            source,
            calldata,
            args_only,
        } => cmd_abi::decode_call(&source, &calldata, args_only, json),

        Commands::TypedHash { source } => cmd_typed::hash(&source, json),
        Commands::TypedVerify {
            source,
            signature,
            expected,
        } => cmd_typed::verify(&source, &signature, expected.as_deref(), json),

        Commands::PersonalHash { message, hex } => cmd_sign::personal_hash(&message, hex, json),
        Commands::PersonalVerify {
            message,
            signature,
            expected,
            hex,
        } => cmd_sign::personal_verify(&message, &signature, expected.as_deref(), hex, json),
        Commands::Recover {
            digest,
            signature,
            r,
            s,
            v,
            y_parity,
        } => cmd_sign::recover(
            &digest,
            cmd_sign::SignatureArgs {
                signature,
                r,
                s,
                v,
                y_parity,
            },
            json,
        ),

        Commands::Address { address } => cmd_tools::address(&address, json),
        Commands::Keccak {
            input,
            hex,
            strip_whitespace,
        } => {
            let mode = if hex { HashMode::Hex } else { HashMode::Text };
            cmd_tools::keccak(&input, mode, strip_whitespace, json)
        }
        Commands::Units {
            amount,
            unit,
            hex_as_wei,
        } => cmd_tools::units(&amount, unit, hex_as_wei, json),
        Commands::Hex { input, decode } => cmd_tools::hex(&input, decode, json),
        Commands::Number { input, from_hex } => cmd_tools::number(&input, from_hex, json),
        Commands::Info => cmd_info(),
    }
}

fn cmd_info() -> Result<()> {
    println!("EvmKit v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Capabilities:");
    println!("  ✓ ABI calldata encode/decode   (nested arrays and tuples)");
    println!("  ✓ ABI JSON function listing    (alloy-json-abi)");
    println!("  ✓ EIP-712 typed data           (hash + signer recovery)");
    println!("  ✓ EIP-191 personal_sign        (text or hex messages)");
    println!("  ✓ Raw digest recovery          (k256, low-s only)");
    println!("  ✓ EIP-55 address checksums");
    println!("  ✓ Unit, hex and number conversion");
    println!();
    println!("Bindings:");
    println!("  wasm:   evmkit-wasm  (wasm-bindgen, JSON string API)");
    Ok(())
}
