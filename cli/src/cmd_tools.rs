//! `evmkit address | keccak | units | hex | number`

use anyhow::{bail, Result};
use evmkit_evm::{
    analyze_address, compute_keccak,
    convert::{decimal_to_hex, hex_to_decimal, hex_to_text, text_to_hex},
    convert_units, HashMode, Unit,
};

use crate::input::print_json;

pub fn address(input: &str, json: bool) -> Result<()> {
    let report = analyze_address(input);
    if json {
        return print_json(&report);
    }
    match (&report.checksum, &report.error) {
        (Some(checksum), _) => {
            println!("Valid:    ✓");
            println!("Checksum: {checksum}");
            if report.already_checksummed == Some(false) {
                println!("(input was not checksummed)");
            }
            Ok(())
        }
        (None, Some(error)) => bail!("invalid address: {error}"),
        (None, None) => bail!("invalid address"),
    }
}

pub fn keccak(input: &str, mode: HashMode, strip_whitespace: bool, json: bool) -> Result<()> {
    let hash = compute_keccak(input, mode, strip_whitespace)?;
    if json {
        return print_json(&serde_json::json!({ "hash": hash }));
    }
    println!("{hash}");
    Ok(())
}

pub fn units(amount: &str, unit: Unit, hex_as_wei: bool, json: bool) -> Result<()> {
    let values = convert_units(amount, unit, hex_as_wei)?;
    if json {
        return print_json(&values);
    }
    println!("wei:   {}", values.wei);
    println!("gwei:  {}", values.gwei);
    println!("ether: {}", values.ether);
    Ok(())
}

pub fn hex(input: &str, decode: bool, json: bool) -> Result<()> {
    let conversion = if decode {
        hex_to_text(input)?
    } else {
        text_to_hex(input)
    };
    if json {
        return print_json(&conversion);
    }
    if decode {
        println!("{}", conversion.text);
    } else {
        println!("{}", conversion.hex);
    }
    println!("({} bytes)", conversion.byte_length);
    Ok(())
}

pub fn number(input: &str, from_hex: bool, json: bool) -> Result<()> {
    let conversion = if from_hex {
        hex_to_decimal(input)?
    } else {
        decimal_to_hex(input)?
    };
    if json {
        return print_json(&conversion);
    }
    println!("decimal: {}", conversion.decimal);
    println!("hex:     {}", conversion.hex);
    Ok(())
}
