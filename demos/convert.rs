//! Converting documents between formats.
//!
//! Run with: cargo run --example convert
//!
//! Or convert stdin: cargo run --example convert -- yaml json < config.yaml

use serde_datafmt::{
    csv_by_column, csv_by_row, decode, encode, to_json_pretty, to_toml, value, CsvOptions,
    Format,
};
use std::error::Error;
use std::io::Read;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [from, to] = args.as_slice() {
        let (from, to) = (from.parse::<Format>()?, to.parse::<Format>()?);
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        print!("{}", encode(to, &decode(from, &input)?)?);
        return Ok(());
    }

    let yaml = "\
service: gateway
replicas: 3
ports:
- 80
- 443
deployed: 2024-03-01T09:30:00Z
";
    let value = decode(Format::Yaml, yaml)?;
    println!("YAML -> JSON:\n{}\n", to_json_pretty("  ", &value)?);
    println!("YAML -> TOML:\n{}", to_toml(&value)?);

    // Positional arguments work like a template call: delimiter, header, data
    let (options, data) = CsvOptions::from_args(&[";", "host;port", "a.local;80\nb.local;8080"])?;
    println!("CSV by row:\n{}\n", encode(Format::Json, &csv_by_row(data, &options)?)?);
    println!("CSV by column:\n{}\n", encode(Format::Json, &csv_by_column(data, &options)?)?);

    let table = value!([["name", "size"], ["alpha", 1], ["beta", 2]]);
    println!("Back to CSV:\n{}", encode(Format::Csv, &table)?);

    Ok(())
}
