// #![deny(warnings)]
#![warn(unused_extern_crates)]
// Enable some groups of clippy lints.
#![deny(clippy::suspicious)]
#![deny(clippy::perf)]
// Specific lints to enforce.
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::trivially_copy_pass_by_ref)]
#![deny(clippy::manual_let_else)]

mod config;

use clap::{Parser, Subcommand};
use config::Config;
use pghdb2json::{hdb2json, hdb2json_pretty, json2hdb_with, DecodeOptions};
use std::io;
use std::io::Read;
use std::path::PathBuf;
use tracing::error;

#[derive(Debug, clap::Parser)]
#[clap(about = "Convert HDB entries between pghdb JSON and base64 encoded DER")]
struct OptParser {
    /// TOML file with output and parsing defaults.
    #[clap(long, env = "PGHDB2JSON_CONFIG", global = true)]
    config: Option<PathBuf>,
    /// Indent the JSON written by hdb2json.
    #[clap(long, global = true)]
    pretty: bool,
    #[clap(subcommand)]
    command: Opt,
}

#[derive(Debug, Subcommand)]
enum Opt {
    /// Convert a JSON record to base64 encoded DER. Use - to read stdin.
    #[clap(name = "json2hdb")]
    Json2Hdb {
        #[clap(value_name = "JSON_TEXT")]
        text: String,
    },
    /// Convert base64 encoded DER to a JSON record. Use - to read stdin.
    #[clap(name = "hdb2json")]
    Hdb2Json {
        #[clap(value_name = "BASE64-ENCODED-DER-ENCODED")]
        text: String,
    },
}

fn read_input(text: &str) -> io::Result<String> {
    if text != "-" {
        return Ok(text.to_string());
    }
    let mut contents = String::new();
    io::stdin().read_to_string(&mut contents)?;
    Ok(contents.trim_end().to_string())
}

fn main() -> Result<(), ()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let opt = OptParser::parse();

    let cfg = match &opt.config {
        Some(path) => Config::parse(path).map_err(|e| {
            error!("Could not parse config file {:?}: {:?}", path, e);
        })?,
        None => Config::default(),
    };

    let options = DecodeOptions {
        default_realm: cfg.default_realm.clone(),
    };
    let pretty = opt.pretty || cfg.pretty;

    let (name, text) = match &opt.command {
        Opt::Json2Hdb { text } => ("json2hdb", text),
        Opt::Hdb2Json { text } => ("hdb2json", text),
    };

    let text = read_input(text).map_err(|e| {
        error!("Could not read input: {:?}", e);
    })?;

    let output = match opt.command {
        Opt::Json2Hdb { .. } => json2hdb_with(&text, &options),
        Opt::Hdb2Json { .. } if pretty => hdb2json_pretty(&text),
        Opt::Hdb2Json { .. } => hdb2json(&text),
    }
    .map_err(|e| {
        error!("{} failed: {}", name, e);
    })?;

    println!("{output}");
    Ok(())
}
