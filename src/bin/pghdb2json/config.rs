use serde::Deserialize;
use std::fs;
use std::io;
use std::io::Read;
use std::path::Path;
use tracing::error;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Indent JSON output.
    #[serde(default)]
    pub pretty: bool,
    /// Realm given to shorthand principals that carry none.
    pub default_realm: Option<String>,
}

impl Config {
    pub fn parse<P: AsRef<Path>>(path: P) -> io::Result<Config> {
        let mut contents = String::new();
        let mut f = fs::File::open(&path)?;
        f.read_to_string(&mut contents)?;

        toml::from_str(&contents).map_err(|err| {
            error!(?err);
            io::Error::other("toml parse failure")
        })
    }
}
