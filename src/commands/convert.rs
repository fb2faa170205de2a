//! JSON/YAML conversion

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use jutge_api_client::util;

use crate::cli::Direction;

/// Convert a file (or stdin) between JSON and YAML
pub fn convert(direction: Direction, file: Option<&Path>) -> anyhow::Result<()> {
    let text = match file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        },
    };

    let converted = match direction {
        Direction::JsonToYaml => util::json_to_yaml(&text)?,
        Direction::YamlToJson => util::yaml_to_json(&text)?,
    };
    print!("{converted}");
    if direction == Direction::YamlToJson {
        println!();
    }
    Ok(())
}
