//! Generic API call

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use jutge_api_client::JutgeApiClient;
use jutge_api_client::output::OutputMode;
use serde_json::Value;

/// Call `func` with a JSON input, optionally logged in
pub fn call(
    func: &str,
    input: Option<&str>,
    files: &[PathBuf],
    login: Option<(String, String)>,
    dir: &Path,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let input: Value = match input {
        Some(text) => serde_json::from_str(text).context("--input is not valid JSON")?,
        None => Value::Null,
    };

    let mut opened = files
        .iter()
        .map(|path| File::open(path).with_context(|| format!("cannot open {}", path.display())))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let mut ifiles: Vec<&mut dyn Read> = opened.iter_mut().map(|f| -> &mut dyn Read { f }).collect();

    let mut client = JutgeApiClient::new()?;
    if let Some((email, password)) = login {
        client.login(&email, &password)?;
    }
    let result = client.execute(func, input, &mut ifiles);
    if client.is_authenticated() {
        client.logout(true)?;
    }
    let (output, ofiles) = result?;

    println!("{}", mode.render(&output)?);
    for file in &ofiles {
        // keep attachments inside `dir` whatever name the server sent
        let path = dir.join(super::attachment_name(file.name()));
        file.write(&path)?;
        if mode == OutputMode::Human {
            eprintln!("{} {} ({})", "saved".green(), path.display(), file.mime_type());
        }
    }
    Ok(())
}
