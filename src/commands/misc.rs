//! Public `misc` endpoints

use std::path::PathBuf;

use colored::Colorize;
use jutge_api_client::output::OutputMode;
use jutge_api_client::{Built, JutgeApiClient};
use serde::Serialize;

/// Print the server time
pub fn time(mode: OutputMode) -> anyhow::Result<()> {
    let mut client = JutgeApiClient::new()?;
    let time = client.misc().get_time()?;
    match (&time, mode) {
        (Built::Typed(t), OutputMode::Human) => println!("{}", t.full_time),
        _ => print_built(&time, mode)?,
    }
    Ok(())
}

/// Print a fortune cookie
pub fn fortune(mode: OutputMode) -> anyhow::Result<()> {
    let mut client = JutgeApiClient::new()?;
    print_built(&client.misc().get_fortune()?, mode)
}

/// Print homepage statistics
pub fn stats(mode: OutputMode) -> anyhow::Result<()> {
    let mut client = JutgeApiClient::new()?;
    let stats = client.misc().get_homepage_stats()?;
    match (&stats, mode) {
        (Built::Typed(s), OutputMode::Human) => {
            println!("users:       {}", s.users.to_string().bold());
            println!("problems:    {}", s.problems.to_string().bold());
            println!("submissions: {}", s.submissions.to_string().bold());
            println!("exams:       {}", s.exams.to_string().bold());
            println!("contests:    {}", s.contests.to_string().bold());
        },
        _ => print_built(&stats, mode)?,
    }
    Ok(())
}

/// Download the logo
pub fn logo(output: Option<PathBuf>, mode: OutputMode) -> anyhow::Result<()> {
    let mut client = JutgeApiClient::new()?;
    let logo = client.misc().get_logo()?;
    let path = output.unwrap_or_else(|| PathBuf::from(super::attachment_name(logo.name())));
    logo.write(&path)?;

    if mode == OutputMode::Json {
        let json = serde_json::json!({
            "name": logo.name(),
            "type": logo.mime_type(),
            "bytes": logo.data().len(),
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!(
            "{} {} ({}, {} bytes)",
            "saved".green(),
            path.display(),
            logo.mime_type(),
            logo.data().len()
        );
    }
    Ok(())
}

fn print_built<T: Serialize>(built: &Built<T>, mode: OutputMode) -> anyhow::Result<()> {
    let text = match built {
        Built::Typed(value) => mode.render(value)?,
        Built::Raw(value) => {
            log::warn!("response did not match the expected shape");
            mode.render(value)?
        },
    };
    println!("{text}");
    Ok(())
}
