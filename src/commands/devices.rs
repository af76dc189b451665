//! Device listing command.

use anyhow::Result;

use crate::device;

/// Execute the devices command.
pub fn cmd_devices(json: bool) -> Result<()> {
    let records = device::list_devices()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No candidate devices found.");
        return Ok(());
    }

    println!("{:<12} {:<10} DESCRIPTION", "DEVICE", "SIZE");
    for record in &records {
        println!(
            "{:<12} {:<10} {}",
            record.identifier, record.size, record.description
        );
    }
    Ok(())
}
