use flotilla_sim::SimConfig;

pub fn run() -> Result<(), String> {
    let json = serde_json::to_string_pretty(&SimConfig::default())
        .map_err(|e| format!("failed to serialize config: {e}"))?;
    println!("{json}");
    Ok(())
}
