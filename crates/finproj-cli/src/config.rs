use finproj_core::EngineConfig;
use std::fs;
use std::path::Path;

/// Load the engine configuration, falling back to defaults when no file is given.
///
/// `.yaml` / `.yml` files are read as YAML, anything else as JSON. Omitted
/// keys keep their default value.
pub fn load_engine_config(path: Option<&str>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config '{}': {}", path, e))?;

    let config: EngineConfig = if is_yaml(path) {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config '{}': {}", path, e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse config '{}': {}", path, e))?
    };

    config.validate()?;
    tracing::debug!(path, tax_rate = %config.tax_rate, "loaded engine config");
    Ok(config)
}

fn is_yaml(path: &str) -> bool {
    matches!(
        Path::new(path).extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
