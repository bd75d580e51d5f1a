//! Loading of bridge configs from TOML files.

use anyhow::Context;
use kona_bridge::BridgeConfig;
use std::path::Path;

/// Reads a [`BridgeConfig`] from the TOML file at `path`.
pub fn load_config(path: &Path) -> anyhow::Result<BridgeConfig> {
    tracing::debug!(target: "bridge", path = %path.display(), "Loading bridge config");
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read bridge config {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("Invalid bridge config {}", path.display()))
}

/// Parses a [`BridgeConfig`] from TOML.
pub fn parse_config(contents: &str) -> anyhow::Result<BridgeConfig> {
    Ok(toml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const SEPOLIA: &str = r#"
        l1_chain_id = 11155111
        l2_chain_id = 11155420

        [contracts]
        optimism_portal = "0x16fc5058f25648194471939df75cf27a2fdc48bc"
        l2_output_oracle = "0x90e9c4f8a994a250f6aefd61cafb4f2e895d458f"
        l1_standard_bridge = "0xfbb0621e0b23b5478b630bd55a5f21f67730b0f1"
    "#;

    #[test]
    fn test_parse_config() {
        let config = parse_config(SEPOLIA).unwrap();
        assert_eq!(config.l1_chain_id, 11155111);
        assert_eq!(config.l2_chain_id, 11155420);
        assert_eq!(
            config.contracts.optimism_portal,
            address!("0x16fc5058f25648194471939df75cf27a2fdc48bc")
        );
        assert_eq!(config.contracts.l2_to_l1_message_passer, kona_bridge::L2_TO_L1_MESSAGE_PASSER);
        assert_eq!(config.l1_min_gas_limit(0), 1_300_873);
    }

    #[test]
    fn test_parse_config_rejects_unknown_fields() {
        let contents = format!("{SEPOLIA}\nunknown = 1\n");
        assert!(parse_config(&contents).is_err());
    }

    #[test]
    fn test_load_missing_config() {
        let err = load_config(Path::new("/nonexistent/bridge.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read bridge config"));
    }
}
