//! Plugin descriptor handling.
//!
//! Plugins are discovered outside the core (the CLI scans the script
//! directory, mtime ascending) and handed in as [`PluginSource`]s. A
//! descriptor file contributes a constants layer to the resolver; a bare
//! shared library without a descriptor yields a synthetic, constant-less
//! descriptor when the script declares it via `Plugin=`.

use crate::catalog::parse_constants_text;
use std::collections::HashMap;

/// One discovered plugin as provided by the frontend, in discovery order.
#[derive(Debug, Clone)]
pub struct PluginSource {
    /// Base file name without extension, e.g. `plugin_trng`.
    pub base_name: String,
    /// Descriptor file text, when a descriptor was found.
    pub descriptor_text: Option<String>,
    /// A sibling shared library with the matching base name exists.
    pub has_library: bool,
}

/// A parsed plugin descriptor.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    pub base_name: String,
    pub constants: HashMap<String, i32>,
    /// Created for a bare library without a descriptor file.
    pub synthetic: bool,
}

impl PluginDescriptor {
    /// Parse a descriptor file (`NAME = value` constants).
    pub fn parse(base_name: &str, text: &str) -> Self {
        Self {
            base_name: base_name.to_string(),
            constants: parse_constants_text(text),
            synthetic: false,
        }
    }

    /// Descriptor stand-in for a bare shared library.
    pub fn synthetic(base_name: &str) -> Self {
        Self {
            base_name: base_name.to_string(),
            constants: HashMap::new(),
            synthetic: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_constants() {
        let d = PluginDescriptor::parse(
            "plugin_trng",
            "; exported constants\nTGROUP_ELEVATOR = $5A\nPARAM_BIG_NUMBERS = 12\n",
        );
        assert_eq!(d.base_name, "plugin_trng");
        assert_eq!(d.constants.get("TGROUP_ELEVATOR"), Some(&0x5A));
        assert_eq!(d.constants.get("PARAM_BIG_NUMBERS"), Some(&12));
        assert!(!d.synthetic);
    }

    #[test]
    fn test_synthetic_descriptor_is_empty() {
        let d = PluginDescriptor::synthetic("plugin_custom");
        assert!(d.constants.is_empty());
        assert!(d.synthetic);
    }
}
