//! Layered case-insensitive symbol resolution.
//!
//! Lookup precedence is fixed: user `#define`s filtered to the current
//! source file, then the engine constants, the slot enum, the static enum,
//! and finally each plugin's constant table in plugin discovery order. A
//! plugin hit reports the plugin id bound to that plugin's base name
//! (0 while unbound).

use std::collections::HashMap;

/// The process-wide symbol table. Mutated only by the resolver side of the
/// parser; read by the evaluator and the classic compiler.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// `(file, name)` → value, both keys uppercased.
    defines: HashMap<(String, String), i32>,
    engine: HashMap<String, i32>,
    slots: HashMap<String, i32>,
    statics: HashMap<String, i32>,
    /// `(base name, constants)` per discovered plugin, discovery order.
    plugin_layers: Vec<(String, HashMap<String, i32>)>,
    /// Base name → declared plugin id (`#define @name id` / `Plugin=`).
    plugin_ids: HashMap<String, u16>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the engine constants catalog.
    pub fn set_engine_constants(&mut self, map: HashMap<String, i32>) {
        self.engine = map;
    }

    /// Install the slot enum catalog.
    pub fn set_slot_enum(&mut self, map: HashMap<String, i32>) {
        self.slots = map;
    }

    /// Install the static enum catalog.
    pub fn set_static_enum(&mut self, map: HashMap<String, i32>) {
        self.statics = map;
    }

    /// Append one plugin constants layer. Call order is discovery order.
    pub fn add_plugin_layer(&mut self, base_name: &str, constants: HashMap<String, i32>) {
        self.plugin_layers
            .push((base_name.to_ascii_uppercase(), constants));
    }

    /// Record a user `#define` scoped to its source file. A redefinition in
    /// the same file overwrites.
    pub fn define_user(&mut self, file: &str, name: &str, value: i32) {
        self.defines.insert(
            (file.to_ascii_uppercase(), name.to_ascii_uppercase()),
            value,
        );
    }

    /// Bind a plugin base name to its declared id.
    pub fn bind_plugin_id(&mut self, base_name: &str, id: u16) {
        self.plugin_ids.insert(base_name.to_ascii_uppercase(), id);
    }

    /// The id currently bound to a plugin base name.
    pub fn plugin_id(&self, base_name: &str) -> Option<u16> {
        self.plugin_ids
            .get(&base_name.to_ascii_uppercase())
            .copied()
    }

    /// True if any plugin already has this id bound.
    pub fn plugin_id_in_use(&self, id: u16) -> bool {
        self.plugin_ids.values().any(|&v| v == id)
    }

    /// `#define @plugins clear`: drop every name-to-id binding.
    pub fn clear_plugin_ids(&mut self) {
        self.plugin_ids.clear();
    }

    /// Resolve a name. Returns `(value, plugin_id)`; plugin id is 0 except
    /// for hits inside a plugin constants layer.
    pub fn lookup(&self, name: &str, current_file: &str) -> Option<(i32, u16)> {
        let key = name.to_ascii_uppercase();
        if let Some(&v) = self
            .defines
            .get(&(current_file.to_ascii_uppercase(), key.clone()))
        {
            return Some((v, 0));
        }
        if let Some(&v) = self.engine.get(&key) {
            return Some((v, 0));
        }
        if let Some(&v) = self.slots.get(&key) {
            return Some((v, 0));
        }
        if let Some(&v) = self.statics.get(&key) {
            return Some((v, 0));
        }
        for (base, constants) in &self.plugin_layers {
            if let Some(&v) = constants.get(&key) {
                let id = self.plugin_ids.get(base).copied().unwrap_or(0);
                return Some((v, id));
            }
        }
        None
    }
}
