//! NG command schema catalog.
//!
//! Each NG directive is described by one [`NgSchema`]: its tag code, the
//! ordered argument kinds, whether it may only appear in `[Options]`, and
//! its occurrence cap. The catalog drives both directive routing in the
//! parser and word emission in the compiler.

use std::collections::HashMap;

/// Highest valid item slot number accepted by [`NgArgKind::ItemSlot`].
pub const ITEM_SLOT_MAX: i64 = 464;

/// Pseudo-tag for the options-flags record embedded in the Options chunk.
pub const TAG_FLAGS_OPTION: u8 = 200;
/// Pseudo-tag for the level-flags record embedded in each Level chunk.
pub const TAG_FLAGS_LEVEL: u8 = 201;

/// Tag code of `TriggerGroup`.
pub const TAG_TRIGGER_GROUP: u8 = 21;
/// Tag code of `TriggerGroupWord`, the word-sized downgrade of `TriggerGroup`.
pub const TAG_TRIGGER_GROUP_WORD: u8 = 46;

/// Argument kind of one NG command argument.
///
/// At most one array kind is allowed per schema and it must be last: it
/// consumes every remaining actual argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NgArgKind {
    /// Unsigned 16-bit value, 1 word.
    Word,
    /// Signed 16-bit value, 1 word.
    Integer,
    /// Signed 32-bit value, 2 words (low, high).
    Long,
    /// Item slot number, 0–464, 1 word.
    ItemSlot,
    /// `ENABLED` / `DISABLED`. Never emitted: sets a bit in the group flags.
    Bool,
    /// String reference resolved to a table index, 1 word.
    String,
    /// Import-file id, 1 word.
    Import,
    /// Trailing run of 16-bit values, N words.
    Array,
    /// Trailing run of bytes: leading count byte, even-padded.
    ArrayByte,
    /// Trailing run of 4-bit values packed low-first: count byte, even-padded.
    ArrayNybble,
    /// Trailing run of 32-bit values, 2 words each.
    ArrayLong,
}

impl NgArgKind {
    /// True for the array kinds (which must terminate the argument list).
    pub fn is_array(self) -> bool {
        matches!(
            self,
            Self::Array | Self::ArrayByte | Self::ArrayNybble | Self::ArrayLong
        )
    }
}

/// Schema of one NG command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NgSchema {
    pub name: &'static str,
    /// Tag code placed in the high byte of the command header word.
    pub tag: u8,
    /// Ordered argument kinds.
    pub args: &'static [NgArgKind],
    /// Command is only legal inside `[Options]`.
    pub options_only: bool,
    /// Occurrence cap; −1 means unlimited. Level-scoped counters reset at
    /// every `[Level]`/`[Title]` boundary, Options counters persist.
    pub max_occurrences: i32,
    /// For Bool commands: the bit to set in the surrounding flags word.
    pub flag_bit: Option<u16>,
}

impl NgSchema {
    /// True if the command never emits words and only sets a flag bit.
    pub fn is_flag_command(&self) -> bool {
        self.flag_bit.is_some()
    }
}

use NgArgKind::*;

/// The standard NG command catalog.
///
/// Tag codes and argument layouts match the historical binary dialect; the
/// order here is insignificant (lookups go through [`SchemaCatalog`]).
pub static STANDARD_SCHEMAS: &[NgSchema] = &[
    NgSchema { name: "AssignSlot", tag: 1, args: &[ItemSlot, Long], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "LogItem", tag: 2, args: &[ItemSlot], options_only: true, max_occurrences: 1, flag_bit: None },
    NgSchema { name: "DefaultWindowsFont", tag: 3, args: &[Word, Array], options_only: true, max_occurrences: 1, flag_bit: None },
    NgSchema { name: "WindowTitle", tag: 4, args: &[String], options_only: true, max_occurrences: 1, flag_bit: None },
    NgSchema { name: "Plugin", tag: 5, args: &[Word, Long], options_only: true, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "Customize", tag: 6, args: &[Long, Array], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "Parameters", tag: 7, args: &[Long, Array], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "ItemGroup", tag: 8, args: &[Word, Array], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "Snow", tag: 9, args: &[Word], options_only: false, max_occurrences: 1, flag_bit: None },
    NgSchema { name: "Rain", tag: 10, args: &[Word], options_only: false, max_occurrences: 1, flag_bit: None },
    NgSchema { name: "LevelFarView", tag: 11, args: &[Word], options_only: false, max_occurrences: 1, flag_bit: None },
    NgSchema { name: "Turbo", tag: 12, args: &[Word], options_only: false, max_occurrences: 1, flag_bit: None },
    NgSchema { name: "Elevator", tag: 13, args: &[Word, Word, Array], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "Detector", tag: 14, args: &[Word, Word, Word], options_only: false, max_occurrences: 1, flag_bit: None },
    NgSchema { name: "Equipment", tag: 15, args: &[ItemSlot, Integer], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "KeyPad", tag: 16, args: &[Word, Word, Word], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "StandBy", tag: 17, args: &[Word, Array], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "FogRange", tag: 18, args: &[Word, Word], options_only: false, max_occurrences: 1, flag_bit: None },
    NgSchema { name: "AddEffect", tag: 19, args: &[Word, Word, Word, Array], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "TestPosition", tag: 20, args: &[Word, Word, ItemSlot, Array], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "TriggerGroup", tag: TAG_TRIGGER_GROUP, args: &[Word, Long, Long, Long, ArrayLong], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "Organizer", tag: 22, args: &[Word, Word, Word, Array], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "GlobalTrigger", tag: 23, args: &[Word, Long, Word, Word, Word, Word], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "MultEnvCondition", tag: 24, args: &[Word, Array], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "Image", tag: 25, args: &[Word, Word, Import, Array], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "MirrorEffect", tag: 26, args: &[Word, Word, Long], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "Damage", tag: 27, args: &[Word, Word, Word, Word], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "WindowsFont", tag: 28, args: &[Word, String, Array], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "TextFormat", tag: 29, args: &[Word, Word, Word, Word], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "Diary", tag: 30, args: &[Word, String, Array], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "CombineItems", tag: 31, args: &[ItemSlot, ItemSlot, ItemSlot], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "SoundSettings", tag: 32, args: &[Word, Word, Word], options_only: true, max_occurrences: 1, flag_bit: None },
    NgSchema { name: "TimerFont", tag: 33, args: &[Word, Word], options_only: false, max_occurrences: 1, flag_bit: None },
    NgSchema { name: "ColorRGB", tag: 34, args: &[Word, ArrayByte], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "KeyboardLayout", tag: 35, args: &[Word, ArrayByte], options_only: true, max_occurrences: 1, flag_bit: None },
    NgSchema { name: "TextureSequence", tag: 36, args: &[Word, ArrayNybble], options_only: false, max_occurrences: -1, flag_bit: None },
    // Flag commands: no words, one bit in the surrounding flags word.
    NgSchema { name: "ForceBumpMaps", tag: 37, args: &[Bool], options_only: true, max_occurrences: 1, flag_bit: Some(0x0001) },
    NgSchema { name: "ForceVolumetricFX", tag: 38, args: &[Bool], options_only: true, max_occurrences: 1, flag_bit: Some(0x0002) },
    NgSchema { name: "ShowLaraInTitle", tag: 39, args: &[Bool], options_only: true, max_occurrences: 1, flag_bit: Some(0x0004) },
    NgSchema { name: "ForceSoftFullScreen", tag: 40, args: &[Bool], options_only: true, max_occurrences: 1, flag_bit: Some(0x0008) },
    NgSchema { name: "NewSoundEngine", tag: 41, args: &[Bool], options_only: true, max_occurrences: 1, flag_bit: Some(0x0010) },
    NgSchema { name: "DiagnosticMode", tag: 42, args: &[Bool], options_only: true, max_occurrences: 1, flag_bit: Some(0x0020) },
    NgSchema { name: "DisableShadows", tag: 43, args: &[Bool], options_only: false, max_occurrences: 1, flag_bit: Some(0x0001) },
    NgSchema { name: "FixWaterFog", tag: 44, args: &[Bool], options_only: false, max_occurrences: 1, flag_bit: Some(0x0002) },
    NgSchema { name: "ShowAmmoCounter", tag: 45, args: &[Bool], options_only: false, max_occurrences: 1, flag_bit: Some(0x0004) },
    NgSchema { name: "TriggerGroupWord", tag: TAG_TRIGGER_GROUP_WORD, args: &[Word, Word, Word, Word, Array], options_only: false, max_occurrences: -1, flag_bit: None },
    NgSchema { name: "KeepDeadEnemies", tag: 48, args: &[Bool], options_only: false, max_occurrences: 1, flag_bit: Some(0x0008) },
];

/// Classic directive names that are never routed to the NG compiler even if
/// a same-named schema exists.
pub static CLASSIC_RESERVED: &[&str] = &[
    "FMV", "Cut", "ResidentCut", "Layer1", "Layer2", "UVRotate", "Legend", "LensFlare", "Mirror",
    "Fog", "AnimatingMIP", "LoadCamera", "ResetHUB", "Key", "KeyCombo", "Puzzle", "PuzzleCombo",
    "Pickup", "PickupCombo", "Examine", "Name", "Level", "YoungLara", "Weather", "Horizon",
    "StarField", "Lightning", "Train", "Pulse", "ColAddHorizon", "RemoveAmulet", "NoLevel",
    "Timer",
];

/// Case-insensitive lookup over [`STANDARD_SCHEMAS`].
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    by_name: HashMap<std::string::String, &'static NgSchema>,
}

impl SchemaCatalog {
    /// Build the standard catalog.
    pub fn standard() -> Self {
        let mut by_name = HashMap::with_capacity(STANDARD_SCHEMAS.len());
        for schema in STANDARD_SCHEMAS {
            by_name.insert(schema.name.to_ascii_uppercase(), schema);
        }
        Self { by_name }
    }

    /// Look up a schema by command name (without the trailing `=`).
    pub fn get(&self, name: &str) -> Option<&'static NgSchema> {
        self.by_name.get(&name.to_ascii_uppercase()).copied()
    }

    /// The `TriggerGroupWord` schema used by the downgrade optimization.
    pub fn trigger_group_word(&self) -> &'static NgSchema {
        self.get("TriggerGroupWord")
            .expect("TriggerGroupWord is part of the standard catalog")
    }

    /// True if the name belongs to the classic dialect and must not be
    /// treated as an NG command.
    pub fn is_classic_reserved(name: &str) -> bool {
        CLASSIC_RESERVED
            .iter()
            .any(|c| c.eq_ignore_ascii_case(name))
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let catalog = SchemaCatalog::standard();
        assert_eq!(catalog.get("assignslot").unwrap().tag, 1);
        assert_eq!(catalog.get("ASSIGNSLOT").unwrap().tag, 1);
        assert!(catalog.get("NoSuchCommand").is_none());
    }

    #[test]
    fn test_array_kinds_are_last_and_unique() {
        for schema in STANDARD_SCHEMAS {
            let arrays = schema.args.iter().filter(|k| k.is_array()).count();
            assert!(arrays <= 1, "{}: more than one array argument", schema.name);
            if arrays == 1 {
                assert!(
                    schema.args.last().unwrap().is_array(),
                    "{}: array argument is not last",
                    schema.name
                );
            }
        }
    }

    #[test]
    fn test_flag_commands_have_single_bool_arg() {
        for schema in STANDARD_SCHEMAS {
            if schema.is_flag_command() {
                assert_eq!(schema.args, &[Bool], "{}", schema.name);
            }
        }
    }

    #[test]
    fn test_tags_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for schema in STANDARD_SCHEMAS {
            assert!(seen.insert(schema.tag), "duplicate tag {}", schema.tag);
        }
    }

    #[test]
    fn test_trigger_group_pair() {
        let catalog = SchemaCatalog::standard();
        assert_eq!(catalog.get("TriggerGroup").unwrap().tag, TAG_TRIGGER_GROUP);
        assert_eq!(catalog.trigger_group_word().tag, TAG_TRIGGER_GROUP_WORD);
    }

    #[test]
    fn test_classic_reserved_shadows_ng() {
        assert!(SchemaCatalog::is_classic_reserved("fmv"));
        assert!(SchemaCatalog::is_classic_reserved("LoadCamera"));
        assert!(!SchemaCatalog::is_classic_reserved("TriggerGroup"));
    }
}
