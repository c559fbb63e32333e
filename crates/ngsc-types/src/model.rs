//! The script data model.
//!
//! A [`ScriptModel`] is built by the directive parser and consumed, read
//! only, by the classic compiler, the NG compiler, and the container
//! writer. It is the sole exchange medium between pipeline stages.

use crate::SourcePos;

/// Bits of the 32-bit classic options flags word.
pub mod opt_flags {
    pub const FLY_CHEAT: u32 = 0x0001;
    pub const LOAD_SAVE: u32 = 0x0002;
    pub const TITLE: u32 = 0x0004;
    pub const PLAY_ANY_LEVEL: u32 = 0x0008;
    pub const DEMO_DISC: u32 = 0x0080;
}

/// Bits of the 16-bit classic section flags word.
///
/// `LAYER1`, `LAYER2`, `MIRROR` and `LENS_FLARE` are set implicitly when
/// the matching directive appears; the rest come from flag-only directives.
pub mod level_flags {
    pub const YOUNG_LARA: u16 = 0x0001;
    pub const WEATHER: u16 = 0x0002;
    pub const HORIZON: u16 = 0x0004;
    pub const LAYER1: u16 = 0x0008;
    pub const LAYER2: u16 = 0x0010;
    pub const STAR_FIELD: u16 = 0x0020;
    pub const LIGHTNING: u16 = 0x0040;
    pub const TRAIN: u16 = 0x0080;
    pub const PULSE: u16 = 0x0100;
    pub const COL_ADD_HORIZON: u16 = 0x0200;
    pub const REMOVE_AMULET: u16 = 0x0400;
    pub const NO_LEVEL: u16 = 0x0800;
    pub const TIMER: u16 = 0x1000;
    pub const MIRROR: u16 = 0x2000;
    pub const LENS_FLARE: u16 = 0x4000;
}

/// Classic section kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Level,
    Title,
}

impl SectionKind {
    /// The byte tag that closes the section record.
    pub fn tag(self) -> u8 {
        match self {
            Self::Level => 0x81,
            Self::Title => 0x82,
        }
    }
}

/// One classic directive kept in source form for the classic compiler.
#[derive(Debug, Clone)]
pub struct RawDirective {
    /// Command token including the trailing `=`.
    pub command: String,
    /// Comma-split, trimmed arguments.
    pub args: Vec<String>,
    pub pos: SourcePos,
}

impl RawDirective {
    /// The command name without the trailing `=`.
    pub fn name(&self) -> &str {
        self.command.strip_suffix('=').unwrap_or(&self.command)
    }
}

/// An evaluated numeric argument together with the plugin that resolved it
/// (0 when no plugin symbol was involved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberVal {
    pub value: i64,
    pub plugin: u16,
}

impl NumberVal {
    pub fn new(value: i64) -> Self {
        Self { value, plugin: 0 }
    }
}

/// A parsed NG command argument. The schema argument kind decides how the
/// compiler encodes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NgValue {
    /// Word / Integer / Long / ItemSlot / Import argument.
    Number(NumberVal),
    /// Resolved string-table index (`0x8000 | n` for extra-NG strings).
    StringIndex(u16),
    /// `ENABLED` / `DISABLED`.
    Bool(bool),
    /// Trailing array argument, any array kind.
    Array(Vec<NumberVal>),
}

/// One NG command as parsed, before word encoding.
#[derive(Debug, Clone)]
pub struct NgCommand {
    pub name: String,
    pub tag: u8,
    pub args: Vec<NgValue>,
    pub pos: SourcePos,
}

/// NG commands of one scope plus the 16-bit flags word built from Bool
/// commands.
#[derive(Debug, Clone, Default)]
pub struct NgCommandGroup {
    pub commands: Vec<NgCommand>,
    pub flags: u16,
}

impl NgCommandGroup {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.flags == 0
    }
}

/// One `[Level]` or `[Title]` block.
#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    /// Argument of `Name=`, looked up in the language table at compile time.
    pub name_ref: Option<String>,
    /// Data file path from `Level=`.
    pub path: String,
    /// CD/audio number from `Level=`.
    pub cd: u8,
    /// Classic directives in source order.
    pub directives: Vec<RawDirective>,
    /// NG commands of this section.
    pub ng: NgCommandGroup,
    /// Position of the section header line.
    pub pos: SourcePos,
}

impl Section {
    pub fn new(kind: SectionKind, pos: SourcePos) -> Self {
        Self {
            kind,
            name_ref: None,
            path: String::new(),
            cd: 0,
            directives: Vec::new(),
            ng: NgCommandGroup::default(),
            pos,
        }
    }
}

/// One registered `ImportFile=` entry.
#[derive(Debug, Clone)]
pub struct ImportRecord {
    pub id: u16,
    pub mode: u16,
    pub file_type: u16,
    /// Trailing decimal digit run of the base name; 0 when there is none.
    pub file_number: u16,
    /// File name as written in the script.
    pub name: String,
    pub data: Vec<u8>,
    pub pos: SourcePos,
}

/// The whole parsed script, ready for compilation.
#[derive(Debug, Clone, Default)]
pub struct ScriptModel {
    /// 32-bit classic options flags.
    pub options_flags: u32,
    /// `InputTimeout=` value.
    pub input_timeout: u32,
    /// `Security=` byte.
    pub security: u8,
    /// `Protect=` enables scrambling of the first 64 bytes of script.dat.
    pub protect_header: bool,
    /// Up to four `[PSXExtensions]` strings in declaration order.
    pub psx_extensions: Vec<String>,
    /// Up to four `[PCExtensions]` strings in declaration order.
    pub pc_extensions: Vec<String>,
    /// Language file names in `File=` index order.
    pub language_files: Vec<String>,
    /// All sections in declaration order.
    pub sections: Vec<Section>,
    /// NG commands declared in `[Options]`.
    pub ng_options: NgCommandGroup,
    /// Registered import files in declaration order.
    pub imports: Vec<ImportRecord>,
}

impl ScriptModel {
    /// Number of `[Level]` sections (the `[Title]` section does not count).
    pub fn level_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| s.kind == SectionKind::Level)
            .count()
    }
}
