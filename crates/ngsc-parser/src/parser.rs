//! The directive parser driver.
//!
//! Walks a pushdown stack of open files (the main script plus `#include`s,
//! depth-first), recognizes section headers from the closed set, and
//! accumulates a [`ScriptModel`]. Classic directives inside `[Level]` /
//! `[Title]` stay in raw form for the classic compiler; NG directives are
//! evaluated into tagged values right here so that string arguments can be
//! resolved against the lazily loaded first language table.

use ngsc_lexer::{split_directive, strip_quotes, Normalizer};
use ngsc_types::model::opt_flags;
use ngsc_types::{
    resolve_string_ref, DiagnosticKind, DiagnosticSink, ImportRecord, LanguageTable, NgCommand,
    NgValue, NumberVal, RawDirective, SchemaCatalog, ScriptModel, Section, SectionKind, SourcePos,
    SourceProvider, StringRef,
};

use crate::eval::{evaluate, EvalError};
use crate::language::parse_language;
use crate::plugins::PluginSource;
use crate::symbols::SymbolTable;

/// Maximum `#include` nesting depth.
const MAX_INCLUDE_DEPTH: usize = 16;

/// Which part of the script the parser is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// Before the first section header.
    None,
    Options,
    Language,
    PsxExtensions,
    PcExtensions,
    /// Index into `ScriptModel::sections`.
    Section(usize),
}

struct FileFrame {
    name: String,
    lines: Normalizer,
}

/// Everything the parse phase hands to the compile phase.
pub struct ParseResult {
    pub model: ScriptModel,
    /// The lazily loaded first language table, when `[Options]` was entered
    /// after at least one `File=` declaration.
    pub language: Option<LanguageTable>,
    pub symbols: SymbolTable,
}

/// The script parser.
pub struct ScriptParser<'a> {
    provider: &'a dyn SourceProvider,
    catalog: &'a SchemaCatalog,
    plugins: Vec<PluginSource>,
    symbols: SymbolTable,
    model: ScriptModel,
    language: Option<LanguageTable>,
    context: Context,
    options_entered: bool,
}

/// Outcome of evaluating one NG directive.
enum NgParsed {
    Command(NgCommand),
    Flag(u16),
    Nothing,
}

impl<'a> ScriptParser<'a> {
    /// Create a parser. `symbols` arrives preloaded with the engine, slot
    /// and static catalogs plus one constants layer per discovered plugin
    /// (in discovery order); `plugins` lists the same discoveries for
    /// `Plugin=` association.
    pub fn new(
        provider: &'a dyn SourceProvider,
        catalog: &'a SchemaCatalog,
        symbols: SymbolTable,
        plugins: Vec<PluginSource>,
    ) -> Self {
        Self {
            provider,
            catalog,
            plugins,
            symbols,
            model: ScriptModel::default(),
            language: None,
            context: Context::None,
            options_entered: false,
        }
    }

    /// Parse the main script file and everything it includes.
    pub fn parse(mut self, main_file: &str, sink: &mut DiagnosticSink) -> ParseResult {
        let mut stack: Vec<FileFrame> = Vec::new();
        match self.provider.read(main_file) {
            Some(bytes) => stack.push(FileFrame {
                name: main_file.to_string(),
                lines: Normalizer::from_cp1252(&bytes, false),
            }),
            None => sink.fatal(
                DiagnosticKind::Resource,
                SourcePos::new(main_file, 0),
                format!("cannot open script file `{main_file}`"),
            ),
        }

        loop {
            let item = {
                let Some(frame) = stack.last_mut() else { break };
                frame.lines.next().map(|l| (frame.name.clone(), l))
            };
            match item {
                Some((file, line)) => {
                    let pos = SourcePos::new(&file, line.line);
                    self.handle_line(&line.text, pos, &mut stack, sink);
                }
                None => {
                    stack.pop();
                }
            }
        }

        ParseResult {
            model: self.model,
            language: self.language,
            symbols: self.symbols,
        }
    }

    // ── Line dispatch ─────────────────────────────────────────────────────

    fn handle_line(
        &mut self,
        text: &str,
        pos: SourcePos,
        stack: &mut Vec<FileFrame>,
        sink: &mut DiagnosticSink,
    ) {
        if text.starts_with('[') && text.ends_with(']') {
            self.enter_section(text, pos, sink);
            return;
        }
        if text.starts_with('#') {
            self.handle_hash(text, pos, stack, sink);
            return;
        }
        let Some((command, args)) = split_directive(text) else {
            sink.fatal(
                DiagnosticKind::Parse,
                pos,
                format!("missing `=` in `{text}`"),
            );
            return;
        };
        match self.context {
            Context::None => sink.fatal(
                DiagnosticKind::Parse,
                pos,
                format!("`{command}` before any section header"),
            ),
            Context::Options => self.handle_options(&command, &args, pos, sink),
            Context::Language => self.handle_language(&command, &args, pos, sink),
            Context::PsxExtensions => self.handle_extension(true, &command, &args, pos, sink),
            Context::PcExtensions => self.handle_extension(false, &command, &args, pos, sink),
            Context::Section(idx) => self.handle_section_directive(idx, command, args, pos, sink),
        }
    }

    fn enter_section(&mut self, header: &str, pos: SourcePos, sink: &mut DiagnosticSink) {
        let key = header
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_ascii_uppercase();
        match key.as_str() {
            "PSXEXTENSIONS" => self.context = Context::PsxExtensions,
            "PCEXTENSIONS" => self.context = Context::PcExtensions,
            "LANGUAGE" => self.context = Context::Language,
            "OPTIONS" => {
                if !self.options_entered {
                    self.options_entered = true;
                    self.load_first_language(sink);
                }
                self.context = Context::Options;
            }
            "TITLE" => self.begin_section(SectionKind::Title, pos),
            "LEVEL" => self.begin_section(SectionKind::Level, pos),
            _ => {
                sink.fatal(
                    DiagnosticKind::Parse,
                    pos,
                    format!("unknown section `{header}`"),
                );
                self.context = Context::None;
            }
        }
    }

    fn begin_section(&mut self, kind: SectionKind, pos: SourcePos) {
        log::debug!("entering {kind:?} section at {pos}");
        self.model.sections.push(Section::new(kind, pos));
        self.context = Context::Section(self.model.sections.len() - 1);
    }

    /// The very first `[Options]` transition loads the first declared
    /// language file so that later string-typed NG arguments resolve.
    fn load_first_language(&mut self, sink: &mut DiagnosticSink) {
        let Some(name) = self.model.language_files.first().cloned() else {
            return;
        };
        match self.provider.read(&name) {
            Some(bytes) => {
                let text = ngsc_types::cp1252::decode(&bytes);
                self.language = Some(parse_language(&name, &text, sink));
            }
            None => sink.fatal(
                DiagnosticKind::Resource,
                SourcePos::new(&name, 0),
                format!("cannot open language file `{name}`"),
            ),
        }
    }

    // ── `#` directives ────────────────────────────────────────────────────

    fn handle_hash(
        &mut self,
        text: &str,
        pos: SourcePos,
        stack: &mut Vec<FileFrame>,
        sink: &mut DiagnosticSink,
    ) {
        let (word, rest) = match text.find(char::is_whitespace) {
            Some(i) => (&text[..i], text[i..].trim_matches(' ')),
            None => (text, ""),
        };
        if word.eq_ignore_ascii_case("#define") {
            self.handle_define(rest, pos, sink);
        } else if word.eq_ignore_ascii_case("#include") {
            self.handle_include(rest, pos, stack, sink);
        } else {
            sink.fatal(
                DiagnosticKind::Parse,
                pos,
                format!("unknown directive `{word}`"),
            );
        }
    }

    fn handle_define(&mut self, rest: &str, pos: SourcePos, sink: &mut DiagnosticSink) {
        let (name, value) = match rest.find(char::is_whitespace) {
            Some(i) => (&rest[..i], rest[i..].trim_matches(' ')),
            None => (rest, ""),
        };
        if name.is_empty() || value.is_empty() {
            sink.fatal(
                DiagnosticKind::Parse,
                pos,
                format!("malformed #define `{rest}`"),
            );
            return;
        }

        if let Some(plugin_name) = name.strip_prefix('@') {
            // `#define @plugins clear` resets the binding table.
            if plugin_name.eq_ignore_ascii_case("plugins") && value.eq_ignore_ascii_case("clear") {
                self.symbols.clear_plugin_ids();
                return;
            }
            let Some(id) = crate::catalog::parse_literal(value).filter(|v| (1..=0xFFFF).contains(v))
            else {
                sink.fatal(
                    DiagnosticKind::Parse,
                    pos,
                    format!("bad plugin id `{value}` for `@{plugin_name}`"),
                );
                return;
            };
            let id = id as u16;
            match self.symbols.plugin_id(plugin_name) {
                Some(existing) if existing != id => sink.fatal(
                    DiagnosticKind::Parse,
                    pos,
                    format!("plugin `{plugin_name}` already bound to id {existing}"),
                ),
                Some(_) => sink.warning(
                    DiagnosticKind::Parse,
                    pos,
                    format!("duplicate plugin binding `@{plugin_name}` ignored"),
                ),
                None => self.symbols.bind_plugin_id(plugin_name, id),
            }
            return;
        }

        match evaluate(value, &self.symbols, &pos.file) {
            Ok(result) => self.symbols.define_user(&pos.file, name, result.value as i32),
            Err(e) => self.eval_diag(e, pos, sink),
        }
    }

    fn handle_include(
        &mut self,
        rest: &str,
        pos: SourcePos,
        stack: &mut Vec<FileFrame>,
        sink: &mut DiagnosticSink,
    ) {
        let name = strip_quotes(rest);
        if stack.len() >= MAX_INCLUDE_DEPTH {
            sink.fatal(
                DiagnosticKind::Resource,
                pos,
                format!("include depth exceeded at `{name}`"),
            );
            return;
        }
        match self.provider.read(name) {
            Some(bytes) => stack.push(FileFrame {
                name: name.to_string(),
                lines: Normalizer::from_cp1252(&bytes, false),
            }),
            None => sink.fatal(
                DiagnosticKind::Resource,
                pos,
                format!("cannot open include `{name}`"),
            ),
        }
    }

    // ── `[Options]` ───────────────────────────────────────────────────────

    fn handle_options(
        &mut self,
        command: &str,
        args: &[String],
        pos: SourcePos,
        sink: &mut DiagnosticSink,
    ) {
        let name = command.strip_suffix('=').unwrap_or(command);
        let upper = name.to_ascii_uppercase();
        match upper.as_str() {
            "LOADSAVE" => self.option_flag(opt_flags::LOAD_SAVE, args, pos, sink),
            "TITLE" => self.option_flag(opt_flags::TITLE, args, pos, sink),
            "PLAYANYLEVEL" => self.option_flag(opt_flags::PLAY_ANY_LEVEL, args, pos, sink),
            "FLYCHEAT" => self.option_flag(opt_flags::FLY_CHEAT, args, pos, sink),
            "DEMODISC" => self.option_flag(opt_flags::DEMO_DISC, args, pos, sink),
            "INPUTTIMEOUT" => {
                if let Some(v) = self.eval_ranged(args, 0, 0, u32::MAX as i64, pos.clone(), sink) {
                    self.model.input_timeout = v as u32;
                }
            }
            "SECURITY" => {
                if let Some(v) = self.eval_ranged(args, 0, 0, 255, pos.clone(), sink) {
                    self.model.security = v as u8;
                }
            }
            "PROTECT" => {
                if let Some(enabled) = self.parse_enabled(args, pos, sink) {
                    self.model.protect_header = enabled;
                }
            }
            "PLUGIN" => self.handle_plugin(args, pos, sink),
            "IMPORTFILE" => self.handle_import(args, pos, sink),
            _ => {
                if let Some(schema) = self.catalog.get(name) {
                    if !schema.options_only {
                        sink.fatal(
                            DiagnosticKind::Schema,
                            pos,
                            format!("`{name}` is not allowed in [Options]"),
                        );
                        return;
                    }
                    match self.parse_ng_command(schema, args, &pos, sink) {
                        NgParsed::Command(cmd) => self.model.ng_options.commands.push(cmd),
                        NgParsed::Flag(bit) => self.model.ng_options.flags |= bit,
                        NgParsed::Nothing => {}
                    }
                } else {
                    sink.warning(
                        DiagnosticKind::Parse,
                        pos,
                        format!("unknown command `{command}` in [Options]"),
                    );
                }
            }
        }
    }

    fn option_flag(
        &mut self,
        bit: u32,
        args: &[String],
        pos: SourcePos,
        sink: &mut DiagnosticSink,
    ) {
        if let Some(enabled) = self.parse_enabled(args, pos, sink) {
            if enabled {
                self.model.options_flags |= bit;
            } else {
                self.model.options_flags &= !bit;
            }
        }
    }

    fn parse_enabled(
        &self,
        args: &[String],
        pos: SourcePos,
        sink: &mut DiagnosticSink,
    ) -> Option<bool> {
        match args {
            [arg] if arg.eq_ignore_ascii_case("ENABLED") => Some(true),
            [arg] if arg.eq_ignore_ascii_case("DISABLED") => Some(false),
            _ => {
                sink.fatal(
                    DiagnosticKind::Parse,
                    pos,
                    "expected a single ENABLED or DISABLED argument",
                );
                None
            }
        }
    }

    /// `Plugin= id, name[, flags]`: associate the declared id with a
    /// discovered descriptor (synthetic when only the library exists) and
    /// emit the command through the NG schema path.
    fn handle_plugin(&mut self, args: &[String], pos: SourcePos, sink: &mut DiagnosticSink) {
        if !(2..=3).contains(&args.len()) {
            sink.fatal(
                DiagnosticKind::Schema,
                pos,
                "Plugin= expects `id, name[, flags]`",
            );
            return;
        }
        let Some(id) = self.eval_ranged(args, 0, 1, 0xFFFF, pos.clone(), sink) else {
            return;
        };
        let base = strip_quotes(&args[1]).to_string();
        let flags = match args.get(2) {
            Some(expr) => match evaluate(expr, &self.symbols, &pos.file) {
                Ok(r) => r.value,
                Err(e) => {
                    self.eval_diag(e, pos, sink);
                    return;
                }
            },
            None => 0,
        };

        let discovered = self
            .plugins
            .iter()
            .find(|p| p.base_name.eq_ignore_ascii_case(&base));
        match discovered {
            Some(src) if src.descriptor_text.is_some() || src.has_library => {
                if src.descriptor_text.is_none() {
                    log::debug!("synthetic descriptor for bare library `{base}`");
                }
                self.symbols.bind_plugin_id(&base, id as u16);
            }
            _ => {
                sink.fatal(
                    DiagnosticKind::Resource,
                    pos,
                    format!("no plugin descriptor or library found for `{base}`"),
                );
                return;
            }
        }

        let schema = self
            .catalog
            .get("Plugin")
            .expect("Plugin is part of the standard catalog");
        self.model.ng_options.commands.push(NgCommand {
            name: schema.name.to_string(),
            tag: schema.tag,
            args: vec![
                NgValue::Number(NumberVal::new(id)),
                NgValue::Number(NumberVal::new(flags)),
            ],
            pos,
        });
    }

    /// `ImportFile= id, mode, type, filename`: read the file now and
    /// register it for the ImportFile trailer chunks.
    fn handle_import(&mut self, args: &[String], pos: SourcePos, sink: &mut DiagnosticSink) {
        if args.len() != 4 {
            sink.fatal(
                DiagnosticKind::Schema,
                pos,
                "ImportFile= expects `id, mode, type, filename`",
            );
            return;
        }
        let (Some(id), Some(mode), Some(file_type)) = (
            self.eval_ranged(args, 0, 0, 0xFFFF, pos.clone(), sink),
            self.eval_ranged(args, 1, 0, 0xFFFF, pos.clone(), sink),
            self.eval_ranged(args, 2, 0, 0xFFFF, pos.clone(), sink),
        ) else {
            return;
        };
        let name = strip_quotes(&args[3]).to_string();
        let Some(data) = self.provider.read(&name) else {
            sink.fatal(
                DiagnosticKind::Resource,
                pos,
                format!("cannot open import file `{name}`"),
            );
            return;
        };
        self.model.imports.push(ImportRecord {
            id: id as u16,
            mode: mode as u16,
            file_type: file_type as u16,
            file_number: trailing_number(&name),
            name,
            data,
            pos,
        });
    }

    // ── `[Language]` and extension sections ───────────────────────────────

    fn handle_language(
        &mut self,
        command: &str,
        args: &[String],
        pos: SourcePos,
        sink: &mut DiagnosticSink,
    ) {
        let name = command.strip_suffix('=').unwrap_or(command);
        if !name.eq_ignore_ascii_case("File") {
            sink.warning(
                DiagnosticKind::Parse,
                pos,
                format!("unknown command `{command}` in [Language]"),
            );
            return;
        }
        if args.len() != 2 {
            sink.fatal(DiagnosticKind::Parse, pos, "File= expects `index, name`");
            return;
        }
        let expected = self.model.language_files.len();
        match args[0].parse::<usize>() {
            Ok(i) if i == expected => {}
            _ => {
                sink.fatal(
                    DiagnosticKind::Parse,
                    pos,
                    format!("bad language file index `{}` (expected {expected})", args[0]),
                );
                return;
            }
        }
        let file = args[1].clone();
        if !file.contains('.') {
            sink.fatal(
                DiagnosticKind::Parse,
                pos,
                format!("language file `{file}` is missing its extension"),
            );
            return;
        }
        self.model.language_files.push(file);
    }

    fn handle_extension(
        &mut self,
        psx: bool,
        command: &str,
        args: &[String],
        pos: SourcePos,
        sink: &mut DiagnosticSink,
    ) {
        let name = command.strip_suffix('=').unwrap_or(command);
        let known = ["Level", "Cut", "FMV", "Pix"]
            .iter()
            .any(|k| k.eq_ignore_ascii_case(name));
        if !known {
            sink.warning(
                DiagnosticKind::Parse,
                pos,
                format!("unknown extension command `{command}`"),
            );
            return;
        }
        let value = args.first().cloned().unwrap_or_default();
        let list = if psx {
            &mut self.model.psx_extensions
        } else {
            &mut self.model.pc_extensions
        };
        if list.len() >= 4 {
            sink.warning(DiagnosticKind::Parse, pos, "more than four extensions");
            return;
        }
        list.push(value);
    }

    // ── `[Level]` / `[Title]` ─────────────────────────────────────────────

    fn handle_section_directive(
        &mut self,
        idx: usize,
        command: String,
        args: Vec<String>,
        pos: SourcePos,
        sink: &mut DiagnosticSink,
    ) {
        let name = command.strip_suffix('=').unwrap_or(&command).to_string();

        // NG routing: catalog member and not shadowed by the classic dialect.
        if let Some(schema) = self.catalog.get(&name) {
            if !SchemaCatalog::is_classic_reserved(&name) {
                if schema.options_only {
                    sink.fatal(
                        DiagnosticKind::Schema,
                        pos,
                        format!("`{name}` is only allowed in [Options]"),
                    );
                    return;
                }
                match self.parse_ng_command(schema, &args, &pos, sink) {
                    NgParsed::Command(cmd) => {
                        self.model.sections[idx].ng.commands.push(cmd);
                    }
                    NgParsed::Flag(bit) => self.model.sections[idx].ng.flags |= bit,
                    NgParsed::Nothing => {}
                }
                return;
            }
        }

        if name.eq_ignore_ascii_case("Name") {
            if self.model.sections[idx].name_ref.is_some() {
                sink.warning(DiagnosticKind::Parse, pos, "duplicate Name= replaces the first");
            }
            self.model.sections[idx].name_ref = Some(args.join(", "));
            return;
        }
        if name.eq_ignore_ascii_case("Level") {
            if args.len() != 2 {
                sink.fatal(DiagnosticKind::Parse, pos, "Level= expects `path, audio`");
                return;
            }
            let Some(cd) = self.eval_ranged(&args, 1, 0, 255, pos, sink) else {
                return;
            };
            self.model.sections[idx].path = args[0].clone();
            self.model.sections[idx].cd = cd as u8;
            return;
        }

        // Everything else is kept raw for the classic compiler.
        self.model.sections[idx].directives.push(RawDirective {
            command,
            args,
            pos,
        });
    }

    // ── NG argument evaluation ────────────────────────────────────────────

    fn parse_ng_command(
        &self,
        schema: &'static ngsc_types::NgSchema,
        args: &[String],
        pos: &SourcePos,
        sink: &mut DiagnosticSink,
    ) -> NgParsed {
        use ngsc_types::NgArgKind;

        if schema.is_flag_command() {
            return match args {
                [arg] if arg.eq_ignore_ascii_case("ENABLED") => {
                    NgParsed::Flag(schema.flag_bit.unwrap_or(0))
                }
                [arg] if arg.eq_ignore_ascii_case("DISABLED") => NgParsed::Nothing,
                _ => {
                    sink.fatal(
                        DiagnosticKind::Parse,
                        pos.clone(),
                        format!("{} expects a single ENABLED or DISABLED argument", schema.name),
                    );
                    NgParsed::Nothing
                }
            };
        }

        let has_array = schema.args.last().is_some_and(|k| k.is_array());
        let fixed = schema.args.len() - usize::from(has_array);
        let count_ok = if has_array {
            args.len() >= fixed
        } else {
            args.len() == fixed
        };
        if !count_ok {
            sink.fatal(
                DiagnosticKind::Schema,
                pos.clone(),
                format!(
                    "{} expects {}{} arguments, got {}",
                    schema.name,
                    fixed,
                    if has_array { "+" } else { "" },
                    args.len()
                ),
            );
            return NgParsed::Nothing;
        }

        let mut values = Vec::with_capacity(schema.args.len());
        for (i, kind) in schema.args.iter().enumerate().take(fixed) {
            let arg = &args[i];
            match kind {
                NgArgKind::String => {
                    let stripped = strip_quotes(arg);
                    let index = match resolve_string_ref(stripped, self.language.as_ref()) {
                        StringRef::Index(index) => index,
                        StringRef::Missing => {
                            sink.warning(
                                DiagnosticKind::Reference,
                                pos.clone(),
                                format!("string `{stripped}` not found in the language table"),
                            );
                            0
                        }
                    };
                    values.push(NgValue::StringIndex(index));
                }
                _ => match evaluate(arg, &self.symbols, &pos.file) {
                    Ok(r) => values.push(NgValue::Number(NumberVal {
                        value: r.value,
                        plugin: r.plugin,
                    })),
                    Err(e) => {
                        self.eval_diag(e, pos.clone(), sink);
                        return NgParsed::Nothing;
                    }
                },
            }
        }
        if has_array {
            let mut elems = Vec::with_capacity(args.len() - fixed);
            for arg in &args[fixed..] {
                match evaluate(arg, &self.symbols, &pos.file) {
                    Ok(r) => elems.push(NumberVal {
                        value: r.value,
                        plugin: r.plugin,
                    }),
                    Err(e) => {
                        self.eval_diag(e, pos.clone(), sink);
                        return NgParsed::Nothing;
                    }
                }
            }
            values.push(NgValue::Array(elems));
        }

        NgParsed::Command(NgCommand {
            name: schema.name.to_string(),
            tag: schema.tag,
            args: values,
            pos: pos.clone(),
        })
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn eval_ranged(
        &self,
        args: &[String],
        index: usize,
        min: i64,
        max: i64,
        pos: SourcePos,
        sink: &mut DiagnosticSink,
    ) -> Option<i64> {
        let Some(arg) = args.get(index) else {
            sink.fatal(DiagnosticKind::Parse, pos, "missing argument");
            return None;
        };
        match evaluate(arg, &self.symbols, &pos.file) {
            Ok(r) if (min..=max).contains(&r.value) => Some(r.value),
            Ok(r) => {
                sink.fatal(
                    DiagnosticKind::Range,
                    pos,
                    format!("value {} out of range {min}..={max}", r.value),
                );
                None
            }
            Err(e) => {
                self.eval_diag(e, pos, sink);
                None
            }
        }
    }

    fn eval_diag(&self, error: EvalError, pos: SourcePos, sink: &mut DiagnosticSink) {
        let kind = match error {
            EvalError::UnknownSymbol(_) => DiagnosticKind::Reference,
            EvalError::BadTerm(_) => DiagnosticKind::Parse,
        };
        sink.fatal(kind, pos, error.to_string());
    }
}

/// Trailing decimal digit run of an import file's base name; 0 when empty.
fn trailing_number(file_name: &str) -> u16 {
    let stem = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .split('.')
        .next()
        .unwrap_or("");
    let digits: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().unwrap_or(0)
}
