//! Pipeline orchestration: parse → compile → frame.
//!
//! Phases run strictly in sequence and the diagnostic sink is consulted at
//! every phase boundary; a fatal stops the pipeline before any further
//! artifact is produced.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

use ngsc_codegen::container::dat_basename;
use ngsc_codegen::{
    write_language_dat, write_script_dat, ClassicCompiler, ContainerError, NgCompiler, NgStreams,
};
use ngsc_parser::{
    parse_constants_text, parse_enum_header, parse_language, ParseResult, PluginDescriptor,
    PluginSource, ScriptParser, SymbolTable,
};
use ngsc_types::{
    cp1252, DiagnosticKind, DiagnosticSink, LanguageTable, SchemaCatalog, SourcePos,
    SourceProvider,
};

/// Compilation inputs beyond the file set itself.
#[derive(Debug, Clone)]
pub struct CompileConfig {
    /// Main script file name.
    pub main_script: String,
    /// The scripter constants catalog, when present.
    pub constants_text: Option<String>,
    /// The engine header holding the item slot enum.
    pub objects_header: Option<String>,
    /// The static objects enum.
    pub statics_header: Option<String>,
    /// Discovered plugins, in discovery order (file mtime ascending).
    pub plugins: Vec<PluginSource>,
    /// Security-chunk PRNG seed; derived from the source when absent.
    pub seed: Option<u64>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            main_script: "SCRIPT.TXT".into(),
            constants_text: None,
            objects_header: None,
            statics_header: None,
            plugins: Vec::new(),
            seed: None,
        }
    }
}

/// The compiled artifacts plus every collected diagnostic.
#[derive(Debug, Clone, Default)]
pub struct CompileOutput {
    /// `script.dat` bytes; `None` when a fatal stopped the pipeline.
    pub script_dat: Option<Vec<u8>>,
    /// One `(basename, bytes)` pair per language file, e.g.
    /// `("ENGLISH.DAT", …)`.
    pub languages: Vec<(String, Vec<u8>)>,
    pub diagnostics: DiagnosticSink,
}

impl CompileOutput {
    fn aborted(diagnostics: DiagnosticSink) -> Self {
        Self {
            script_dat: None,
            languages: Vec::new(),
            diagnostics,
        }
    }
}

/// Run the whole pipeline over the given input set.
pub fn compile(provider: &dyn SourceProvider, config: &CompileConfig) -> CompileOutput {
    let mut sink = DiagnosticSink::new();
    let catalog = SchemaCatalog::standard();

    let mut symbols = SymbolTable::new();
    if let Some(text) = &config.constants_text {
        symbols.set_engine_constants(parse_constants_text(text));
    }
    if let Some(text) = &config.objects_header {
        symbols.set_slot_enum(parse_enum_header(text));
    }
    if let Some(text) = &config.statics_header {
        symbols.set_static_enum(parse_enum_header(text));
    }
    for plugin in &config.plugins {
        if let Some(text) = &plugin.descriptor_text {
            let descriptor = PluginDescriptor::parse(&plugin.base_name, text);
            symbols.add_plugin_layer(&plugin.base_name, descriptor.constants);
        }
    }

    // Phase 1: directive parsing (includes, defines, sections).
    let parser = ScriptParser::new(provider, &catalog, symbols, config.plugins.clone());
    let ParseResult {
        model,
        language: mut preloaded,
        symbols,
    } = parser.parse(&config.main_script, &mut sink);
    if sink.has_fatal() {
        return CompileOutput::aborted(sink);
    }
    log::info!(
        "parsed {} section(s), {} language file(s)",
        model.sections.len(),
        model.language_files.len()
    );

    // Phase 2: language tables (also the lookup table for compilation).
    // The parser may already hold the first table from its lazy load; its
    // diagnostics are in the sink, so that file is not parsed again.
    let mut tables: Vec<(String, LanguageTable)> = Vec::new();
    for (index, name) in model.language_files.iter().enumerate() {
        if index == 0 {
            if let Some(table) = preloaded.take() {
                tables.push((name.clone(), table));
                continue;
            }
        }
        match provider.read(name) {
            Some(bytes) => {
                let text = cp1252::decode(&bytes);
                tables.push((name.clone(), parse_language(name, &text, &mut sink)));
            }
            None => sink.fatal(
                DiagnosticKind::Resource,
                SourcePos::new(name, 0),
                format!("cannot open language file `{name}`"),
            ),
        }
    }
    if sink.has_fatal() {
        return CompileOutput::aborted(sink);
    }

    // Phase 3: classic section compilation.
    let first_table = tables.first().map(|(_, t)| t);
    let classic = ClassicCompiler::new(&symbols, first_table);
    let payloads: Vec<Vec<u8>> = model
        .sections
        .iter()
        .enumerate()
        .map(|(i, s)| classic.compile_section(s, i as u8, &mut sink))
        .collect();

    // Phase 4: NG command compilation.
    let mut ng = NgCompiler::new(&catalog);
    let options = ng.compile_group(&model.ng_options, true, &mut sink);
    let mut levels = Vec::with_capacity(model.sections.len());
    for section in &model.sections {
        ng.begin_section();
        levels.push(ng.compile_group(&section.ng, false, &mut sink));
    }
    if sink.has_fatal() {
        return CompileOutput::aborted(sink);
    }

    // Phase 5: container framing.
    let seed = config
        .seed
        .unwrap_or_else(|| source_seed(provider, &config.main_script));
    let mut rng = StdRng::seed_from_u64(seed);
    let streams = NgStreams { options, levels };
    let script_dat = match write_script_dat(&model, &payloads, &streams, &mut rng) {
        Ok(bytes) => Some(bytes),
        Err(error) => {
            container_diag(error, &config.main_script, &mut sink);
            None
        }
    };
    if sink.has_fatal() {
        return CompileOutput::aborted(sink);
    }

    let mut languages = Vec::with_capacity(tables.len());
    for (name, table) in &tables {
        match write_language_dat(table) {
            Ok(bytes) => languages.push((dat_basename(name), bytes)),
            Err(error) => container_diag(error, name, &mut sink),
        }
    }
    if sink.has_fatal() {
        return CompileOutput::aborted(sink);
    }

    CompileOutput {
        script_dat,
        languages,
        diagnostics: sink,
    }
}

/// Deterministic default seed: the first eight bytes of the SHA-256 of the
/// main script text.
fn source_seed(provider: &dyn SourceProvider, main_script: &str) -> u64 {
    let bytes = provider.read(main_script).unwrap_or_default();
    let digest = Sha256::digest(&bytes);
    u64::from_le_bytes(digest[..8].try_into().unwrap_or_default())
}

fn container_diag(error: ContainerError, file: &str, sink: &mut DiagnosticSink) {
    sink.fatal(
        DiagnosticKind::Range,
        SourcePos::new(file, 0),
        error.to_string(),
    );
}
