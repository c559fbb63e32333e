//! NGSC command-line frontend.
//!
//! Compiles `<dir>/script/SCRIPT.TXT` (plus language files, the constants
//! catalog, the engine header and any discovered plugins) and writes
//! `script.dat` and one `<LANG>.DAT` per language to both `<dir>/script/`
//! and `<dir>/`. Exit code 0 on a clean compile, 1 on any fatal
//! diagnostic.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::UNIX_EPOCH;

use clap::Parser;

use ngsc_compiler::{compile, CompileConfig, CompileOutput, PluginSource};
use ngsc_types::{SourceProvider, Severity};

#[derive(Parser)]
#[command(name = "ngsc")]
#[command(about = "Compile a level-editor script project to its binary artifacts", long_about = None)]
#[command(version)]
struct Cli {
    /// Project directory containing `script/SCRIPT.TXT`.
    directory: PathBuf,

    /// Only report errors.
    #[arg(long, short)]
    quiet: bool,

    /// Verbose progress logging.
    #[arg(long, short)]
    verbose: bool,

    /// Fixed seed for the security chunk (reproducible builds).
    #[arg(long)]
    seed: Option<u64>,

    /// Print diagnostics as JSON instead of the human listing.
    #[arg(long)]
    json: bool,
}

/// Filesystem provider over `<dir>/script/` then `<dir>/`, matching file
/// names case-insensitively the way the original tool did on its home
/// platform.
struct DirSource {
    roots: Vec<PathBuf>,
}

impl DirSource {
    fn new(directory: &Path) -> Self {
        Self {
            roots: vec![directory.join("script"), directory.to_path_buf()],
        }
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        // Strip any directory the script mentions; inputs live in the roots.
        let base = name.rsplit(['/', '\\']).next()?;
        for root in &self.roots {
            let direct = root.join(base);
            if direct.is_file() {
                return Some(direct);
            }
            let Ok(entries) = fs::read_dir(root) else {
                continue;
            };
            for entry in entries.flatten() {
                if entry.file_name().to_string_lossy().eq_ignore_ascii_case(base)
                    && entry.path().is_file()
                {
                    return Some(entry.path());
                }
            }
        }
        None
    }
}

impl SourceProvider for DirSource {
    fn read(&self, name: &str) -> Option<Vec<u8>> {
        fs::read(self.resolve(name)?).ok()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet {
        log::LevelFilter::Error
    } else if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    let provider = DirSource::new(&cli.directory);
    let config = CompileConfig {
        constants_text: read_text(&provider, "scripter_constants.txt"),
        objects_header: read_text(&provider, "Objects.h"),
        statics_header: read_text(&provider, "statics.h"),
        plugins: discover_plugins(&cli.directory.join("script")),
        seed: cli.seed,
        ..CompileConfig::default()
    };

    let output = compile(&provider, &config);
    report(&output, cli.json);

    if output.diagnostics.has_fatal() {
        return ExitCode::FAILURE;
    }
    match write_outputs(&cli.directory, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn read_text(provider: &DirSource, name: &str) -> Option<String> {
    provider.read(name).map(|b| ngsc_types::cp1252::decode(&b))
}

/// Discover `plugin_*.script` descriptors and bare plugin libraries in the
/// script directory, ordered by file mtime ascending.
fn discover_plugins(script_dir: &Path) -> Vec<PluginSource> {
    let Ok(entries) = fs::read_dir(script_dir) else {
        return Vec::new();
    };
    let mut found: Vec<(std::time::Duration, PluginSource)> = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !stem.to_ascii_lowercase().starts_with("plugin_") {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let is_descriptor = ext.eq_ignore_ascii_case("script");
        let is_library = ["dll", "so", "dylib"]
            .iter()
            .any(|e| ext.eq_ignore_ascii_case(e));
        if !is_descriptor && !is_library {
            continue;
        }
        let mtime = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .unwrap_or_default();

        if let Some((_, existing)) = found
            .iter_mut()
            .find(|(_, p)| p.base_name.eq_ignore_ascii_case(stem))
        {
            if is_descriptor {
                existing.descriptor_text =
                    fs::read(&path).ok().map(|b| ngsc_types::cp1252::decode(&b));
            } else {
                existing.has_library = true;
            }
            continue;
        }
        found.push((
            mtime,
            PluginSource {
                base_name: stem.to_string(),
                descriptor_text: if is_descriptor {
                    fs::read(&path).ok().map(|b| ngsc_types::cp1252::decode(&b))
                } else {
                    None
                },
                has_library: is_library,
            },
        ));
    }
    found.sort_by_key(|(mtime, _)| *mtime);
    found.into_iter().map(|(_, p)| p).collect()
}

fn report(output: &CompileOutput, json: bool) {
    if json {
        match serde_json::to_string_pretty(&output.diagnostics) {
            Ok(text) => println!("{text}"),
            Err(error) => eprintln!("error: cannot serialize diagnostics: {error}"),
        }
        return;
    }
    for diagnostic in output.diagnostics.display_order() {
        match diagnostic.severity {
            Severity::Fatal => eprintln!("{diagnostic}"),
            Severity::Warning => log::warn!("{diagnostic}"),
        }
    }
    if output.diagnostics.has_fatal() {
        eprintln!(
            "compilation failed: {} error(s), {} warning(s)",
            output.diagnostics.fatal_count(),
            output.diagnostics.warning_count()
        );
    }
}

/// Write every artifact to both `<dir>/script/` and `<dir>/`.
fn write_outputs(directory: &Path, output: &CompileOutput) -> std::io::Result<()> {
    let script_dir = directory.join("script");
    let targets = [script_dir.as_path(), directory];
    if let Some(bytes) = &output.script_dat {
        for target in targets {
            fs::write(target.join("script.dat"), bytes)?;
        }
        log::info!("wrote script.dat ({} bytes)", bytes.len());
    }
    for (name, bytes) in &output.languages {
        for target in targets {
            fs::write(target.join(name), bytes)?;
        }
        log::info!("wrote {name} ({} bytes)", bytes.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_source_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("script")).unwrap();
        fs::write(dir.path().join("script/Script.txt"), b"[Options]").unwrap();

        let provider = DirSource::new(dir.path());
        assert_eq!(
            provider.read("SCRIPT.TXT"),
            Some(b"[Options]".to_vec())
        );
        assert!(provider.read("MISSING.TXT").is_none());
    }

    #[test]
    fn test_dir_source_strips_script_relative_dirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("script")).unwrap();
        fs::write(dir.path().join("script/image1.bmp"), b"bmp").unwrap();

        let provider = DirSource::new(dir.path());
        assert_eq!(provider.read("gfx\\image1.bmp"), Some(b"bmp".to_vec()));
    }

    #[test]
    fn test_discover_plugins_merges_descriptor_and_library() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("script");
        fs::create_dir(&script).unwrap();
        fs::write(script.join("plugin_trng.script"), b"X = 1").unwrap();
        fs::write(script.join("plugin_trng.dll"), b"").unwrap();
        fs::write(script.join("plugin_bare.dll"), b"").unwrap();
        fs::write(script.join("other.txt"), b"").unwrap();

        let plugins = discover_plugins(&script);
        assert_eq!(plugins.len(), 2);
        let trng = plugins
            .iter()
            .find(|p| p.base_name == "plugin_trng")
            .unwrap();
        assert!(trng.descriptor_text.is_some());
        let bare = plugins
            .iter()
            .find(|p| p.base_name == "plugin_bare")
            .unwrap();
        assert!(bare.descriptor_text.is_none());
        assert!(bare.has_library);
    }
}
