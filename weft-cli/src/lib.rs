//! Batch driver for the template compiler: reads Rust sources containing
//! `view! { ... }` blocks and writes the compiled modules to an output
//! directory. Usable from a `build.rs` as well as from the `weft` binary.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use weft_compiler::{CompileOptions, Target, compile_module};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUT_DIR: &str = "target/weft-gen";

/// Settings for one build invocation.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub compile: CompileOptions,
    pub out_dir: PathBuf,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            compile: CompileOptions::default(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

impl BuildOptions {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: Target) -> Self {
        self.compile.target = target;
        self
    }
}

/// One compiled file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub templates: usize,
}

/// Compile `input`, which is either a single `.rs` file or a directory
/// searched recursively for `.rs` files. Outputs keep the input's relative
/// layout under `options.out_dir`.
pub fn build(input: &Path, options: &BuildOptions) -> Result<Vec<BuiltFile>> {
    let sources = collect_sources(input)?;
    if sources.is_empty() {
        bail!("no .rs sources found under {}", input.display());
    }
    let base = if input.is_dir() {
        input
    } else {
        input.parent().unwrap_or(Path::new(""))
    };

    let mut built = Vec::with_capacity(sources.len());
    for source in sources {
        let relative = source.strip_prefix(base).unwrap_or(&source);
        let output = options.out_dir.join(relative);
        let templates = build_file(&source, &output, &options.compile)?;
        built.push(BuiltFile {
            source,
            output,
            templates,
        });
    }
    tracing::info!(
        files = built.len(),
        out_dir = %options.out_dir.display(),
        "build finished"
    );
    Ok(built)
}

/// Compile one file to `output`; returns the number of templates compiled.
pub fn build_file(source: &Path, output: &Path, options: &CompileOptions) -> Result<usize> {
    let text = fs::read_to_string(source)
        .with_context(|| format!("failed to read {}", source.display()))?;
    let compiled = compile_module(&text, options).map_err(|err| {
        let (line, col) = err.location();
        anyhow::anyhow!("{}:{line}:{col}: {err}", source.display())
    })?;

    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    fs::write(output, &compiled.code)
        .with_context(|| format!("failed to write {}", output.display()))?;

    tracing::debug!(
        source = %source.display(),
        output = %output.display(),
        templates = compiled.templates,
        hoisted = compiled.hoisted,
        "compiled"
    );
    Ok(compiled.templates)
}

fn collect_sources(input: &Path) -> Result<Vec<PathBuf>> {
    let meta =
        fs::metadata(input).with_context(|| format!("failed to stat {}", input.display()))?;
    if meta.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut found = Vec::new();
    let mut pending = vec![input.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries =
            fs::read_dir(&dir).with_context(|| format!("failed to list {}", dir.display()))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("failed to list {}", dir.display()))?
                .path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}
