//! `mindmap`: check, format, edit, and export mind-map documents.

mod outline;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use mm_core::id::NodeId;
use mm_core::lint::{has_errors, lint_mindmap};
use mm_core::model::MindMap;
use mm_editor::{ContentStatus, DocumentStore, Edit, EditorConfig, ExportArtifact, SyncEngine};
use mm_render::geometry::union_bounds;
use mm_render::{RenderTheme, SvgOptions, ViewBox, render_png, render_svg};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Margin around the nodes when `--fit` frames the export.
const FIT_PADDING: f64 = 40.0;

#[derive(Parser, Debug)]
#[command(name = "mindmap", version, about = "Mind-map document tool")]
struct Cli {
    /// Editor config (JSON); missing fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lint a document; exits non-zero when it would be rejected.
    Check { file: PathBuf },

    /// Rewrite a document in canonical form.
    Fmt {
        file: PathBuf,
        /// Only report whether the file is already formatted.
        #[arg(long)]
        check: bool,
    },

    /// Print the tree as an indented outline.
    Outline {
        file: PathBuf,
        /// Show the children of collapsed nodes.
        #[arg(long)]
        all: bool,
    },

    /// Add a child node and print its id.
    Add {
        file: PathBuf,
        #[arg(long, default_value = "root")]
        parent: String,
        #[arg(long)]
        text: Option<String>,
    },

    /// Delete a node and its subtree.
    Delete { file: PathBuf, id: String },

    /// Change a node's text.
    Rename {
        file: PathBuf,
        id: String,
        text: String,
    },

    /// Render the document to PNG or SVG.
    Export {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = FormatArg::Png)]
        format: FormatArg,
        /// Output path; defaults to `mindmap.png` / `mindmap.svg`.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Frame all visible nodes instead of the default 800×600 view.
        #[arg(long)]
        fit: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Png,
    Svg,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Check { file } => Ok(exit_code(check(&file)?)),
        Command::Fmt { file, check } => Ok(exit_code(fmt(&file, check)?)),
        Command::Outline { file, all } => {
            let tree = load_strict(&file)?;
            print!("{}", outline::render_outline(&tree, all));
            Ok(ExitCode::SUCCESS)
        }
        Command::Add { file, parent, text } => {
            let parent = NodeId::intern(&parent);
            let created = edit_file(&file, &config, |engine, cfg| {
                let result = engine.apply_deferred(&Edit::AddChild { parent }, &cfg.layout);
                let id = result
                    .created
                    .with_context(|| format!("no node with id `{parent}`"))?;
                if let Some(text) = &text {
                    engine.apply_deferred(
                        &Edit::Rename {
                            id,
                            text: text.clone(),
                        },
                        &cfg.layout,
                    );
                }
                Ok(id)
            })?;
            println!("{created}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Delete { file, id } => {
            let id = NodeId::intern(&id);
            if id.is_root() {
                bail!("the root node cannot be deleted");
            }
            edit_file(&file, &config, |engine, cfg| {
                if !engine.apply_deferred(&Edit::Delete { id }, &cfg.layout).changed {
                    bail!("no node with id `{id}`");
                }
                Ok(())
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Rename { file, id, text } => {
            let id = NodeId::intern(&id);
            edit_file(&file, &config, |engine, cfg| {
                if !engine.tree().contains(id) {
                    bail!("no node with id `{id}`");
                }
                engine.apply_deferred(&Edit::Rename { id, text }, &cfg.layout);
                Ok(())
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Export {
            file,
            format,
            output,
            fit,
        } => {
            let tree = load_strict(&file)?;
            let artifact = export(&tree, format, fit, &config)?;
            let path = output.unwrap_or_else(|| PathBuf::from(artifact.file_name()));
            fs::write(&path, artifact.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote {} ({})", path.display(), artifact.mime_type());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    EditorConfig::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Load a document, rejecting malformed JSON and broken invariants.
fn load_strict(path: &Path) -> Result<MindMap> {
    let text = read(path)?;
    mm_core::from_json(&text).with_context(|| format!("cannot load {}", path.display()))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Print lint findings. Returns false when the document would be rejected.
fn check(path: &Path) -> Result<bool> {
    let text = read(path)?;
    let tree: MindMap = match mm_core::codec::parse(&text) {
        Ok(tree) => tree,
        Err(err) => {
            println!("{}: error[json] {err}", path.display());
            return Ok(false);
        }
    };
    let diags = lint_mindmap(&tree);
    for d in &diags {
        println!("{}: {d} (node `{}`)", path.display(), d.node_id);
    }
    let ok = !has_errors(&diags);
    if ok {
        println!("{}: ok ({} nodes)", path.display(), tree.len());
    }
    Ok(ok)
}

/// Returns false when `check_only` finds an unformatted file.
fn fmt(path: &Path, check_only: bool) -> Result<bool> {
    let text = read(path)?;
    let formatted =
        mm_core::format_document(&text).with_context(|| format!("cannot format {}", path.display()))?;
    if formatted == text {
        return Ok(true);
    }
    if check_only {
        println!("{}: not formatted", path.display());
        return Ok(false);
    }
    fs::write(path, formatted).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

// ─── Edits ───────────────────────────────────────────────────────────────

/// Writes saves back to the document file.
struct FileStore {
    path: PathBuf,
    error: Option<io::Error>,
}

impl DocumentStore for FileStore {
    fn save(&mut self, content: &str, _is_current_version: bool) {
        if let Err(err) = fs::write(&self.path, content) {
            self.error = Some(err);
        }
    }
}

/// Load `path` strictly, run `apply` on a sync engine backed by the file,
/// and save the result once.
fn edit_file<T>(
    path: &Path,
    config: &EditorConfig,
    apply: impl FnOnce(&mut SyncEngine<FileStore>, &EditorConfig) -> Result<T>,
) -> Result<T> {
    let text = read(path)?;
    mm_core::from_json(&text).with_context(|| format!("cannot load {}", path.display()))?;

    let store = FileStore {
        path: path.to_path_buf(),
        error: None,
    };
    let mut engine = SyncEngine::from_content(&text, ContentStatus::Idle, store);
    let value = apply(&mut engine, config)?;
    if !engine.flush() {
        log::info!("{} unchanged", path.display());
    }
    if let Some(err) = engine.store_mut().error.take() {
        return Err(err).with_context(|| format!("failed to write {}", path.display()));
    }
    Ok(value)
}

// ─── Export ──────────────────────────────────────────────────────────────

fn export(
    tree: &MindMap,
    format: FormatArg,
    fit: bool,
    config: &EditorConfig,
) -> Result<ExportArtifact> {
    let mut view_box = ViewBox {
        width: config.surface_width,
        height: config.surface_height,
        ..ViewBox::default()
    };
    if fit {
        let visible = tree.flatten();
        if let Some(bounds) = union_bounds(visible.iter().map(|f| f.node)) {
            let bounds = bounds.inflate(FIT_PADDING, FIT_PADDING);
            view_box = ViewBox {
                x: bounds.x0,
                y: bounds.y0,
                width: bounds.width(),
                height: bounds.height(),
            };
        }
    }
    let options = SvgOptions {
        view_box,
        selected: None,
        theme: RenderTheme::for_mode(config.dark_mode),
    };
    Ok(match format {
        FormatArg::Svg => ExportArtifact::Svg(render_svg(tree, &options)),
        FormatArg::Png => ExportArtifact::Png(
            render_png(tree, &options, config.export_width, config.export_height)
                .context("PNG export failed")?,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scratch(name: &str, content: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "mindmap-cli-{}-{n}-{name}",
            std::process::id()
        ));
        fs::write(&path, content).unwrap();
        path
    }

    fn default_doc() -> String {
        mm_core::serialize(&MindMap::default())
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mindmap").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parses_subcommands() {
        let parsed = cli(&["export", "map.json", "--format", "svg", "--fit"]);
        match parsed.command {
            Command::Export { format, fit, .. } => {
                assert_eq!(format, FormatArg::Svg);
                assert!(fit);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(Cli::try_parse_from(["mindmap", "export", "m.json", "--format", "gif"]).is_err());
    }

    #[test]
    fn add_then_rename_then_delete() {
        let path = scratch("edit.json", &default_doc());
        let config = EditorConfig::default();

        let created = edit_file(&path, &config, |engine, cfg| {
            let r = engine.apply_deferred(
                &Edit::AddChild {
                    parent: NodeId::root(),
                },
                &cfg.layout,
            );
            Ok(r.created.unwrap())
        })
        .unwrap();
        let tree = load_strict(&path).unwrap();
        let node = tree.find(created).unwrap();
        assert_eq!(node.position(), (550.0, 300.0));

        run(cli(&[
            "rename",
            path.to_str().unwrap(),
            created.as_str(),
            "Renamed",
        ]))
        .unwrap();
        assert_eq!(
            load_strict(&path).unwrap().find(created).unwrap().text,
            "Renamed"
        );

        run(cli(&["delete", path.to_str().unwrap(), created.as_str()])).unwrap();
        assert_eq!(load_strict(&path).unwrap(), MindMap::default());
        fs::remove_file(path).ok();
    }

    #[test]
    fn edits_report_missing_nodes() {
        let path = scratch("missing.json", &default_doc());
        let err = run(cli(&["delete", path.to_str().unwrap(), "ghost"])).unwrap_err();
        assert!(err.to_string().contains("ghost"));
        assert!(run(cli(&["delete", path.to_str().unwrap(), "root"])).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), default_doc());
        fs::remove_file(path).ok();
    }

    #[test]
    fn fmt_rewrites_to_canonical_form() {
        let path = scratch(
            "fmt.json",
            r#"{"text":"Main Topic","id":"root","x":400,"y":300,"children":[],"level":0}"#,
        );
        assert!(!fmt(&path, true).unwrap());
        assert!(fmt(&path, false).unwrap());
        let text = fs::read_to_string(&path).unwrap();
        assert!(fmt(&path, true).unwrap());
        assert!(text.starts_with("{\n  \"id\": \"root\""));
        fs::remove_file(path).ok();
    }

    #[test]
    fn check_flags_duplicate_ids() {
        let dup = r#"{"id":"root","text":"r","x":0,"y":0,"level":0,"children":[
            {"id":"a","text":"a","x":0,"y":0,"level":1,"children":[]},
            {"id":"a","text":"b","x":0,"y":0,"level":1,"children":[]}]}"#;
        let path = scratch("dup.json", dup);
        assert!(!check(&path).unwrap());
        assert!(load_strict(&path).is_err());
        fs::remove_file(path).ok();

        let ok = scratch("ok.json", &default_doc());
        assert!(check(&ok).unwrap());
        fs::remove_file(ok).ok();
    }

    #[test]
    fn fitted_svg_export_frames_nodes() {
        let tree = MindMap::default().add_child(NodeId::root());
        let artifact = export(&tree, FormatArg::Svg, true, &EditorConfig::default()).unwrap();
        let ExportArtifact::Svg(svg) = artifact else {
            panic!("expected svg");
        };
        // Root ellipse starts at x = 340, padded by 40.
        assert!(svg.contains("viewBox=\"300 230"));
    }
}
