// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BoxClip CLI: evaluate clip quads for a scene, bake them into a shader, or
//! reverse a bake.
//!
//! Usage:
//!   boxclip evaluate <scene.json>
//!   boxclip bake <scene.json> <shader> [--target ID] [--output DIR] [--snapshot PATH]
//!   boxclip unbake <shader> [--target ID] [--output PATH]

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::json;

use boxclip_assets::{parent_dir, AssetStore, GenerationTarget};
use boxclip_codegen::{BakeRequest, CodeGenerator, INCLUDE_FILES};
use boxclip_geometry::{ClipStateEvaluator, Consumer};

mod config;
mod scene_file;

use config::Config;
use scene_file::{LoadedScene, SceneFile};

/// Positional arguments plus the flags shared by every command
#[derive(Debug, Default)]
struct Options {
    positional: Vec<String>,
    target: Option<String>,
    output: Option<String>,
    snapshot: Option<String>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut options = Options::default();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                flag @ ("--target" | "--output" | "--snapshot") => {
                    i += 1;
                    let value = args
                        .get(i)
                        .cloned()
                        .with_context(|| format!("{} needs a value", flag))?;
                    match flag {
                        "--target" => options.target = Some(value),
                        "--output" => options.output = Some(value),
                        _ => options.snapshot = Some(value),
                    }
                }
                other if other.starts_with("--") => bail!("Unknown option: {}", other),
                other => options.positional.push(other.to_string()),
            }
            i += 1;
        }
        Ok(options)
    }

    fn positional(&self, index: usize, what: &str) -> Result<&str> {
        self.positional
            .get(index)
            .map(String::as_str)
            .with_context(|| format!("missing {}", what))
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info,boxclip=debug".into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    let config = Config::from_env();
    tracing::debug!(
        generated_dir = %config.generated_dir,
        scan_limit = config.scan_limit,
        target_id = ?config.target_id,
        "Loaded configuration"
    );

    let options = Options::parse(&args[2..])?;
    if !COMMANDS.contains(&args[1].as_str()) {
        print_usage();
    }
    run(&args[1], &options, &config)
}

const COMMANDS: [&str; 3] = ["evaluate", "bake", "unbake"];

fn run(command: &str, options: &Options, config: &Config) -> Result<()> {
    match command {
        "evaluate" => evaluate(options),
        "bake" => bake(options, config),
        "unbake" => unbake(options, config),
        other => bail!("Unknown command: {}", other),
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  boxclip evaluate <scene.json>");
    eprintln!("  boxclip bake <scene.json> <shader> [--target ID] [--output DIR] [--snapshot PATH]");
    eprintln!("  boxclip unbake <shader> [--target ID] [--output PATH]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  BOXCLIP_TARGET_ID       target identity to bake for");
    eprintln!("  BOXCLIP_GENERATED_DIR   output directory for baked shaders (default: Generated)");
    eprintln!("  BOXCLIP_SCAN_LIMIT      comment-skip limit of the source scanner (default: 1000)");
    eprintln!("  RUST_LOG                log filter (default: info,boxclip=debug)");
}

fn load_scene(path: &str) -> Result<LoadedScene> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    let mut loaded = SceneFile::from_json(&text)?.load()?;
    let report = loaded.scene.reconcile();
    tracing::info!(
        created = report.created.len(),
        adjusted_depths = report.adjusted_depths,
        "Loaded scene {}",
        path
    );
    Ok(loaded)
}

fn evaluate(options: &Options) -> Result<()> {
    let loaded = load_scene(options.positional(0, "scene file")?)?;

    let mut evaluator = ClipStateEvaluator::new();
    let consumer = evaluator.track(Consumer::Renderer {
        frame: loaded.target.clone(),
    });
    let report = evaluator.tick(&loaded.scene, &loaded.settings);
    if let Some((_, e)) = report.failures.into_iter().next() {
        return Err(e).context("evaluating scene");
    }
    let overrides = evaluator
        .overrides(consumer)
        .context("no overrides were written")?;

    let categories: serde_json::Map<String, serde_json::Value> = overrides
        .categories
        .iter()
        .map(|(category, quads)| {
            let rows: Vec<_> = quads.as_slice().iter().map(|q| q.channels()).collect();
            (
                category.to_string(),
                json!({ "count": quads.len(), "quads": rows }),
            )
        })
        .collect();

    let output = json!({
        "categories": categories,
        "scale": overrides.scale,
        "allow_in_front": overrides.allow_in_front,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn bake(options: &Options, config: &Config) -> Result<()> {
    let loaded = load_scene(options.positional(0, "scene file")?)?;
    let shader_path = options.positional(1, "shader path")?;
    let generated_dir = options
        .output
        .clone()
        .unwrap_or_else(|| config.generated_dir.clone());

    let categories = loaded
        .scene
        .evaluate_all(&loaded.target, &loaded.settings.encode_settings())
        .context("evaluating scene")?;

    let gen = CodeGenerator::with_iteration_limit(config.scan_limit);
    let source =
        fs::read_to_string(shader_path).with_context(|| format!("reading {}", shader_path))?;
    let name = gen.declared_name(&source)?;

    let mut store = AssetStore::new();
    let shader = store.add_shader(name, shader_path, source);
    let source_dir = parent_dir(shader_path);
    for file in INCLUDE_FILES {
        let path = if source_dir.is_empty() {
            file.to_string()
        } else {
            format!("{}/{}", source_dir, file)
        };
        if let Ok(text) = fs::read_to_string(&path) {
            store.write_document(path, text);
        }
    }
    store.add_folder(generated_dir.clone());

    let mut target = GenerationTarget::resolve(&store, &generated_dir)?;
    if let Some(id) = options.target.clone().or_else(|| config.target_id.clone()) {
        target.identity = id;
    }

    let request = BakeRequest::new(&target.identity, &categories)
        .with_scale(loaded.settings.scale)
        .with_allow_in_front(loaded.settings.allow_in_front);
    let baked = gen.bake_shader(&mut store, &target, shader, &request)?;

    fs::create_dir_all(&generated_dir).with_context(|| format!("creating {}", generated_dir))?;
    let baked = store.shader(baked)?;
    fs::write(&baked.path, &baked.source).with_context(|| format!("writing {}", baked.path))?;
    for (path, text) in store.documents() {
        if target.owns(path) {
            fs::write(path, text).with_context(|| format!("writing {}", path))?;
        }
    }
    if let Some(snapshot) = &options.snapshot {
        fs::write(snapshot, store.to_json()?).with_context(|| format!("writing {}", snapshot))?;
    }

    tracing::info!(
        shader = %baked.name,
        path = %baked.path,
        quads = categories.total(),
        "Baked shader"
    );
    println!("{}", baked.path);
    Ok(())
}

fn unbake(options: &Options, config: &Config) -> Result<()> {
    let shader_path = options.positional(0, "shader path")?;
    let source =
        fs::read_to_string(shader_path).with_context(|| format!("reading {}", shader_path))?;
    let gen = CodeGenerator::with_iteration_limit(config.scan_limit);

    let target = match options.target.clone().or_else(|| config.target_id.clone()) {
        Some(id) => id,
        None => gen.baked_target(&source)?,
    };
    let restored = gen.unbake_source(&source, &target)?;

    match &options.output {
        Some(path) => {
            if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            fs::write(path, restored).with_context(|| format!("writing {}", path))?;
            tracing::info!(path = %path, "Unbaked shader");
        }
        None => print!("{}", restored),
    }
    Ok(())
}
