use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::info;

use semlens_ingest::{IngestOptions, load_path};
use semlens_lineage::LineageGraph;
use semlens_model::{DataBundle, builtin_schemas};
use semlens_project::{Catalog, JoinCache, Project, view_virtual_bundle};
use semlens_transform::{TransformOptions, profile_columns};

use semlens_cli::render::{mapping_issue_table, parse_mapping, profile_table, schema_table};

use crate::cli::{AddArgs, InitArgs, JoinArgs, LineageArgs, LineageFormatArg, ProfileArgs, ViewArgs};

pub fn run_schemas() -> Result<()> {
    println!("{}", schema_table(&builtin_schemas()));
    Ok(())
}

pub fn run_profile(args: &ProfileArgs) -> Result<()> {
    let options = IngestOptions::default().with_infer_types(!args.no_infer);
    let source = load_path(&args.file, &options)
        .with_context(|| format!("load {}", args.file.display()))?;
    let profiles = profile_columns(
        &source,
        &[],
        &TransformOptions::default().with_top_values_limit(args.top),
    );

    if args.json {
        print_json(&profiles)
    } else {
        println!(
            "{}: {} rows, {} columns",
            source.file_name,
            source.row_count(),
            source.column_count()
        );
        println!("{}", profile_table(&profiles));
        Ok(())
    }
}

pub fn run_init(args: &InitArgs) -> Result<()> {
    if args.project.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.project.display()
        );
    }
    Project::new(&args.name).save(&args.project)?;
    println!("Created project {}", args.project.display());
    Ok(())
}

pub fn run_add(args: &AddArgs) -> Result<()> {
    let path = &args.project.project;
    let mut project = Project::load(path)?;

    let source = load_path(&args.file, &IngestOptions::default())
        .with_context(|| format!("load {}", args.file.display()))?;
    let stem = file_stem(&args.file);
    let id = args.id.clone().unwrap_or_else(|| stem.clone());
    let mappings = args
        .mappings
        .iter()
        .map(String::as_str)
        .map(parse_mapping)
        .collect::<Result<Vec<_>>>()?;

    let now = Utc::now();
    let bundle = DataBundle::new(&id, stem, &args.schema, source, now).with_mappings(mappings, now);
    let report = project.add_bundle(bundle)?;
    project.save(path)?;

    info!(bundle_id = %id, usable = report.is_usable(), "bundle stored");
    println!("Added bundle '{id}' to {}", path.display());
    if !report.issues.is_empty() {
        println!("{}", mapping_issue_table(&report.issues));
    }
    Ok(())
}

pub fn run_view(args: &ViewArgs) -> Result<()> {
    let project = Project::load(&args.project.project)?;
    let options = TransformOptions::default().with_top_values_limit(args.top);

    let view = if project.virtual_bundle(&args.bundle).is_some() {
        let mut cache = JoinCache::new();
        view_virtual_bundle(&project, &args.bundle, &mut cache, &options)?
    } else {
        project.view(&args.bundle, &options)?
    };
    if view.is_empty() {
        tracing::warn!(bundle_id = %args.bundle, view = %view.data_type(), "view has no data");
    }
    print_json(&view)
}

pub fn run_join(args: &JoinArgs) -> Result<()> {
    let project = Project::load(&args.project.project)?;
    let result = project.execute_join(&args.join)?;

    info!(
        join_id = %args.join,
        rows = result.stats.result_rows,
        matched_left = result.stats.matched_left_rows,
        matched_right = result.stats.matched_right_rows,
        "join executed"
    );
    if args.flat {
        print_json(&result.to_flat_rows())
    } else {
        print_json(&result)
    }
}

pub fn run_lineage(args: &LineageArgs) -> Result<()> {
    let project = Project::load(&args.project.project)?;
    let graph: LineageGraph = project.lineage();

    if let Some(bundle_id) = &args.impact {
        if !graph.contains(bundle_id) {
            bail!("'{bundle_id}' is not a bundle or virtual bundle in this project");
        }
        return print_json(&graph.impact_of(bundle_id));
    }
    if graph.has_circular_dependencies() {
        tracing::warn!("lineage graph contains a cycle");
    }
    match args.format {
        LineageFormatArg::Viz => print_json(&graph.to_visualization()),
        LineageFormatArg::Kg => print_json(&graph.to_knowledge_graph()),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bundle".to_string())
}
