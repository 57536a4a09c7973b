//! Operations that only read a [`Catalog`].

use std::sync::Arc;

use semlens_join::{JoinError, JoinResult, JoinSide};
use semlens_lineage::LineageGraph;
use semlens_model::{DataBundle, DataSource, DataType, SourceType};
use semlens_transform::{TransformOptions, ViewData, transform};

use crate::cache::JoinCache;
use crate::catalog::Catalog;
use crate::error::{ProjectError, Result};

/// Look up a join and both of its bundles, then run it.
pub fn execute_join(catalog: &impl Catalog, join_id: &str) -> Result<JoinResult> {
    let join = catalog
        .join(join_id)
        .ok_or_else(|| ProjectError::not_found("Join", join_id))?;
    let (left, right) = join_bundles(catalog, &join.left_bundle_id, &join.right_bundle_id)?;
    Ok(semlens_join::execute_join(left, right, join)?)
}

fn join_bundles<'a, C: Catalog>(
    catalog: &'a C,
    left_id: &str,
    right_id: &str,
) -> Result<(&'a DataBundle, &'a DataBundle)> {
    let left = catalog
        .bundle(left_id)
        .ok_or_else(|| JoinError::BundleNotFound {
            side: JoinSide::Left,
            bundle_id: left_id.to_string(),
        })?;
    let right = catalog
        .bundle(right_id)
        .ok_or_else(|| JoinError::BundleNotFound {
            side: JoinSide::Right,
            bundle_id: right_id.to_string(),
        })?;
    Ok((left, right))
}

/// Rows of a virtual bundle, computed from the current source bundles.
///
/// Only the first source join is executed; any further joins are lineage
/// metadata. The cache returns a stored result only while the join and both
/// bundles are unchanged, so the output never differs from a fresh run.
pub fn materialize_virtual_bundle(
    catalog: &impl Catalog,
    virtual_bundle_id: &str,
    cache: &mut JoinCache,
) -> Result<Arc<JoinResult>> {
    let virtual_bundle = catalog
        .virtual_bundle(virtual_bundle_id)
        .ok_or_else(|| ProjectError::not_found("Virtual bundle", virtual_bundle_id))?;
    let join_id = virtual_bundle
        .source_join_ids
        .first()
        .ok_or_else(|| ProjectError::NoSourceJoins(virtual_bundle.id.clone()))?;
    let join = catalog
        .join(join_id)
        .ok_or_else(|| ProjectError::not_found("Join", join_id))?;
    let (left, right) = join_bundles(catalog, &join.left_bundle_id, &join.right_bundle_id)?;

    tracing::debug!(virtual_bundle = %virtual_bundle.id, join_id = %join.id, "materializing");
    cache.get_or_try_insert(join, left, right, || {
        semlens_join::execute_join(left, right, join).map_err(ProjectError::from)
    })
}

/// Render a bundle with the transform its schema's data type selects.
pub fn view(
    catalog: &impl Catalog,
    bundle_id: &str,
    options: &TransformOptions,
) -> Result<ViewData> {
    let bundle = catalog
        .bundle(bundle_id)
        .ok_or_else(|| ProjectError::not_found("Bundle", bundle_id))?;
    let schema = catalog
        .schema(&bundle.schema_id)
        .ok_or_else(|| ProjectError::not_found("Schema", &bundle.schema_id))?;
    Ok(transform(schema.data_type, &bundle.source, &bundle.mappings, options))
}

/// Column profile of a virtual bundle's flattened rows.
///
/// Virtual bundles carry no mappings, so only the tabular view applies.
pub fn view_virtual_bundle(
    catalog: &impl Catalog,
    virtual_bundle_id: &str,
    cache: &mut JoinCache,
    options: &TransformOptions,
) -> Result<ViewData> {
    let result = materialize_virtual_bundle(catalog, virtual_bundle_id, cache)?;
    let source = DataSource::new(
        SourceType::Json,
        virtual_bundle_id,
        result.flat_columns(),
        result.to_flat_rows(),
    );
    Ok(transform(DataType::Tabular, &source, &[], options))
}

/// Lineage graph of every entity in the catalog.
pub fn lineage(catalog: &impl Catalog) -> LineageGraph {
    LineageGraph::build(
        catalog.bundles(),
        catalog.joins(),
        catalog.virtual_bundles(),
        catalog.schemas(),
    )
}
