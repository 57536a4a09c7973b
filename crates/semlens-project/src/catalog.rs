//! Read-only lookup interface over a project's entities.

use semlens_model::{DataBundle, JoinDefinition, SemanticSchema, VirtualBundle};

/// Entity lookups the join, view and lineage operations need.
///
/// [`crate::Project`] implements this over its in-memory lists; other
/// stores can implement it to reuse the free functions in this crate.
pub trait Catalog {
    fn bundles(&self) -> &[DataBundle];
    fn joins(&self) -> &[JoinDefinition];
    fn virtual_bundles(&self) -> &[VirtualBundle];
    fn schemas(&self) -> &[SemanticSchema];

    fn bundle(&self, id: &str) -> Option<&DataBundle> {
        self.bundles().iter().find(|bundle| bundle.id == id)
    }

    fn join(&self, id: &str) -> Option<&JoinDefinition> {
        self.joins().iter().find(|join| join.id == id)
    }

    fn virtual_bundle(&self, id: &str) -> Option<&VirtualBundle> {
        self.virtual_bundles().iter().find(|vb| vb.id == id)
    }

    fn schema(&self, id: &str) -> Option<&SemanticSchema> {
        self.schemas().iter().find(|schema| schema.id == id)
    }
}
