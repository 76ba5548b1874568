//! Relationship projection onto the CycloneDX dependency graph.
//!
//! Only direct-dependency relationship types survive. Edges touching files,
//! the document itself or sentinel ids are dropped, endpoints are mapped
//! through the ref table, and each adjacency list is deduplicated.

use indexmap::{IndexMap, IndexSet};

use crate::convert::identifiers::RefTable;
use crate::model::cyclonedx::Dependency;
use crate::model::spdx::{is_sentinel, SpdxDocument, SpdxRelationship};

/// Projects SPDX relationships into dependency entries.
pub struct RelationshipProjector<'a> {
    doc: &'a SpdxDocument,
    refs: &'a RefTable,
}

impl<'a> RelationshipProjector<'a> {
    #[must_use]
    pub const fn new(doc: &'a SpdxDocument, refs: &'a RefTable) -> Self {
        Self { doc, refs }
    }

    /// Whether an endpoint can take part in the dependency graph.
    fn is_package_endpoint(&self, id: &str) -> bool {
        !is_sentinel(id) && id != self.doc.document_id() && !self.doc.is_file_element(id)
    }

    /// The `(dependent, dependency)` pair for a relationship, if it is kept.
    fn edge(&self, rel: &'a SpdxRelationship) -> Option<(&'a str, &'a str)> {
        let kind = rel.kind();
        if !kind.is_dependency() {
            return None;
        }

        let from = rel.spdx_element_id.trim();
        let to = rel.related_spdx_element.trim();
        if !self.is_package_endpoint(from) || !self.is_package_endpoint(to) {
            return None;
        }

        if kind.is_reversed() {
            Some((to, from))
        } else {
            Some((from, to))
        }
    }

    /// Adjacency in first-seen order, with duplicates removed.
    #[must_use]
    pub fn adjacency(&self) -> IndexMap<String, IndexSet<String>> {
        let mut adjacency: IndexMap<String, IndexSet<String>> = IndexMap::new();
        let mut dropped = 0usize;

        for rel in &self.doc.relationships {
            let Some((from, to)) = self.edge(rel) else {
                dropped += 1;
                continue;
            };
            adjacency
                .entry(self.refs.resolve(from).to_string())
                .or_default()
                .insert(self.refs.resolve(to).to_string());
        }

        if dropped > 0 {
            tracing::debug!(dropped, "relationships not projected as dependencies");
        }
        adjacency
    }

    /// Dependency entries, one per component with at least one dependency.
    #[must_use]
    pub fn project(&self) -> Vec<Dependency> {
        self.adjacency()
            .into_iter()
            .filter(|(_, deps)| !deps.is_empty())
            .map(|(bom_ref, deps)| Dependency {
                bom_ref,
                depends_on: deps.into_iter().collect(),
            })
            .collect()
    }
}
