//! Root resolution: the elements a snapshot's query was about.
//!
//! Roots are resolved strictly — the graph service guarantees every root has a
//! vertex, so a miss here is an integrity error, never a soft `None`. The
//! `is_*_rooted` guards let callers narrow the root kind before reaching for
//! one of the typed accessors.

use crate::error::SubgraphError;
use crate::identifier::GraphElementVertexId;
use crate::knowledge::Entity;
use crate::ontology::{DataTypeWithMetadata, EntityTypeWithMetadata, PropertyTypeWithMetadata};
use crate::subgraph::vertex::ElementRef;
use crate::subgraph::Subgraph;

fn resolve_root<'s>(
    subgraph: &'s Subgraph,
    root: &GraphElementVertexId,
) -> Result<ElementRef<'s>, SubgraphError> {
    let element = match root {
        GraphElementVertexId::Ontology(id) => {
            subgraph.vertices.ontology_vertex(id).map(ElementRef::from)
        }
        GraphElementVertexId::KnowledgeGraph(id) => {
            subgraph.vertices.entity_vertex(id).map(ElementRef::from)
        }
    };
    element.ok_or_else(|| SubgraphError::RootVertexMissing {
        vertex_id: root.to_string(),
    })
}

/// Resolve all root elements, of whatever kind.
///
/// # Errors
///
/// Returns an error if any root identifier has no corresponding vertex.
pub fn roots(subgraph: &Subgraph) -> Result<Vec<ElementRef<'_>>, SubgraphError> {
    subgraph
        .roots
        .iter()
        .map(|root| resolve_root(subgraph, root))
        .collect()
}

macro_rules! typed_roots {
    ($name:ident, $guard:ident, $variant:ident, $element:ty, $kind:literal) => {
        /// Resolve all roots as elements of one kind.
        ///
        /// # Errors
        ///
        /// Returns an error if any root has no vertex, or if any root's vertex
        /// is of a different element kind.
        pub fn $name(subgraph: &Subgraph) -> Result<Vec<&$element>, SubgraphError> {
            subgraph
                .roots
                .iter()
                .map(|root| match resolve_root(subgraph, root)? {
                    ElementRef::$variant(element) => Ok(element),
                    other => Err(SubgraphError::WrongVertexKind {
                        vertex_id: root.to_string(),
                        expected: $kind,
                        found: other.kind(),
                    }),
                })
                .collect()
        }

        /// Whether every root resolves to an element of this kind.
        ///
        /// A root of another kind yields `false`; a root with no vertex at all
        /// is still an integrity error.
        pub fn $guard(subgraph: &Subgraph) -> Result<bool, SubgraphError> {
            for root in &subgraph.roots {
                if !matches!(resolve_root(subgraph, root)?, ElementRef::$variant(_)) {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    };
}

typed_roots!(
    roots_as_data_types,
    is_data_type_rooted,
    DataType,
    DataTypeWithMetadata,
    "dataType"
);
typed_roots!(
    roots_as_property_types,
    is_property_type_rooted,
    PropertyType,
    PropertyTypeWithMetadata,
    "propertyType"
);
typed_roots!(
    roots_as_entity_types,
    is_entity_type_rooted,
    EntityType,
    EntityTypeWithMetadata,
    "entityType"
);
typed_roots!(roots_as_entities, is_entity_rooted, Entity, Entity, "entity");
