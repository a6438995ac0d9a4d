//! All criteria of one taxonomy, read from and written back to a query tree.

use crate::criterion::{Criterion, FacetCriterion};
use crate::localize::Localize;
use crate::rql::{Operator, Query, Value};
use crate::vocabulary::Taxonomy;
use std::fmt;

/// One criterion per classifiable vocabulary of a taxonomy
pub struct CriteriaSet<'a> {
    criteria: Vec<Criterion<'a>>,
    /// Query the criteria were restored from
    source: Option<Query>,
    /// Per criterion, index in `source.walk()` of the leaf it was restored from
    leaves: Vec<Option<usize>>,
}

impl<'a> CriteriaSet<'a> {
    /// Build criteria for every facet, restoring state from `query` when a
    /// leaf of it filters on the facet.
    pub fn new(taxonomy: &'a Taxonomy, query: Option<&Query>, localizer: &'a dyn Localize) -> Self {
        let nodes = query.map(Query::walk).unwrap_or_default();
        let mut criteria = Vec::new();
        let mut leaves = Vec::new();

        for facet in taxonomy.facets() {
            let mut criterion = Criterion::with_localizer(facet, localizer);
            let leaf = facet.find_query_node(nodes.iter().copied()).and_then(|node| {
                criterion.apply_query_node(node);
                nodes.iter().position(|n| std::ptr::eq(*n, node))
            });
            criteria.push(criterion);
            leaves.push(leaf);
        }

        CriteriaSet {
            criteria,
            source: query.cloned(),
            leaves,
        }
    }

    pub fn criterion(&self, name: &str) -> Option<&Criterion<'a>> {
        self.criteria.iter().find(|c| c.name() == name)
    }

    pub fn criterion_mut(&mut self, name: &str) -> Option<&mut Criterion<'a>> {
        self.criteria.iter_mut().find(|c| c.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Criterion<'a>> {
        self.criteria.iter()
    }

    /// Criteria that restrict anything
    pub fn active(&self) -> impl Iterator<Item = &Criterion<'a>> {
        self.criteria.iter().filter(|c| c.is_active())
    }

    /// Write the criteria back into the query they came from.
    ///
    /// Each leaf a criterion was restored from is replaced in place by the
    /// criterion's node, or dropped when the criterion is no longer active.
    /// Connectives and leaves on other fields are kept. Active criteria with
    /// no leaf are appended under `and(...)`; a single node is returned bare
    /// and an empty result gives `None`.
    pub fn to_query(&self, taxonomy: &str) -> Option<Query> {
        let mut owners = vec![None; self.source.as_ref().map_or(0, |q| q.walk().len())];
        for (criterion, leaf) in self.criteria.iter().zip(&self.leaves) {
            if let Some(index) = leaf {
                owners[*index] = Some(criterion);
            }
        }

        let mut next_leaf = 0;
        let spliced = self
            .source
            .as_ref()
            .and_then(|source| splice(source, &owners, &mut next_leaf, taxonomy));

        let fresh: Vec<Query> = self
            .criteria
            .iter()
            .zip(&self.leaves)
            .filter(|(criterion, leaf)| leaf.is_none() && criterion.is_active())
            .map(|(criterion, _)| criterion.to_query_node(taxonomy))
            .collect();

        match spliced {
            Some(mut root) if root.operator == Operator::And && root.is_connective() => {
                root.args.extend(fresh.into_iter().map(Value::Query));
                Some(root)
            }
            Some(root) if fresh.is_empty() => Some(root),
            Some(root) => Some(Query::and(std::iter::once(root).chain(fresh))),
            None => {
                let mut fresh = fresh;
                match fresh.len() {
                    0 => None,
                    1 => fresh.pop(),
                    _ => Some(Query::and(fresh)),
                }
            }
        }
    }
}

/// Rebuild `node`, visiting leaves in `Query::walk` order.
///
/// `None` means the node vanished: an inactive criterion's leaf, or a
/// connective left with no nested query.
fn splice(
    node: &Query,
    owners: &[Option<&Criterion<'_>>],
    next_leaf: &mut usize,
    taxonomy: &str,
) -> Option<Query> {
    if !node.is_connective() {
        let index = *next_leaf;
        *next_leaf += 1;
        return match owners.get(index).copied().flatten() {
            Some(criterion) if criterion.is_active() => Some(criterion.to_query_node(taxonomy)),
            Some(_) => None,
            None => Some(node.clone()),
        };
    }

    let mut rebuilt = Query::new(node.operator.clone());
    for arg in &node.args {
        match arg {
            Value::Query(child) => {
                if let Some(child) = splice(child, owners, next_leaf, taxonomy) {
                    rebuilt.push(child);
                }
            }
            other => {
                rebuilt.push(other.clone());
            }
        }
    }

    if rebuilt.args.iter().any(|arg| arg.as_query().is_some()) {
        Some(rebuilt)
    } else {
        None
    }
}

impl fmt::Display for CriteriaSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, criterion) in self.active().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", criterion)?;
        }
        Ok(())
    }
}
