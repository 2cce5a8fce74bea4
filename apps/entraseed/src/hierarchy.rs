//! Bookkeeping for the nested group hierarchy.
//!
//! The generator only ever attaches new children to parents already in the
//! forest, so the structure stays cycle-free by construction. Each node
//! records its level (roots at 0, children one below their parent), and a
//! parent is eligible for more children only while its level is strictly
//! below the configured maximum. That keeps every chain within the depth
//! bound even as the hierarchy grows pass by pass.

use std::collections::{HashMap, HashSet};

/// Children attached to one parent per growth pass, regardless of the
/// Poisson draw.
pub const MAX_CHILDREN_PER_PASS: usize = 5;

/// The created groups and their parent/child relationships.
#[derive(Debug, Default)]
pub struct Forest {
    children: HashMap<String, Vec<String>>,
    levels: HashMap<String, usize>,
    order: Vec<String>,
}

impl Forest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a top-level group.
    pub fn record_root(&mut self, id: impl Into<String>) {
        self.insert(id.into(), 0);
    }

    /// Records a child under an existing parent.
    ///
    /// A child recorded under an id the forest has never seen becomes a
    /// root.
    pub fn record_child(&mut self, parent_id: &str, id: impl Into<String>) {
        let id = id.into();
        let level = self.levels.get(parent_id).map_or(0, |level| level + 1);
        if let Some(siblings) = self.children.get_mut(parent_id) {
            siblings.push(id.clone());
        }
        self.insert(id, level);
    }

    fn insert(&mut self, id: String, level: usize) {
        if self.levels.insert(id.clone(), level).is_none() {
            self.order.push(id.clone());
        }
        self.children.entry(id).or_default();
    }

    /// Groups that can take another child without pushing that child past
    /// `max_depth`, in creation order.
    #[must_use]
    pub fn eligible_parents(&self, max_depth: usize) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| {
                self.levels
                    .get(id.as_str())
                    .is_some_and(|level| *level < max_depth)
            })
            .cloned()
            .collect()
    }

    /// Level of a group, if it is in the forest.
    #[must_use]
    pub fn level(&self, id: &str) -> Option<usize> {
        self.levels.get(id).copied()
    }

    /// All group ids in creation order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Longest chain length below a group; a leaf has depth 0.
    ///
    /// Walks the child lists rather than the recorded levels, so tests can
    /// cross-check the two. Revisited nodes count as leaves, which keeps
    /// the walk finite on arbitrary input.
    #[must_use]
    pub fn depth(&self, id: &str) -> usize {
        let mut visited = HashSet::new();
        self.depth_guarded(id, &mut visited)
    }

    fn depth_guarded<'a>(&'a self, id: &'a str, visited: &mut HashSet<&'a str>) -> usize {
        if !visited.insert(id) {
            return 0;
        }

        let depth = self.children.get(id).map_or(0, |kids| {
            kids.iter()
                .map(|kid| self.depth_guarded(kid, visited))
                .max()
                .map_or(0, |deepest| deepest + 1)
        });

        visited.remove(id);
        depth
    }

    /// Deepest chain in the whole forest.
    #[must_use]
    pub fn max_observed_depth(&self) -> usize {
        self.order
            .iter()
            .filter(|id| self.levels.get(id.as_str()) == Some(&0))
            .map(|id| self.depth(id))
            .max()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn root_count(&self) -> usize {
        self.levels.values().filter(|level| **level == 0).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// How many of `total` groups are created as roots before nesting starts.
#[must_use]
pub fn root_quota(total: usize) -> usize {
    // 30% of the total, rounded up, at least one.
    (total * 3).div_ceil(10).max(1)
}

/// Caps one parent's child count at the Poisson draw, the remaining group
/// budget, and the per-pass maximum.
#[must_use]
pub fn clamp_branch(drawn: usize, remaining: usize) -> usize {
    drawn.min(remaining).min(MAX_CHILDREN_PER_PASS)
}
