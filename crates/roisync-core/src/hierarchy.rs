//! Parent/child reconstruction.
//!
//! Objects are stored in an arena in input order and refer to each other by
//! identifier. A parent reference that cannot be honoured (unknown id, self
//! reference, or one that would close a cycle) leaves the object at the top
//! level; its `parent` field is kept as it was read.

use std::collections::HashMap;

use crate::ids::ObjectId;
use crate::object::LogicalObject;

/// Objects arranged as a forest of parent/child links
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationForest {
    objects: Vec<LogicalObject>,
    index: HashMap<ObjectId, usize>,
    links: Vec<Option<usize>>,
    roots: Vec<usize>,
}

impl AnnotationForest {
    /// Rebuild links from each object's `parent` reference.
    ///
    /// Roots and children keep input order. Existing `children` lists are
    /// replaced. Later duplicates of an identifier are dropped.
    pub fn reconstruct(objects: Vec<LogicalObject>) -> Self {
        let mut forest = Self::default();
        for mut object in objects {
            if forest.index.contains_key(&object.id) {
                tracing::warn!(id = %object.id, "duplicate object identifier, dropping later copy");
                continue;
            }
            object.children.clear();
            forest.index.insert(object.id, forest.objects.len());
            forest.objects.push(object);
        }

        forest.links = vec![None; forest.objects.len()];
        for i in 0..forest.objects.len() {
            let link = forest.resolve_parent(i);
            forest.links[i] = link;
        }

        for i in 0..forest.objects.len() {
            match forest.links[i] {
                Some(p) => {
                    let child = forest.objects[i].id;
                    forest.objects[p].children.push(child);
                }
                None => forest.roots.push(i),
            }
        }
        forest
    }

    fn resolve_parent(&self, i: usize) -> Option<usize> {
        let object = &self.objects[i];
        let parent_id = object.parent?;
        let Some(&p) = self.index.get(&parent_id) else {
            tracing::debug!(id = %object.id, parent = %parent_id, "parent not found, keeping object at top level");
            return None;
        };
        if p == i {
            tracing::warn!(id = %object.id, "object names itself as parent, keeping it at top level");
            return None;
        }
        let mut ancestor = Some(p);
        while let Some(a) = ancestor {
            if a == i {
                tracing::warn!(
                    id = %object.id,
                    parent = %parent_id,
                    "parent link would form a cycle, keeping object at top level"
                );
                return None;
            }
            ancestor = self.links[a];
        }
        Some(p)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All objects in input order
    pub fn objects(&self) -> &[LogicalObject] {
        &self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&LogicalObject> {
        self.index.get(&id).map(|&i| &self.objects[i])
    }

    /// Top-level objects in input order
    pub fn roots(&self) -> impl Iterator<Item = &LogicalObject> + '_ {
        self.roots.iter().map(|&i| &self.objects[i])
    }

    pub fn children(&self, id: ObjectId) -> impl Iterator<Item = &LogicalObject> + '_ {
        self.get(id)
            .into_iter()
            .flat_map(|object| object.children.iter())
            .filter_map(|child| self.get(*child))
    }

    /// Resolved parent, `None` for top-level objects
    pub fn parent_of(&self, id: ObjectId) -> Option<&LogicalObject> {
        let i = *self.index.get(&id)?;
        self.links[i].map(|p| &self.objects[p])
    }

    /// Number of ancestors above an object
    pub fn depth(&self, id: ObjectId) -> Option<usize> {
        let mut i = *self.index.get(&id)?;
        let mut depth = 0;
        while let Some(p) = self.links[i] {
            depth += 1;
            i = p;
        }
        Some(depth)
    }

    /// Pre-order walk: every object comes after its parent
    pub fn depth_first(&self) -> Vec<&LogicalObject> {
        let mut out = Vec::with_capacity(self.objects.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            let object = &self.objects[i];
            out.push(object);
            stack.extend(
                object
                    .children
                    .iter()
                    .rev()
                    .filter_map(|child| self.index.get(child).copied()),
            );
        }
        out
    }
}
