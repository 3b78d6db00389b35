//! Forest assembly from flat parent-pointer lists.
//!
//! Both the plain mod catalog and the per-car status list are stored flat,
//! each row carrying an optional parent id. [`build_forest`] nests them using
//! an id index built once per call, so finding a node's parent or children is
//! a map lookup rather than a rescan of the list.
//!
//! Rows whose ancestor chain ends at an id that is not in the list are left
//! out of the forest and reported in [`Forest::detached`]. A chain that loops
//! back on itself is rejected with [`TreeError::Cycle`].

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use thiserror::Error;

/// A row that can be placed in a forest by its parent reference
pub trait TreeItem {
    fn node_id(&self) -> &str;
    fn parent_node_id(&self) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode<T> {
    pub item: T,
    pub children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    /// Number of nodes in this subtree, including itself
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }

    /// Stable sort of children at every level
    pub fn sort_recursive_by<F>(&mut self, compare: &F)
    where
        F: Fn(&T, &T) -> Ordering,
    {
        sort_forest_by(&mut self.children, compare);
    }
}

/// Stable sort of a list of roots and, recursively, of all their children
pub fn sort_forest_by<T, F>(nodes: &mut [TreeNode<T>], compare: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    nodes.sort_by(|a, b| compare(&a.item, &b.item));
    for node in nodes.iter_mut() {
        node.sort_recursive_by(compare);
    }
}

/// A row excluded from the forest because an ancestor id does not exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detached {
    pub id: String,
    /// First id on the parent chain that could not be resolved
    pub missing_ancestor_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Forest<T> {
    pub roots: Vec<TreeNode<T>>,
    pub detached: Vec<Detached>,
}

impl<T> Forest<T> {
    /// Number of nodes attached under some root
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(TreeNode::size).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("duplicate id '{0}' in tree input")]
    DuplicateId(String),

    #[error("parent cycle detected: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },
}

#[derive(Debug, Clone)]
enum Reach {
    Rooted,
    Dangling(String),
}

/// Nest a flat list into a forest.
///
/// Roots keep input order, as do the children of each node.
pub fn build_forest<T: TreeItem>(items: Vec<T>) -> Result<Forest<T>, TreeError> {
    let ids: Vec<String> = items.iter().map(|i| i.node_id().to_string()).collect();

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(ids.len());
    for (pos, id) in ids.iter().enumerate() {
        if index.insert(id.as_str(), pos).is_some() {
            return Err(TreeError::DuplicateId(id.clone()));
        }
    }

    // Resolve each parent reference to a position once
    let mut parents: Vec<Option<Result<usize, String>>> = Vec::with_capacity(items.len());
    for item in &items {
        parents.push(item.parent_node_id().map(|pid| match index.get(pid) {
            Some(&pos) => Ok(pos),
            None => Err(pid.to_string()),
        }));
    }

    let reach = classify(&ids, &parents)?;

    let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut root_positions = Vec::new();
    let mut detached = Vec::new();
    for (pos, parent) in parents.iter().enumerate() {
        match &reach[pos] {
            Reach::Dangling(missing) => detached.push(Detached {
                id: ids[pos].clone(),
                missing_ancestor_id: missing.clone(),
            }),
            Reach::Rooted => match parent {
                None => root_positions.push(pos),
                Some(Ok(parent_pos)) => children.entry(*parent_pos).or_default().push(pos),
                // An unresolved parent always classifies as Dangling
                Some(Err(_)) => {}
            },
        }
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let roots = root_positions
        .into_iter()
        .map(|pos| attach(pos, &mut slots, &children, &ids))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Forest { roots, detached })
}

/// Walk every parent chain, memoising whether it ends at a root or at a
/// missing id. Fails on the first chain that revisits a node.
fn classify(
    ids: &[String],
    parents: &[Option<Result<usize, String>>],
) -> Result<Vec<Reach>, TreeError> {
    let mut reach: Vec<Option<Reach>> = vec![None; ids.len()];

    for start in 0..ids.len() {
        let mut path: Vec<usize> = Vec::new();
        let mut on_path: HashSet<usize> = HashSet::new();
        let mut current = start;

        let outcome = loop {
            if let Some(known) = &reach[current] {
                break known.clone();
            }
            if !on_path.insert(current) {
                let cycle_start = path.iter().position(|&p| p == current).unwrap_or(0);
                let mut cycle: Vec<String> =
                    path[cycle_start..].iter().map(|&p| ids[p].clone()).collect();
                cycle.push(ids[current].clone());
                return Err(TreeError::Cycle { path: cycle });
            }
            path.push(current);

            match &parents[current] {
                None => break Reach::Rooted,
                Some(Ok(parent_pos)) => current = *parent_pos,
                Some(Err(missing)) => break Reach::Dangling(missing.clone()),
            }
        };

        for pos in path {
            reach[pos] = Some(outcome.clone());
        }
    }

    Ok(reach
        .into_iter()
        .map(|r| r.unwrap_or(Reach::Rooted))
        .collect())
}

fn attach<T>(
    pos: usize,
    slots: &mut [Option<T>],
    children: &HashMap<usize, Vec<usize>>,
    ids: &[String],
) -> Result<TreeNode<T>, TreeError> {
    // Taking the slot doubles as the visited mark
    let item = slots[pos].take().ok_or_else(|| TreeError::Cycle {
        path: vec![ids[pos].clone(), ids[pos].clone()],
    })?;

    let child_nodes = match children.get(&pos) {
        Some(list) => list
            .iter()
            .map(|&child| attach(child, slots, children, ids))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(TreeNode {
        item,
        children: child_nodes,
    })
}
