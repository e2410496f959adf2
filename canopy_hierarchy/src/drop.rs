// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-over feedback, auto-scroll and drop reparenting.
//!
//! A drop is planned against the graph as it is, and only applied once the
//! whole plan is valid. A rejected drop leaves the graph untouched.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Debug};
use core::hash::Hash;

use canopy_graph::{GraphError, SceneGraph, SceneGraphMut, ancestors, is_ancestor_or_self};
use canopy_outline::{NodeId, Row};
use hashbrown::HashSet;
use log::debug;
use smallvec::SmallVec;

use crate::Hierarchy;

/// Where over a row the pointer is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DropPosition {
    /// Within the edge band at the top of the row.
    Above,
    /// Over the middle of the row.
    Onto,
    /// Within the edge band at the bottom of the row.
    Below,
}

/// What the controller did after an accepted drop.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DropOutcome {
    /// The dragged objects were re-selected and scrolled into view.
    Focused,
    /// The outline was refreshed in place.
    Refreshed,
}

/// Why a drop was rejected. The graph is unchanged in every case.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DropRejected {
    /// Reorganizing by drag-and-drop is turned off.
    ReorganizeDisabled,
    /// Drops are ignored while a search query is active.
    SearchMode,
    /// None of the dragged handles is alive.
    NothingDragged,
    /// The target row is gone or bound to a destroyed object.
    TargetGone,
    /// An object was dropped onto itself.
    OntoItself,
    /// An object was dropped onto one of its descendants.
    OntoDescendant,
    /// The drop would change a virtual group, which is not allowed.
    VirtualLocked,
    /// The drop would not move anything.
    NothingToMove,
    /// The graph refused a mutation.
    Graph(GraphError),
}

impl fmt::Display for DropRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReorganizeDisabled => f.write_str("reorganizing is disabled"),
            Self::SearchMode => f.write_str("drops are ignored in search mode"),
            Self::NothingDragged => f.write_str("no live object is being dragged"),
            Self::TargetGone => f.write_str("drop target is gone"),
            Self::OntoItself => f.write_str("object dropped onto itself"),
            Self::OntoDescendant => f.write_str("object dropped onto its own descendant"),
            Self::VirtualLocked => f.write_str("virtual groups cannot be changed by dropping"),
            Self::NothingToMove => f.write_str("drop would not move anything"),
            Self::Graph(err) => write!(f, "graph rejected the move: {err}"),
        }
    }
}

impl core::error::Error for DropRejected {}

impl From<GraphError> for DropRejected {
    fn from(err: GraphError) -> Self {
        Self::Graph(err)
    }
}

/// One mutation of a drop plan.
#[derive(Clone, Debug)]
enum Step<K, S> {
    SetParent(K, Option<K>),
    /// Clamped, so `usize::MAX` moves to the end.
    SetSiblingIndex(K, usize),
    MoveToScene(K, S),
    VirtualInsert {
        name: String,
        index: Option<usize>,
        keys: Vec<K>,
    },
    VirtualReplace {
        name: String,
        old: K,
        new: K,
    },
}

/// Final ordering of the moved objects among their new siblings.
#[derive(Copy, Clone, Debug)]
enum Placement<K> {
    /// Consecutive indices starting at this one.
    At(usize),
    Before(K),
    After(K),
}

#[derive(Debug)]
struct Plan<K, S> {
    steps: SmallVec<[Step<K, S>; 8]>,
    placement: Option<Placement<K>>,
    moved: Vec<K>,
    focus: bool,
}

impl<K, S> Plan<K, S> {
    fn new(moved: Vec<K>) -> Self {
        Self {
            steps: SmallVec::new(),
            placement: None,
            moved,
            focus: false,
        }
    }
}

impl<K, S> Hierarchy<K, S>
where
    K: Copy + Eq + Hash + Debug,
    S: Copy + Eq + Debug,
{
    /// Row under `pointer_y` (relative to the viewport top) and where over it.
    ///
    /// `None` when the pointer is below the last row.
    pub fn drop_position(&mut self, pointer_y: f64) -> Option<(usize, DropPosition)> {
        self.sync_rows();
        let row = self.viewport.row_at(pointer_y)?;
        let height = self.viewport.row_height();
        let top = row as f64 * height;
        let within = pointer_y + self.viewport.scroll_offset() - top;
        let edge = self.config.drop.edge_area;
        let position = if within < edge {
            DropPosition::Above
        } else if within > height - edge {
            DropPosition::Below
        } else {
            DropPosition::Onto
        };
        Some((row, position))
    }

    /// Updates auto-scroll for a drag at `pointer_y` and reports the drop
    /// position under it.
    ///
    /// Inside the scroll band at the top or bottom of the viewport the list
    /// scrolls, faster the closer the pointer is to the edge. Returns `None`
    /// without scrolling when drops are not accepted.
    pub fn on_drag_over(&mut self, pointer_y: f64) -> Option<(usize, DropPosition)> {
        if !self.config.drop.can_reorganize || self.is_searching() {
            self.auto_scroll = 0.0;
            return None;
        }
        let area = self.config.drop.scroll_area;
        let extent = self.viewport.viewport_extent();
        let content_y = pointer_y + self.viewport.scroll_offset();
        let amount = if area <= 0.0 || content_y < 0.0 {
            0.0
        } else if pointer_y < area {
            (area - pointer_y) / area
        } else if pointer_y > extent - area {
            (extent - area - pointer_y) / area
        } else {
            0.0
        };
        self.auto_scroll = amount * self.config.drop.scroll_speed;
        self.drop_position(pointer_y)
    }

    /// Stops auto-scrolling when the drag leaves the list.
    pub fn on_drag_exit(&mut self) {
        self.auto_scroll = 0.0;
    }

    /// Current auto-scroll speed in rows per second; positive scrolls up.
    #[must_use]
    pub fn auto_scroll_speed(&self) -> f64 {
        self.auto_scroll
    }

    /// Drops `dragged` at `pointer_y`; see [`Hierarchy::drop_on_row`].
    pub fn on_drop<G>(&mut self, graph: &mut G, pointer_y: f64, dragged: &[K]) -> Result<DropOutcome, DropRejected>
    where
        G: SceneGraphMut<Key = K, Scene = S> + ?Sized,
    {
        match self.drop_position(pointer_y) {
            Some((row, position)) => self.drop_on_row(graph, Some(row), position, dragged),
            None => self.drop_on_row(graph, None, DropPosition::Onto, dragged),
        }
    }

    /// Drops `dragged` on `row` (`None` for the blank space below the rows).
    ///
    /// - Blank space turns the dragged objects into scene roots.
    /// - [`DropPosition::Onto`] an object makes them its last children.
    /// - [`DropPosition::Above`] or [`DropPosition::Below`] an object makes
    ///   them its siblings right before or after it. Below an expanded object
    ///   makes them its first children instead.
    /// - Onto a scene header moves them to that scene's roots.
    /// - Onto a virtual group header, or above or below a top-level object of
    ///   a virtual group, adds them to the group without touching the graph.
    ///
    /// With [`DropConfig::parent_on_child`](crate::DropConfig::parent_on_child)
    /// a single object may be dropped onto its own descendant: the branch
    /// holding the descendant takes the object's place first.
    ///
    /// An accepted drop re-selects the dragged objects, or just refreshes when
    /// they were placed next to a visible sibling.
    pub fn drop_on_row<G>(
        &mut self,
        graph: &mut G,
        row: Option<usize>,
        position: DropPosition,
        dragged: &[K],
    ) -> Result<DropOutcome, DropRejected>
    where
        G: SceneGraphMut<Key = K, Scene = S> + ?Sized,
    {
        self.auto_scroll = 0.0;
        let plan = match self.plan_drop(&*graph, row, position, dragged) {
            Ok(plan) => plan,
            Err(reason) => {
                debug!("drop rejected: {reason}");
                return Err(reason);
            }
        };
        if let Err(reason) = self.apply(graph, &plan) {
            debug!("drop failed while applying: {reason}");
            self.refresh(&*graph);
            self.set_list_dirty();
            return Err(reason);
        }

        let graph = &*graph;
        if plan.focus {
            self.select(graph, plan.moved, true);
            Ok(DropOutcome::Focused)
        } else {
            self.refresh(graph);
            self.set_list_dirty();
            Ok(DropOutcome::Refreshed)
        }
    }

    fn plan_drop<G>(
        &self,
        graph: &G,
        row: Option<usize>,
        position: DropPosition,
        dragged: &[K],
    ) -> Result<Plan<K, S>, DropRejected>
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let drop = self.config.drop;
        if !drop.can_reorganize {
            return Err(DropRejected::ReorganizeDisabled);
        }
        if self.is_searching() {
            return Err(DropRejected::SearchMode);
        }
        let mut seen = HashSet::new();
        let moved: Vec<K> = dragged
            .iter()
            .copied()
            .filter(|&k| graph.is_alive(k) && seen.insert(k))
            .collect();
        if moved.is_empty() {
            return Err(DropRejected::NothingDragged);
        }

        match row.map(|row| self.node_at(row).ok_or(DropRejected::TargetGone)) {
            None => Self::plan_unparent(graph, moved),
            Some(Err(reason)) => Err(reason),
            Some(Ok(Row::Collection(id))) => {
                let collection = self
                    .outline
                    .collection(id)
                    .ok_or(DropRejected::TargetGone)?;
                if collection.is_virtual() {
                    if !drop.add_to_virtual {
                        return Err(DropRejected::VirtualLocked);
                    }
                    let mut plan = Plan::new(moved.clone());
                    plan.steps.push(Step::VirtualInsert {
                        name: collection.name().to_string(),
                        index: None,
                        keys: moved,
                    });
                    plan.focus = position == DropPosition::Onto;
                    Ok(plan)
                } else {
                    let scene = collection.scene().ok_or(DropRejected::TargetGone)?;
                    let mut plan = Plan::new(moved);
                    for &key in &plan.moved {
                        if graph.parent(key).is_some() {
                            plan.steps.push(Step::SetParent(key, None));
                        }
                        if graph.scene_of(key) != Some(scene) {
                            plan.steps.push(Step::MoveToScene(key, scene));
                        }
                        plan.steps.push(Step::SetSiblingIndex(key, usize::MAX));
                    }
                    plan.focus = position == DropPosition::Onto;
                    Ok(plan)
                }
            }
            Some(Ok(Row::Node(id))) => self.plan_onto_node(graph, id, position, moved),
        }
    }

    /// Blank space: every dragged object with a parent becomes a scene root.
    fn plan_unparent<G>(graph: &G, moved: Vec<K>) -> Result<Plan<K, S>, DropRejected>
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let mut plan = Plan::new(moved);
        for &key in &plan.moved {
            if graph.parent(key).is_some() {
                plan.steps.push(Step::SetParent(key, None));
            }
        }
        if plan.steps.is_empty() {
            return Err(DropRejected::NothingToMove);
        }
        plan.focus = true;
        Ok(plan)
    }

    fn plan_onto_node<G>(
        &self,
        graph: &G,
        id: NodeId,
        mut position: DropPosition,
        mut moved: Vec<K>,
    ) -> Result<Plan<K, S>, DropRejected>
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let drop = self.config.drop;
        let node = self.outline.node(id).ok_or(DropRejected::TargetGone)?;
        let target = node.key();
        if !graph.is_alive(target) {
            return Err(DropRejected::TargetGone);
        }
        if moved.len() == 1 && moved[0] == target {
            return Err(DropRejected::OntoItself);
        }

        // Below an expanded object with visible children means "first child".
        let mut first_child = false;
        if position == DropPosition::Below && node.height() > 1 {
            position = DropPosition::Onto;
            first_child = true;
        }

        if position != DropPosition::Onto {
            moved.retain(|&k| k != target);
            if moved.is_empty() {
                return Err(DropRejected::OntoItself);
            }
            let collection = self.outline.collection(node.collection());
            if node.parent().is_none()
                && let Some(collection) = collection.filter(|c| c.is_virtual())
            {
                if !drop.add_to_virtual {
                    return Err(DropRejected::VirtualLocked);
                }
                let index = collection
                    .index_of(target)
                    .map(|i| if position == DropPosition::Below { i + 1 } else { i });
                let mut plan = Plan::new(moved.clone());
                plan.steps.push(Step::VirtualInsert {
                    name: collection.name().to_string(),
                    index,
                    keys: moved,
                });
                return Ok(plan);
            }
        }

        let parent = match position {
            DropPosition::Onto => Some(target),
            DropPosition::Above | DropPosition::Below => graph.parent(target),
        };
        let mut plan = Plan::new(moved);

        let Some(parent) = parent else {
            // Siblings of a scene root.
            let scene = graph.scene_of(target).ok_or(DropRejected::TargetGone)?;
            for &key in &plan.moved {
                if graph.parent(key).is_some() {
                    plan.steps.push(Step::SetParent(key, None));
                }
                if graph.scene_of(key) != Some(scene) {
                    plan.steps.push(Step::MoveToScene(key, scene));
                }
                plan.steps.push(Step::SetSiblingIndex(key, usize::MAX));
            }
            plan.placement = Some(match position {
                DropPosition::Above => Placement::Before(target),
                _ => Placement::After(target),
            });
            return Ok(plan);
        };

        if !drop.parent_on_child || plan.moved.len() > 1 {
            if plan
                .moved
                .iter()
                .any(|&key| is_ancestor_or_self(graph, key, parent))
            {
                return Err(if plan.moved.contains(&parent) {
                    DropRejected::OntoItself
                } else {
                    DropRejected::OntoDescendant
                });
            }
        } else {
            let dragged = plan.moved[0];
            if dragged == parent {
                return Err(DropRejected::OntoItself);
            }
            if is_ancestor_or_self(graph, dragged, parent) {
                self.plan_swap(graph, dragged, parent, &mut plan)?;
            }
        }

        for &key in &plan.moved {
            plan.steps.push(Step::SetParent(key, Some(parent)));
            plan.steps.push(Step::SetSiblingIndex(key, usize::MAX));
        }
        plan.placement = match position {
            DropPosition::Onto if first_child => Some(Placement::At(0)),
            DropPosition::Onto => None,
            DropPosition::Above => Some(Placement::Before(target)),
            DropPosition::Below => Some(Placement::After(target)),
        };
        plan.focus |= plan.placement.is_none() && !node.is_expanded();
        Ok(plan)
    }

    /// Lifts the branch of `dragged` that holds `descendant` into the place
    /// `dragged` occupies, so `dragged` can then move under `descendant`.
    fn plan_swap<G>(&self, graph: &G, dragged: K, descendant: K, plan: &mut Plan<K, S>) -> Result<(), DropRejected>
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let branch = core::iter::once(descendant)
            .chain(ancestors(graph, descendant))
            .find(|&k| graph.parent(k) == Some(dragged))
            .ok_or(DropRejected::OntoDescendant)?;
        let index = graph.sibling_index(dragged).unwrap_or(usize::MAX);
        match graph.parent(dragged) {
            Some(grandparent) => plan.steps.push(Step::SetParent(branch, Some(grandparent))),
            None => {
                plan.steps.push(Step::SetParent(branch, None));
                if let Some(scene) = graph.scene_of(dragged)
                    && graph.scene_of(branch) != Some(scene)
                {
                    plan.steps.push(Step::MoveToScene(branch, scene));
                }
            }
        }
        plan.steps.push(Step::SetSiblingIndex(branch, index));

        for collection in self.outline.collections() {
            if collection.is_virtual() && collection.index_of(dragged).is_some() {
                if !self.config.drop.add_to_virtual {
                    return Err(DropRejected::VirtualLocked);
                }
                plan.steps.push(Step::VirtualReplace {
                    name: collection.name().to_string(),
                    old: dragged,
                    new: branch,
                });
            }
        }
        plan.focus = true;
        Ok(())
    }

    fn apply<G>(&mut self, graph: &mut G, plan: &Plan<K, S>) -> Result<(), DropRejected>
    where
        G: SceneGraphMut<Key = K, Scene = S> + ?Sized,
    {
        for step in &plan.steps {
            match step {
                Step::SetParent(key, parent) => graph.set_parent(*key, *parent)?,
                Step::SetSiblingIndex(key, index) => graph.set_sibling_index(*key, *index)?,
                Step::MoveToScene(key, scene) => graph.move_to_scene(*key, *scene)?,
                Step::VirtualInsert { name, index, keys } => {
                    match index {
                        Some(index) => {
                            self.outline.insert_into_virtual(name, *index, keys.iter().copied());
                        }
                        None => {
                            self.outline.add_all_to_virtual(name, keys.iter().copied());
                        }
                    }
                    self.set_list_dirty();
                }
                Step::VirtualReplace { name, old, new } => {
                    let index = self
                        .outline
                        .virtual_collection(name)
                        .and_then(|id| self.outline.collection(id))
                        .and_then(|c| c.index_of(*old));
                    if let Some(index) = index {
                        self.outline.remove_from_virtual(name, *old, false);
                        self.outline.insert_into_virtual(name, index, [*new]);
                        self.set_list_dirty();
                    }
                }
            }
        }

        match plan.placement {
            None => {}
            Some(Placement::At(first)) => {
                for (offset, &key) in plan.moved.iter().enumerate() {
                    graph.set_sibling_index(key, first + offset)?;
                }
            }
            Some(Placement::Before(target)) => {
                for &key in &plan.moved {
                    let index = graph.sibling_index(target).unwrap_or(0);
                    graph.set_sibling_index(key, index)?;
                }
            }
            Some(Placement::After(target)) => {
                let mut previous = target;
                for &key in &plan.moved {
                    let index = graph.sibling_index(previous).map_or(usize::MAX, |i| i + 1);
                    graph.set_sibling_index(key, index)?;
                    previous = key;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages_name_the_cause() {
        assert_eq!(
            DropRejected::OntoDescendant.to_string(),
            "object dropped onto its own descendant"
        );
        assert_eq!(
            DropRejected::from(GraphError::Cycle),
            DropRejected::Graph(GraphError::Cycle)
        );
    }
}
