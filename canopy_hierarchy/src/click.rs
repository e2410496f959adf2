// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click selection, double-click activation and hold-to-drag.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use canopy_graph::{SceneGraph, ancestors};
use canopy_outline::{Projection, Row};

use crate::controller::PressedRow;
use crate::event::{ClickModifiers, HierarchyEvent};
use crate::Hierarchy;

impl<K, S> Hierarchy<K, S>
where
    K: Copy + Eq + Hash + Debug,
    S: Copy + Eq + Debug,
{
    /// Handles a click on `row` (`None` for the blank space below the rows).
    ///
    /// - Blank space deselects everything and forgets the anchor.
    /// - With nothing selected, or without modifiers, the clicked object
    ///   becomes the whole selection. Headers and destroyed objects select
    ///   nothing.
    /// - [`ClickModifiers::MULTI`] toggles the clicked object.
    /// - [`ClickModifiers::RANGE`] adds every row between the anchor and the
    ///   clicked row.
    /// - Clicking an already selected object again within the double-click
    ///   threshold emits [`HierarchyEvent::Activated`].
    ///
    /// The clicked row becomes the anchor for the next range click. In search
    /// mode the clicked object's path is published as
    /// [`HierarchyEvent::SearchPath`].
    pub fn on_item_clicked<G>(&mut self, graph: &G, row: Option<usize>, modifiers: ClickModifiers, now: u64)
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        self.now = now;
        let Some(entity) = row.and_then(|row| self.node_at(row)) else {
            self.deselect();
            return;
        };
        let clicked = self.key_of(graph, entity);

        if self.selection.is_empty() {
            self.select_single(clicked);
            self.last_click = Some(now);
        } else if modifiers.contains(ClickModifiers::MULTI) {
            if let Some(key) = clicked {
                self.selection.toggle(key);
            }
            self.last_click = Some(now);
        } else if modifiers.contains(ClickModifiers::RANGE) && self.anchor.is_some() {
            self.select_range(graph, entity, clicked);
            self.last_click = Some(now);
        } else if let Some(key) = clicked.filter(|&k| self.selection.contains(k)) {
            let threshold = self.config.double_click_ms;
            if self
                .last_click
                .is_some_and(|last| now.saturating_sub(last) <= threshold)
            {
                self.last_click = None;
                self.emit(HierarchyEvent::Activated(key));
            } else {
                self.last_click = Some(now);
            }
            self.select_single(clicked);
        } else {
            self.select_single(clicked);
            self.last_click = Some(now);
        }

        if self.is_searching()
            && let Some(key) = clicked
        {
            let path = self.path_of(graph, entity, key);
            self.emit(HierarchyEvent::SearchPath(path));
        }
        self.anchor = Some(entity);
        self.notify_selection();
    }

    fn select_single(&mut self, key: Option<K>) {
        match key {
            Some(key) => self.selection.replace_with([key]),
            None => self.selection.clear(),
        };
    }

    /// Adds every row between the anchor and `clicked` (inclusive) to the selection.
    ///
    /// In search mode only search hits are collected, and the anchor itself
    /// must be one. An anchor that is no longer visible, or a context anchor
    /// in search mode, falls back to selecting just the clicked object.
    fn select_range<G>(&mut self, graph: &G, entity: Row, clicked: Option<K>)
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let projection = self.projection();
        let searching = projection == Projection::Search;
        let anchor_row = self
            .anchor
            .filter(|&anchor| !searching || self.is_search_hit(anchor))
            .and_then(|anchor| self.outline.row_of(projection, anchor));
        let (Some(from), Some(to)) = (anchor_row, self.outline.row_of(projection, entity)) else {
            self.select_single(clicked);
            return;
        };

        let (min, max) = if from <= to { (from, to) } else { (to, from) };
        let mut keys = Vec::with_capacity(max - min + 1);
        for row in min..=max {
            let Some(entity) = self.outline.node_at(projection, row) else {
                break;
            };
            if searching && !self.is_search_hit(entity) {
                continue;
            }
            if let Some(key) = self.key_of(graph, entity) {
                keys.push(key);
            }
        }
        self.selection.extend_with(keys);
    }

    /// Object names from `key` up to its root, then the collection name.
    fn path_of<G>(&self, graph: &G, entity: Row, key: K) -> Vec<String>
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let mut path: Vec<String> = core::iter::once(key)
            .chain(ancestors(graph, key))
            .map(|k| graph.name(k).unwrap_or_default().to_string())
            .collect();
        if let Row::Node(id) = entity
            && let Some(collection) = self
                .outline
                .node(id)
                .and_then(|n| self.outline.collection(n.collection()))
        {
            path.push(collection.name().to_string());
        }
        path
    }

    /// Starts the hold-to-drag countdown for the object on `row`.
    pub fn on_pointer_down(&mut self, row: usize, now: u64) {
        self.now = now;
        if !self.config.drag_on_hold {
            return;
        }
        let key = match self.node_at(row) {
            Some(Row::Node(id)) => self.outline.node(id).map(|n| n.key()),
            _ => None,
        };
        self.pressed = key.map(|key| PressedRow {
            key,
            deadline: now.saturating_add(self.config.hold_ms),
        });
    }

    /// Cancels a pending hold-to-drag.
    pub fn on_pointer_up(&mut self) {
        self.pressed = None;
    }

    /// Fires [`HierarchyEvent::DragStarted`] once the hold deadline passes.
    ///
    /// Holding a selected object drags the whole selection; holding any other
    /// object drags just that one.
    pub(crate) fn update_hold<G>(&mut self, graph: &G, now: u64)
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        if !self.config.drag_on_hold {
            self.pressed = None;
            return;
        }
        let Some(pressed) = self.pressed else {
            return;
        };
        if now < pressed.deadline {
            return;
        }
        self.pressed = None;
        if !graph.is_alive(pressed.key) {
            return;
        }
        let dragged = if self.selection.contains(pressed.key) {
            self.selection.items().to_vec()
        } else {
            alloc::vec![pressed.key]
        };
        self.emit(HierarchyEvent::DragStarted(dragged));
    }
}
