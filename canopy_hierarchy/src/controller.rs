// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The hierarchy controller: refresh scheduling, scenes, search and selection.

use alloc::string::String;
use alloc::vec::{Drain, Vec};
use core::fmt::Debug;
use core::hash::Hash;

use canopy_graph::{SceneEvent, SceneGraph};
use canopy_outline::{
    CollectionId, KeyFilter, NodePool, NodeRole, Outline, Projection, Row, normalize_query,
};
use canopy_rows::{FixedRows, RowViewport, ScrollAlign, VisibleRows};
use canopy_selection::SelectionSet;
use log::debug;

use crate::config::HierarchyConfig;
use crate::event::{HierarchyEvent, RowInfo};
use crate::removal::RemovalState;
use crate::timer::RefreshTimer;

/// A row being held down, waiting to turn into a drag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct PressedRow<K> {
    pub(crate) key: K,
    pub(crate) deadline: u64,
}

/// A runtime hierarchy view over a host scene graph.
///
/// The controller owns the [`Outline`], the selection and the scroll state.
/// It never owns the graph: every operation that needs it takes it as an
/// argument, and the host drives time by calling [`Hierarchy::update`] once
/// per frame.
#[derive(Debug)]
pub struct Hierarchy<K, S> {
    pub(crate) outline: Outline<K, S>,
    pub(crate) selection: SelectionSet<K>,
    pub(crate) config: HierarchyConfig,
    pub(crate) viewport: RowViewport,
    structure_timer: RefreshTimer,
    name_timer: RefreshTimer,
    search_timer: RefreshTimer,
    search: Option<String>,
    list_dirty: bool,
    pub(crate) now: u64,
    last_update: Option<u64>,
    pub(crate) frame: u64,
    pub(crate) anchor: Option<Row>,
    pub(crate) last_click: Option<u64>,
    pub(crate) pressed: Option<PressedRow<K>>,
    pub(crate) auto_scroll: f64,
    pub(crate) removal: RemovalState<K>,
    events: Vec<HierarchyEvent<K>>,
    notified_revision: u64,
}

impl<K, S> Hierarchy<K, S>
where
    K: Copy + Eq + Hash + Debug,
    S: Copy + Eq + Debug,
{
    /// Creates a hierarchy with its own node pool.
    #[must_use]
    pub fn new(config: HierarchyConfig) -> Self {
        Self::with_pool(config, NodePool::new())
    }

    /// Creates a hierarchy that allocates its nodes from `pool`.
    ///
    /// Usually called through [`HierarchyRegistry::register`](crate::HierarchyRegistry::register).
    #[must_use]
    pub fn with_pool(config: HierarchyConfig, pool: NodePool<K>) -> Self {
        let mut outline = Outline::with_pool(pool);
        outline.set_headers(config.collection_headers);
        outline.set_virtual_order(config.virtual_order.iter().cloned());
        let viewport = RowViewport::new(FixedRows::new(0, config.row_height), 0.0, config.overscan);
        Self {
            outline,
            selection: SelectionSet::new(),
            structure_timer: RefreshTimer::new(config.refresh_interval_ms),
            name_timer: RefreshTimer::new(config.name_refresh_interval_ms),
            search_timer: RefreshTimer::new(config.search_refresh_interval_ms),
            config,
            viewport,
            search: None,
            list_dirty: true,
            now: 0,
            last_update: None,
            frame: 0,
            anchor: None,
            last_click: None,
            pressed: None,
            auto_scroll: 0.0,
            removal: RemovalState::Idle,
            events: Vec::new(),
            notified_revision: 0,
        }
    }

    /// Tears the hierarchy down and hands back its node pool.
    #[must_use]
    pub fn into_pool(self) -> NodePool<K> {
        self.outline.into_pool()
    }

    /// The underlying outline.
    #[must_use]
    pub fn outline(&self) -> &Outline<K, S> {
        &self.outline
    }

    /// Current settings.
    #[must_use]
    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    /// Replaces the timer intervals, click thresholds, row height and drop
    /// behavior from `config`.
    ///
    /// Scene exposure, header rows and virtual group order are structural;
    /// change them with [`Hierarchy::set_expose_scenes`] and friends.
    pub fn set_config(&mut self, config: HierarchyConfig) {
        self.structure_timer.set_interval(config.refresh_interval_ms);
        self.name_timer.set_interval(config.name_refresh_interval_ms);
        self.search_timer.set_interval(config.search_refresh_interval_ms);
        self.viewport.set_row_height(config.row_height);
        self.viewport.set_overscan(config.overscan);
        self.config.refresh_interval_ms = config.refresh_interval_ms;
        self.config.name_refresh_interval_ms = config.name_refresh_interval_ms;
        self.config.search_refresh_interval_ms = config.search_refresh_interval_ms;
        self.config.double_click_ms = config.double_click_ms;
        self.config.drag_on_hold = config.drag_on_hold;
        self.config.hold_ms = config.hold_ms;
        self.config.row_height = config.row_height;
        self.config.overscan = config.overscan;
        self.config.drop = config.drop;
    }

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionSet<K> {
        &self.selection
    }

    /// Takes the pending notifications, oldest first.
    pub fn drain_events(&mut self) -> Drain<'_, HierarchyEvent<K>> {
        self.events.drain(..)
    }

    pub(crate) fn emit(&mut self, event: HierarchyEvent<K>) {
        self.events.push(event);
    }

    /// Publishes one [`HierarchyEvent::SelectionChanged`] if the selection
    /// changed since the last call.
    pub(crate) fn notify_selection(&mut self) {
        let revision = self.selection.revision();
        if revision != self.notified_revision {
            self.notified_revision = revision;
            self.events
                .push(HierarchyEvent::SelectionChanged(self.selection.items().to_vec()));
        }
    }

    /// Whether a search query is active.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    /// The active, normalized search query.
    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// The projection rows are currently read from.
    #[must_use]
    pub fn projection(&self) -> Projection {
        if self.search.is_some() {
            Projection::Search
        } else {
            Projection::Primary
        }
    }

    /// Advances the controller to host time `now` (milliseconds).
    ///
    /// Call once per frame. Runs, in order: a pending removal confirmation,
    /// the structural or search refresh when its timer is due (collections
    /// whose filter or contents changed are refreshed right away), the row count
    /// update, the name refresh, the hold-to-drag deadline and auto-scroll.
    pub fn update<G>(&mut self, graph: &G, now: u64)
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        self.now = now;
        self.frame = self.frame.wrapping_add(1);
        self.resume_removal(graph);

        if self.search.is_none() {
            if self.structure_timer.is_due(now) {
                self.refresh(graph);
            } else if self.outline.refresh_dirty(graph) {
                self.list_dirty = true;
            }
        } else if self.search_timer.is_due(now) {
            self.refresh_search_results(graph);
        }

        self.sync_rows();

        if self.name_timer.is_due(now) {
            self.name_timer.schedule(now);
            self.outline.reset_cached_names();
        }

        self.update_hold(graph, now);

        if self.auto_scroll != 0.0
            && let Some(last) = self.last_update
        {
            let dt = now.saturating_sub(last) as f64 / 1000.0;
            let rows = self.auto_scroll * dt;
            self.viewport.scroll_by(-rows * self.viewport.row_height());
        }
        self.last_update = Some(now);
        self.notify_selection();
    }

    /// Structural refresh of every collection; skipped in search mode.
    ///
    /// Also drops destroyed objects from the selection.
    pub fn refresh<G>(&mut self, graph: &G)
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        if self.search.is_some() {
            return;
        }
        self.structure_timer.schedule(self.now);
        if self.outline.refresh(graph) {
            self.list_dirty = true;
        }
        self.selection.retain(|key| graph.is_alive(key));
    }

    /// Rebuilds the search results for the active query; no-op outside search mode.
    pub fn refresh_search_results<G>(&mut self, graph: &G)
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let Some(query) = self.search.as_deref() else {
            return;
        };
        self.search_timer.schedule(self.now);
        self.outline.refresh_search(graph, query);
        self.list_dirty = true;
    }

    /// Re-reads the display name of `key` right away.
    pub fn refresh_name_of<G>(&mut self, graph: &G, key: K)
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        if self.search.is_some() {
            self.refresh_search_results(graph);
        }
        self.outline.refresh_name_of(graph, key);
    }

    /// Marks the row count as stale; it is recomputed on the next update.
    pub fn set_list_dirty(&mut self) {
        self.list_dirty = true;
    }

    pub(crate) fn sync_rows(&mut self) {
        if self.list_dirty {
            self.list_dirty = false;
            self.viewport.set_len(self.outline.row_count(self.projection()));
            self.viewport.clamp_scroll_to_content();
        }
    }

    /// Number of rows in the active projection.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.outline.row_count(self.projection())
    }

    /// Uniform row height.
    #[must_use]
    pub fn row_height(&self) -> f64 {
        self.viewport.row_height()
    }

    /// Entity on `row` of the active projection; `None` out of range.
    #[must_use]
    pub fn node_at(&self, row: usize) -> Option<Row> {
        self.outline.node_at(self.projection(), row)
    }

    /// Bound object of `row`, if it is a live object node.
    pub(crate) fn key_of<G>(&self, graph: &G, row: Row) -> Option<K>
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        match row {
            Row::Node(id) => self
                .outline
                .node(id)
                .map(|n| n.key())
                .filter(|&key| graph.is_alive(key)),
            Row::Collection(_) => None,
        }
    }

    /// Everything a row widget needs to draw `row`; `None` out of range.
    pub fn row_info<'a, G>(&'a mut self, graph: &G, row: usize) -> Option<RowInfo<'a, K>>
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let projection = self.projection();
        let entity = self.outline.node_at(projection, row)?;
        let can_expand = self.outline.can_expand(graph, projection, entity);
        let expanded = self.outline.is_expanded(projection, entity);
        let (key, indent, role) = match entity {
            Row::Collection(_) => (None, 0, None),
            Row::Node(id) => {
                let node = self.outline.node(id)?;
                let header = self
                    .outline
                    .collection(node.collection())
                    .is_some_and(|c| c.has_header());
                (Some(node.key()), node.depth() + usize::from(header), Some(node.role()))
            }
        };
        let selected = key.is_some_and(|k| self.selection.contains(k));
        let active = key.is_none_or(|k| graph.is_active(k));
        let label = self.outline.display_name(graph, entity)?;
        Some(RowInfo {
            row: entity,
            key,
            label,
            indent,
            can_expand,
            expanded,
            selected,
            active,
            role,
        })
    }

    /// Sets the viewport height.
    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport.set_viewport_extent(height);
    }

    /// Current scroll offset.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.viewport.scroll_offset()
    }

    /// Scrolls to `offset`, clamped to the content.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.sync_rows();
        self.viewport.set_scroll_offset(offset);
        self.viewport.clamp_scroll_to_content();
    }

    /// The rows to realize for the current scroll position.
    pub fn visible_rows(&mut self) -> VisibleRows {
        self.sync_rows();
        self.viewport.visible_rows()
    }

    /// Expands or collapses the entity on `row`.
    pub fn set_expanded<G>(&mut self, graph: &G, row: usize, expanded: bool) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let projection = self.projection();
        let Some(entity) = self.outline.node_at(projection, row) else {
            return false;
        };
        let changed = self.outline.set_expanded(graph, projection, entity, expanded);
        self.list_dirty |= changed;
        changed
    }

    /// Flips the expand state of the entity on `row`.
    pub fn toggle_expanded<G>(&mut self, graph: &G, row: usize) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let projection = self.projection();
        let Some(entity) = self.outline.node_at(projection, row) else {
            return false;
        };
        let changed = self.outline.toggle_expanded(graph, projection, entity);
        self.list_dirty |= changed;
        changed
    }

    /// Reacts to a scene being loaded or unloaded.
    pub fn handle_scene_event<G>(&mut self, graph: &G, event: SceneEvent<S>)
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        match event {
            SceneEvent::Loaded { scene, .. } => {
                if self.config.expose_scenes {
                    self.outline.add_scene(graph, scene);
                    if self.search.is_some() {
                        self.refresh_search_results(graph);
                    }
                    self.list_dirty = true;
                }
            }
            SceneEvent::Unloaded { scene } => {
                if self.outline.remove_scene(scene) {
                    self.list_dirty = true;
                }
            }
        }
    }

    /// Shows or hides scene collections.
    ///
    /// Turning exposure on adds a collection for every scene in `loaded`.
    pub fn set_expose_scenes<G, I>(&mut self, graph: &G, expose: bool, loaded: I)
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
        I: IntoIterator<Item = S>,
    {
        if self.config.expose_scenes == expose {
            return;
        }
        self.config.expose_scenes = expose;
        if expose {
            for scene in loaded {
                self.outline.add_scene(graph, scene);
            }
        } else {
            self.outline.remove_all_scenes();
        }
        self.list_dirty = true;
    }

    /// Turns collection header rows on or off.
    pub fn set_collection_headers(&mut self, headers: bool) {
        self.config.collection_headers = headers;
        self.outline.set_headers(headers);
        self.list_dirty = true;
    }

    /// Replaces the filter predicate.
    pub fn set_filter(&mut self, filter: Option<KeyFilter<K>>) {
        self.outline.set_filter(filter);
        self.list_dirty = true;
    }

    /// Hides `key` and its subtree.
    pub fn ignore(&mut self, key: K) -> bool {
        self.outline.ignore(key)
    }

    /// Shows a previously ignored object again.
    pub fn unignore(&mut self, key: K) -> bool {
        self.outline.unignore(key)
    }

    /// Sets the display order of virtual groups.
    pub fn set_virtual_order<I, N>(&mut self, order: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.config.virtual_order = order.into_iter().map(Into::into).collect();
        self.outline
            .set_virtual_order(self.config.virtual_order.iter().cloned());
    }

    /// Creates an empty virtual group.
    pub fn create_virtual(&mut self, name: &str) -> CollectionId {
        self.list_dirty = true;
        self.outline.create_virtual(name)
    }

    /// Deletes the virtual group `name`.
    pub fn delete_virtual(&mut self, name: &str) -> bool {
        self.list_dirty = true;
        self.outline.delete_virtual(name)
    }

    /// Deletes every virtual group.
    pub fn delete_all_virtual(&mut self) {
        self.list_dirty = true;
        self.outline.delete_all_virtual();
    }

    /// Adds `key` to the virtual group `name`, creating the group if needed.
    pub fn add_to_virtual(&mut self, name: &str, key: K) -> CollectionId {
        self.list_dirty = true;
        self.outline.add_to_virtual(name, key)
    }

    /// Adds every key of `keys` to the virtual group `name`.
    pub fn add_all_to_virtual<I>(&mut self, name: &str, keys: I) -> CollectionId
    where
        I: IntoIterator<Item = K>,
    {
        self.list_dirty = true;
        self.outline.add_all_to_virtual(name, keys)
    }

    /// Removes `key` from the virtual group `name`.
    pub fn remove_from_virtual(&mut self, name: &str, key: K, delete_if_empty: bool) -> bool {
        self.list_dirty = true;
        self.outline.remove_from_virtual(name, key, delete_if_empty)
    }

    /// Removes every key of `keys` from the virtual group `name`.
    pub fn remove_all_from_virtual<I>(&mut self, name: &str, keys: I, delete_if_empty: bool) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        self.list_dirty = true;
        let mut removed = false;
        for key in keys {
            removed |= self.outline.remove_from_virtual(name, key, false);
        }
        if delete_if_empty
            && let Some(id) = self.outline.virtual_collection(name)
            && self
                .outline
                .collection(id)
                .is_some_and(|c| c.virtual_keys().is_empty())
        {
            self.outline.delete_virtual(name);
        }
        removed
    }

    /// Enters, updates or leaves search mode.
    ///
    /// The query is trimmed; an empty query leaves search mode, collapsing
    /// the search collections, scrolling to the top and re-focusing the
    /// current selection. Entering search mode scrolls to the top and
    /// expands every search collection.
    pub fn set_search<G>(&mut self, graph: &G, query: &str)
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let query = normalize_query(query);
        if query.is_empty() {
            if self.search.take().is_some() {
                debug!("leaving search mode");
                self.outline.clear_search();
                self.viewport.set_scroll_offset(0.0);
                self.list_dirty = true;
                if !self.selection.is_empty() {
                    let keys = self.selection.items().to_vec();
                    self.select(graph, keys, true);
                }
            }
            return;
        }
        let entering = self.search.is_none();
        self.search = Some(query);
        if entering {
            debug!("entering search mode for {:?}", self.search);
            self.viewport.set_scroll_offset(0.0);
            self.refresh_search_results(graph);
            self.outline.expand_search_collections();
        } else {
            self.refresh_search_results(graph);
        }
    }

    /// Replaces the selection with `keys` and scrolls to the last of them.
    ///
    /// Destroyed handles are skipped. An empty selection deselects. Unless
    /// `force` is set, a selection equal to the current one (in any order) is
    /// left alone. Returns `false` if the last object could not be revealed.
    pub fn select<G, I>(&mut self, graph: &G, keys: I, force: bool) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
        I: IntoIterator<Item = K>,
    {
        let keys: Vec<K> = keys.into_iter().filter(|&k| graph.is_alive(k)).collect();
        let Some(&last) = keys.last() else {
            self.deselect();
            return true;
        };
        if !force && self.selection.set_equals(keys.iter().copied()) {
            return true;
        }
        self.selection.replace_with(keys);
        self.refresh(graph);
        let found = self.focus(graph, last);
        self.notify_selection();
        found
    }

    /// Clears the selection and the range anchor.
    pub fn deselect(&mut self) {
        self.selection.clear();
        self.anchor = None;
        self.notify_selection();
    }

    /// Expands the path to `key` and scrolls its row into view.
    fn focus<G>(&mut self, graph: &G, key: K) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let Some(node) = self.outline.reveal(graph, key) else {
            return false;
        };
        self.list_dirty = true;
        if self.search.is_none() {
            self.sync_rows();
            if let Some(row) = self.outline.row_of(Projection::Primary, Row::Node(node)) {
                self.viewport.scroll_to_row(row, ScrollAlign::Nearest);
            }
        }
        true
    }

    /// Whether the entity on `row` is a search hit (as opposed to context).
    pub(crate) fn is_search_hit(&self, row: Row) -> bool {
        match row {
            Row::Node(id) => self
                .outline
                .node(id)
                .is_some_and(|n| n.role() == NodeRole::SearchHit),
            Row::Collection(_) => false,
        }
    }
}
