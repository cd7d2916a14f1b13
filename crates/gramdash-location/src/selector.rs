//! The location dropdown state machine.
//!
//! [`LocationSelector`] is synchronous and owns no data: every operation
//! reads the [`GeographyCache`] it is handed and returns a [`Transition`]
//! listing the cache keys that should be fetched next and, when the
//! selection changed, the event to publish.

use serde::Serialize;

use gramdash_core::{DropdownLevel, GeoId, GeoNode, GeoPath, GeoRank, Scope};

use crate::cache::{CacheKey, GeographyCache, SlotView};
use crate::error::FetchError;

const SELECT_DISTRICT: &str = "Select District";
const SELECT_BLOCK: &str = "Select Block";
const SELECT_GP: &str = "Select GP";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// The active scope changed; `path` is whatever the reset left selected.
    ScopeChanged { scope: Scope, path: GeoPath },
    /// A node at the scope's terminal rank was chosen.
    Committed(GeoPath),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    pub fetches: Vec<CacheKey>,
    pub event: Option<SelectionEvent>,
}

impl Transition {
    fn none() -> Self {
        Self::default()
    }

    fn fetch(key: CacheKey) -> Self {
        Self {
            fetches: vec![key],
            event: None,
        }
    }
}

/// What the open dropdown should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsView {
    Loading,
    Error(FetchError),
    Empty,
    Ready(Vec<GeoNode>),
}

/// The state exposed to views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSnapshot {
    pub active_scope: Scope,
    pub dropdown_level: DropdownLevel,
    pub dropdown_open: bool,
    pub selected_location_label: String,
    pub selected_district_id: Option<GeoId>,
    pub selected_block_id: Option<GeoId>,
    pub selected_gp_id: Option<GeoId>,
    pub preview_district_id: Option<GeoId>,
    pub preview_block_id: Option<GeoId>,
}

impl SelectionSnapshot {
    #[must_use]
    pub fn path(&self) -> GeoPath {
        GeoPath {
            district_id: self.selected_district_id,
            block_id: self.selected_block_id,
            gp_id: self.selected_gp_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocationSelector {
    state_name: String,
    scope: Scope,
    level: DropdownLevel,
    dropdown_open: bool,
    district: Option<GeoNode>,
    block: Option<GeoNode>,
    gp: Option<GeoNode>,
    preview_district: Option<GeoNode>,
    preview_block: Option<GeoNode>,
    /// Set while an opened GP dropdown waits for blocks to preview one.
    preset_pending: bool,
    label: String,
}

impl LocationSelector {
    /// Starts in `State` scope with the whole-state pseudo-node selected.
    #[must_use]
    pub fn new(state_name: impl Into<String>) -> Self {
        let state_name = state_name.into();
        Self {
            label: state_name.clone(),
            state_name,
            scope: Scope::State,
            level: DropdownLevel::Districts,
            dropdown_open: false,
            district: None,
            block: None,
            gp: None,
            preview_district: None,
            preview_block: None,
            preset_pending: false,
        }
    }

    #[must_use]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    #[must_use]
    pub fn level(&self) -> DropdownLevel {
        self.level
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Committed district/block/GP ids.
    #[must_use]
    pub fn path(&self) -> GeoPath {
        GeoPath {
            district_id: self.district.as_ref().map(|n| n.id),
            block_id: self.block.as_ref().map(|n| n.id),
            gp_id: self.gp.as_ref().map(|n| n.id),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SelectionSnapshot {
        let path = self.path();
        SelectionSnapshot {
            active_scope: self.scope,
            dropdown_level: self.level,
            dropdown_open: self.dropdown_open,
            selected_location_label: self.label.clone(),
            selected_district_id: path.district_id,
            selected_block_id: path.block_id,
            selected_gp_id: path.gp_id,
            preview_district_id: self.preview_district.as_ref().map(|n| n.id),
            preview_block_id: self.preview_block.as_ref().map(|n| n.id),
        }
    }

    fn set_level(&mut self, level: DropdownLevel) {
        self.level = level.min(self.scope.max_level());
    }

    fn clear_below_district(&mut self) {
        self.block = None;
        self.gp = None;
        self.preview_district = None;
        self.preview_block = None;
        self.preset_pending = false;
    }

    /// Switches the scope and resets the selection beneath it.
    ///
    /// `State` resolves at once to the whole-state node. `District` picks the
    /// first cached district. `Block` and `Gp` start over at the district
    /// list.
    pub fn change_scope(&mut self, scope: Scope, cache: &GeographyCache) -> Transition {
        self.scope = scope;
        self.level = DropdownLevel::Districts;
        self.dropdown_open = false;
        self.clear_below_district();

        let fetches = match scope {
            Scope::State => {
                self.district = None;
                self.label.clone_from(&self.state_name);
                Vec::new()
            }
            Scope::District => match cache.get_districts().first() {
                Some(first) => {
                    self.label.clone_from(&first.name);
                    self.district = Some(first.clone());
                    vec![CacheKey::Blocks {
                        district_id: first.id,
                    }]
                }
                None => {
                    self.district = None;
                    self.label = SELECT_DISTRICT.to_string();
                    vec![CacheKey::Districts]
                }
            },
            Scope::Block | Scope::Gp => {
                self.district = None;
                self.label = SELECT_DISTRICT.to_string();
                vec![CacheKey::Districts]
            }
        };

        tracing::debug!(scope = %scope, label = %self.label, "scope changed");
        Transition {
            fetches,
            event: Some(SelectionEvent::ScopeChanged {
                scope,
                path: self.path(),
            }),
        }
    }

    /// Moves the hierarchy preview to `node` without committing anything.
    ///
    /// Only meaningful under `Block` and `Gp` scope: a district previews its
    /// blocks, and under `Gp` a block previews its gram panchayats. Hovering
    /// the node that is already previewed leaves the preview as it is. The
    /// breadcrumb label is never touched.
    pub fn hover_preview(&mut self, node: &GeoNode, cache: &GeographyCache) -> Transition {
        self.move_preview(node, cache, false)
    }

    /// Points the preview at `node`. With `force` unset, a node that is
    /// already the preview at its rank keeps the deeper preview intact and
    /// only reports the key so the cache can dedupe it.
    fn move_preview(&mut self, node: &GeoNode, cache: &GeographyCache, force: bool) -> Transition {
        if !self.scope.supports_preview() {
            return Transition::none();
        }
        match node.rank {
            GeoRank::District => {
                let key = CacheKey::Blocks {
                    district_id: node.id,
                };
                let same = self.preview_district.as_ref().is_some_and(|d| d.id == node.id);
                if same && !force {
                    if self.level < DropdownLevel::Blocks {
                        self.set_level(DropdownLevel::Blocks);
                    }
                    return Transition::fetch(key);
                }
                self.preview_district = Some(node.clone());
                self.preview_block = None;
                self.preset_pending = false;
                self.set_level(DropdownLevel::Blocks);
                Transition::fetch(key)
            }
            GeoRank::Block if self.scope == Scope::Gp => {
                let Some(district) = self.resolve_district(node, cache) else {
                    tracing::debug!(block_id = node.id, "hovered block has no cached district");
                    return Transition::none();
                };
                let key = CacheKey::GramPanchayats {
                    district_id: district.id,
                    block_id: node.id,
                };
                let same = self.preview_block.as_ref().is_some_and(|b| b.id == node.id);
                if force || !same {
                    self.preview_district = Some(district);
                    self.preview_block = Some(node.clone());
                    self.preset_pending = false;
                }
                self.set_level(DropdownLevel::Gps);
                Transition::fetch(key)
            }
            _ => Transition::none(),
        }
    }

    /// Commits `node`.
    ///
    /// Below the scope's terminal rank this moves the preview to `node`,
    /// resets anything previewed beneath it and prompts for the next rank.
    /// At the terminal rank the node's parents are resolved from the cache,
    /// the dropdown closes and [`SelectionEvent::Committed`] is emitted.
    /// Nodes deeper than the scope reaches are ignored.
    pub fn select_node(&mut self, node: &GeoNode, cache: &GeographyCache) -> Transition {
        let Some(terminal) = self.scope.terminal_rank() else {
            return Transition::none();
        };
        if node.rank > terminal {
            return Transition::none();
        }
        if node.rank < terminal {
            let transition = self.move_preview(node, cache, true);
            if !transition.fetches.is_empty() {
                let prompt = match node.rank {
                    GeoRank::District => SELECT_BLOCK,
                    _ => SELECT_GP,
                };
                self.label = prompt.to_string();
            }
            return transition;
        }

        let fetch = match node.rank {
            GeoRank::District => {
                self.district = Some(node.clone());
                self.block = None;
                self.gp = None;
                Some(CacheKey::Blocks {
                    district_id: node.id,
                })
            }
            GeoRank::Block => {
                let Some(district) = self.resolve_district(node, cache) else {
                    tracing::debug!(block_id = node.id, "cannot commit block without its district");
                    return Transition::none();
                };
                let district_id = district.id;
                self.district = Some(district);
                self.block = Some(node.clone());
                self.gp = None;
                Some(CacheKey::GramPanchayats {
                    district_id,
                    block_id: node.id,
                })
            }
            GeoRank::GramPanchayat => {
                let Some(block) = self.resolve_block(node, cache) else {
                    tracing::debug!(gp_id = node.id, "cannot commit gram panchayat without its block");
                    return Transition::none();
                };
                let Some(district) = self.resolve_district(&block, cache) else {
                    return Transition::none();
                };
                self.district = Some(district);
                self.block = Some(block);
                self.gp = Some(node.clone());
                None
            }
        };

        self.preview_district.clone_from(&self.district);
        self.preview_block.clone_from(&self.block);
        self.preset_pending = false;
        self.dropdown_open = false;
        self.label.clone_from(&node.name);
        let path = self.path();
        tracing::info!(
            scope = %self.scope,
            district_id = ?path.district_id,
            block_id = ?path.block_id,
            gp_id = ?path.gp_id,
            "location committed"
        );
        Transition {
            fetches: fetch.into_iter().collect(),
            event: Some(SelectionEvent::Committed(path)),
        }
    }

    /// Opens the dropdown, presetting the preview so it shows the current
    /// selection's level.
    pub fn open_dropdown(&mut self, cache: &GeographyCache) -> Transition {
        self.dropdown_open = true;
        let mut fetches = vec![CacheKey::Districts];
        if self.scope.supports_preview() {
            fetches.extend(self.preset_preview(cache));
        } else {
            self.level = DropdownLevel::Districts;
        }
        Transition {
            fetches,
            event: None,
        }
    }

    /// Hides the dropdown. Commitments are untouched.
    pub fn close_dropdown(&mut self) {
        self.dropdown_open = false;
        self.preset_pending = false;
    }

    /// Picks the preview district and, under `Gp`, the preview block.
    ///
    /// The committed district is kept if it is cached, otherwise the first
    /// district is used. A committed block that no longer belongs to the
    /// preview district is silently replaced by the district's first block.
    fn preset_preview(&mut self, cache: &GeographyCache) -> Vec<CacheKey> {
        let districts = cache.get_districts();
        let committed = self
            .district
            .as_ref()
            .and_then(|d| districts.iter().find(|n| n.id == d.id));
        let Some(district) = committed.or_else(|| districts.first()).cloned() else {
            self.level = DropdownLevel::Districts;
            return Vec::new();
        };

        let district_id = district.id;
        self.preview_district = Some(district);
        self.set_level(DropdownLevel::Blocks);
        let mut fetches = vec![CacheKey::Blocks { district_id }];

        if self.scope == Scope::Gp {
            match self.pick_preview_block(district_id, cache) {
                Some(block) => {
                    fetches.push(CacheKey::GramPanchayats {
                        district_id,
                        block_id: block.id,
                    });
                    self.preview_block = Some(block);
                    self.preset_pending = false;
                    self.set_level(DropdownLevel::Gps);
                }
                None => self.preset_pending = true,
            }
        }
        fetches
    }

    fn pick_preview_block(&self, district_id: GeoId, cache: &GeographyCache) -> Option<GeoNode> {
        let blocks = cache.get_blocks(district_id);
        let first = blocks.first()?;
        let Some(committed) = self.block.as_ref() else {
            return Some(first.clone());
        };
        if let Some(block) = blocks.iter().find(|b| b.id == committed.id) {
            return Some(block.clone());
        }
        tracing::debug!(
            stale_block_id = committed.id,
            district_id,
            replacement = first.id,
            "committed block is not in the previewed district; using its first block"
        );
        Some(first.clone())
    }

    /// Re-derives state that depends on data which has just arrived.
    pub fn reconcile(&mut self, cache: &GeographyCache) -> Transition {
        match self.scope {
            Scope::District if self.district.is_none() => {
                let Some(first) = cache.get_districts().first() else {
                    return Transition::none();
                };
                tracing::debug!(district_id = first.id, "auto-selecting first district");
                self.label.clone_from(&first.name);
                self.district = Some(first.clone());
                Transition {
                    fetches: vec![CacheKey::Blocks {
                        district_id: first.id,
                    }],
                    event: Some(SelectionEvent::Committed(self.path())),
                }
            }
            Scope::Block | Scope::Gp if self.dropdown_open && self.preview_district.is_none() => {
                Transition {
                    fetches: self.preset_preview(cache),
                    event: None,
                }
            }
            Scope::Gp if self.dropdown_open && self.preset_pending => {
                let Some(district_id) = self.preview_district.as_ref().map(|d| d.id) else {
                    return Transition::none();
                };
                let Some(block) = self.pick_preview_block(district_id, cache) else {
                    return Transition::none();
                };
                let key = CacheKey::GramPanchayats {
                    district_id,
                    block_id: block.id,
                };
                self.preview_block = Some(block);
                self.preset_pending = false;
                self.set_level(DropdownLevel::Gps);
                Transition::fetch(key)
            }
            _ => Transition::none(),
        }
    }

    /// Restores a selection handed down by a parent view.
    ///
    /// A block that does not belong to `district`, or a GP that does not
    /// belong to `block`, is dropped along with everything beneath it.
    pub fn seed(&mut self, district: Option<GeoNode>, block: Option<GeoNode>, gp: Option<GeoNode>) {
        let block = block.filter(|b| district.as_ref().is_some_and(|d| b.is_child_of(d)));
        let gp = gp.filter(|g| block.as_ref().is_some_and(|b| g.is_child_of(b)));
        self.district = district;
        self.block = block;
        self.gp = gp;

        let deepest = match self.scope {
            Scope::State => None,
            Scope::District => self.district.as_ref(),
            Scope::Block => self.block.as_ref(),
            Scope::Gp => self.gp.as_ref(),
        };
        if let Some(node) = deepest {
            self.label.clone_from(&node.name);
        }
    }

    /// The list shown at the current dropdown level.
    #[must_use]
    pub fn options(&self, cache: &GeographyCache) -> OptionsView {
        let district_id = self
            .preview_district
            .as_ref()
            .or(self.district.as_ref())
            .map(|d| d.id);
        let key = match self.level {
            DropdownLevel::Districts => CacheKey::Districts,
            DropdownLevel::Blocks => match district_id {
                Some(district_id) => CacheKey::Blocks { district_id },
                None => return OptionsView::Empty,
            },
            DropdownLevel::Gps => {
                let block = self.preview_block.as_ref().or(self.block.as_ref());
                match (district_id, block) {
                    (Some(district_id), Some(block)) if block.parent_id == Some(district_id) => {
                        CacheKey::GramPanchayats {
                            district_id,
                            block_id: block.id,
                        }
                    }
                    _ => return OptionsView::Empty,
                }
            }
        };
        match cache.view(key) {
            SlotView::Missing | SlotView::Loading => OptionsView::Loading,
            SlotView::Failed(error) => OptionsView::Error(error.clone()),
            SlotView::Ready([]) => OptionsView::Empty,
            SlotView::Ready(nodes) => OptionsView::Ready(nodes.to_vec()),
        }
    }

    fn resolve_district(&self, block: &GeoNode, cache: &GeographyCache) -> Option<GeoNode> {
        let district_id = block.parent_id?;
        [self.preview_district.as_ref(), self.district.as_ref()]
            .into_iter()
            .flatten()
            .find(|d| d.id == district_id)
            .or_else(|| cache.find_district(district_id))
            .cloned()
    }

    fn resolve_block(&self, gp: &GeoNode, cache: &GeographyCache) -> Option<GeoNode> {
        let block_id = gp.parent_id?;
        [self.preview_block.as_ref(), self.block.as_ref()]
            .into_iter()
            .flatten()
            .find(|b| b.id == block_id)
            .or_else(|| cache.find_block(block_id))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{blocks_of, districts, gps_of, jodhpur_blocks, luni_gps, mandore_gps};

    fn load(cache: &mut GeographyCache, key: CacheKey, nodes: Vec<GeoNode>) {
        if let Some(ticket) = cache.begin(key) {
            cache.complete(ticket, Ok(nodes));
        }
    }

    fn full_cache() -> GeographyCache {
        let mut cache = GeographyCache::new();
        load(&mut cache, CacheKey::Districts, districts());
        load(&mut cache, blocks_of(1), jodhpur_blocks());
        load(&mut cache, gps_of(1, 10), luni_gps());
        load(&mut cache, gps_of(1, 11), mandore_gps());
        cache
    }

    fn jodhpur() -> GeoNode {
        GeoNode::district(1, "Jodhpur")
    }

    #[test]
    fn state_scope_resolves_without_fetching() {
        let cache = GeographyCache::new();
        let mut selector = LocationSelector::new("Rajasthan");
        selector.change_scope(Scope::Block, &cache);

        let t = selector.change_scope(Scope::State, &cache);
        assert!(t.fetches.is_empty());
        assert_eq!(selector.snapshot().selected_location_label, "Rajasthan");
        assert!(selector.path().is_empty());
    }

    #[test]
    fn district_scope_auto_selects_first_cached_district() {
        let cache = full_cache();
        let mut selector = LocationSelector::new("Rajasthan");
        let t = selector.change_scope(Scope::District, &cache);

        assert_eq!(selector.label(), "Jodhpur");
        assert_eq!(selector.path().district_id, Some(1));
        assert_eq!(t.fetches, vec![blocks_of(1)]);
    }

    #[test]
    fn district_scope_without_cache_waits_for_districts() {
        let mut cache = GeographyCache::new();
        let mut selector = LocationSelector::new("Rajasthan");
        let t = selector.change_scope(Scope::District, &cache);
        assert_eq!(t.fetches, vec![CacheKey::Districts]);
        assert_eq!(selector.label(), "Select District");

        load(&mut cache, CacheKey::Districts, districts());
        let t = selector.reconcile(&cache);
        assert_eq!(selector.label(), "Jodhpur");
        assert!(matches!(t.event, Some(SelectionEvent::Committed(_))));
        assert!(selector.reconcile(&cache).fetches.is_empty(), "reconcile settles");
    }

    #[test]
    fn scope_change_clears_block_and_gp() {
        let cache = full_cache();
        let mut selector = LocationSelector::new("Rajasthan");
        selector.change_scope(Scope::Gp, &cache);
        selector.select_node(&GeoNode::gram_panchayat(100, "Salawas", 10), &cache);
        assert_eq!(selector.path().gp_id, Some(100));

        selector.change_scope(Scope::Block, &cache);
        let snap = selector.snapshot();
        assert_eq!(snap.selected_block_id, None);
        assert_eq!(snap.selected_gp_id, None);
        assert_eq!(snap.preview_district_id, None);
        assert_eq!(snap.dropdown_level, DropdownLevel::Districts);
    }

    #[test]
    fn hovering_district_advances_to_blocks_without_committing() {
        let cache = full_cache();
        let mut selector = LocationSelector::new("Rajasthan");
        selector.change_scope(Scope::Block, &cache);
        selector.open_dropdown(&cache);

        let t = selector.hover_preview(&jodhpur(), &cache);
        assert_eq!(t.fetches, vec![blocks_of(1)]);
        assert!(t.event.is_none());
        let snap = selector.snapshot();
        assert_eq!(snap.dropdown_level, DropdownLevel::Blocks);
        assert!(snap.dropdown_open);
        assert_eq!(snap.selected_district_id, None);
        assert_eq!(snap.preview_district_id, Some(1));
    }

    #[test]
    fn level_never_exceeds_scope() {
        let cache = full_cache();
        let mut selector = LocationSelector::new("Rajasthan");
        selector.change_scope(Scope::Block, &cache);
        selector.hover_preview(&jodhpur(), &cache);
        let t = selector.hover_preview(&GeoNode::block(10, "Luni", 1), &cache);
        assert!(t.fetches.is_empty());
        assert_eq!(selector.level(), DropdownLevel::Blocks);

        selector.change_scope(Scope::District, &cache);
        assert!(selector.hover_preview(&jodhpur(), &cache).fetches.is_empty());
        assert_eq!(selector.level(), DropdownLevel::Districts);
    }

    #[test]
    fn committing_terminal_block_closes_dropdown_and_reports_path() {
        let cache = full_cache();
        let mut selector = LocationSelector::new("Rajasthan");
        selector.change_scope(Scope::Block, &cache);
        selector.open_dropdown(&cache);
        selector.select_node(&jodhpur(), &cache);

        let t = selector.select_node(&GeoNode::block(11, "Mandore", 1), &cache);
        assert_eq!(
            t.event,
            Some(SelectionEvent::Committed(GeoPath {
                district_id: Some(1),
                block_id: Some(11),
                gp_id: None,
            }))
        );
        assert_eq!(t.fetches, vec![gps_of(1, 11)]);
        let snap = selector.snapshot();
        assert!(!snap.dropdown_open);
        assert_eq!(snap.selected_location_label, "Mandore");
    }

    #[test]
    fn block_is_not_committed_without_its_district() {
        let cache = GeographyCache::new();
        let mut selector = LocationSelector::new("Rajasthan");
        selector.change_scope(Scope::Block, &cache);
        let t = selector.select_node(&GeoNode::block(10, "Luni", 1), &cache);
        assert_eq!(t, Transition::none());
        assert_eq!(selector.path().block_id, None);
    }

    #[test]
    fn gp_commit_resolves_block_and_district() {
        let cache = full_cache();
        let mut selector = LocationSelector::new("Rajasthan");
        selector.change_scope(Scope::Gp, &cache);
        selector.open_dropdown(&cache);
        selector.hover_preview(&jodhpur(), &cache);
        let t = selector.hover_preview(&GeoNode::block(10, "Luni", 1), &cache);
        assert_eq!(t.fetches, vec![gps_of(1, 10)]);
        assert_eq!(selector.level(), DropdownLevel::Gps);

        let t = selector.select_node(&GeoNode::gram_panchayat(101, "Dhundhara", 10), &cache);
        assert!(t.fetches.is_empty());
        assert_eq!(
            selector.path(),
            GeoPath {
                district_id: Some(1),
                block_id: Some(10),
                gp_id: Some(101),
            }
        );
        assert_eq!(selector.label(), "Dhundhara");
    }

    #[test]
    fn open_dropdown_prefers_committed_block_and_falls_back_to_first() {
        let cache = full_cache();
        let mut selector = LocationSelector::new("Rajasthan");
        selector.change_scope(Scope::Gp, &cache);
        selector.seed(
            Some(jodhpur()),
            Some(GeoNode::block(11, "Mandore", 1)),
            Some(GeoNode::gram_panchayat(110, "Banar", 11)),
        );
        assert_eq!(selector.label(), "Banar");

        let t = selector.open_dropdown(&cache);
        assert!(t.fetches.contains(&gps_of(1, 11)));
        assert_eq!(selector.snapshot().preview_block_id, Some(11));
        assert_eq!(selector.level(), DropdownLevel::Gps);
        assert_eq!(
            selector.options(&cache),
            OptionsView::Ready(mandore_gps())
        );

        // A block id from a parent context that the district no longer has.
        let mut stale = LocationSelector::new("Rajasthan");
        stale.change_scope(Scope::Gp, &cache);
        stale.seed(Some(jodhpur()), Some(GeoNode::block(99, "Gone", 1)), None);
        stale.open_dropdown(&cache);
        assert_eq!(stale.snapshot().preview_block_id, Some(10));
    }

    #[test]
    fn gp_scope_open_without_commit_previews_first_block() {
        let cache = full_cache();
        let mut selector = LocationSelector::new("Rajasthan");
        selector.change_scope(Scope::Gp, &cache);

        let t = selector.open_dropdown(&cache);
        assert!(t.fetches.contains(&gps_of(1, 10)));
        let snap = selector.snapshot();
        assert_eq!(snap.preview_district_id, Some(1));
        assert_eq!(snap.preview_block_id, Some(10));
        assert_eq!(snap.dropdown_level, DropdownLevel::Gps);
        assert_eq!(selector.options(&cache), OptionsView::Ready(luni_gps()));
    }

    #[test]
    fn gp_preset_waits_for_blocks_then_previews_first() {
        let mut cache = GeographyCache::new();
        load(&mut cache, CacheKey::Districts, districts());
        let mut selector = LocationSelector::new("Rajasthan");
        selector.change_scope(Scope::Gp, &cache);
        selector.open_dropdown(&cache);
        assert_eq!(selector.level(), DropdownLevel::Blocks);
        assert_eq!(selector.snapshot().preview_block_id, None);

        load(&mut cache, blocks_of(1), jodhpur_blocks());
        let t = selector.reconcile(&cache);
        assert_eq!(t.fetches, vec![gps_of(1, 10)]);
        assert_eq!(selector.snapshot().preview_block_id, Some(10));
        assert_eq!(selector.level(), DropdownLevel::Gps);
    }

    #[test]
    fn clicked_district_keeps_block_list_after_blocks_arrive() {
        let mut cache = GeographyCache::new();
        load(&mut cache, CacheKey::Districts, districts());
        load(&mut cache, blocks_of(1), jodhpur_blocks());
        let mut selector = LocationSelector::new("Rajasthan");
        selector.change_scope(Scope::Gp, &cache);
        selector.open_dropdown(&cache);

        selector.select_node(&GeoNode::district(2, "Barmer"), &cache);
        assert_eq!(selector.label(), "Select Block");
        load(&mut cache, blocks_of(2), Vec::new());
        assert!(selector.reconcile(&cache).fetches.is_empty());
        assert_eq!(selector.level(), DropdownLevel::Blocks);
        assert_eq!(selector.snapshot().preview_block_id, None);
    }

    #[test]
    fn hover_after_commit_keeps_breadcrumb() {
        let cache = full_cache();
        let mut selector = LocationSelector::new("Rajasthan");
        selector.change_scope(Scope::Block, &cache);
        selector.open_dropdown(&cache);
        selector.select_node(&jodhpur(), &cache);
        selector.select_node(&GeoNode::block(11, "Mandore", 1), &cache);
        assert_eq!(selector.label(), "Mandore");

        selector.open_dropdown(&cache);
        selector.hover_preview(&GeoNode::district(2, "Barmer"), &cache);
        selector.hover_preview(&jodhpur(), &cache);
        selector.close_dropdown();

        let snap = selector.snapshot();
        assert_eq!(snap.selected_location_label, "Mandore");
        assert_eq!(snap.selected_block_id, Some(11));
    }

    #[test]
    fn rehovering_previewed_district_keeps_gp_list() {
        let cache = full_cache();
        let mut selector = LocationSelector::new("Rajasthan");
        selector.change_scope(Scope::Gp, &cache);
        selector.open_dropdown(&cache);
        selector.hover_preview(&GeoNode::block(11, "Mandore", 1), &cache);
        assert_eq!(selector.level(), DropdownLevel::Gps);

        let t = selector.hover_preview(&jodhpur(), &cache);
        assert_eq!(t.fetches, vec![blocks_of(1)]);
        let snap = selector.snapshot();
        assert_eq!(snap.preview_block_id, Some(11));
        assert_eq!(snap.dropdown_level, DropdownLevel::Gps);
        assert_eq!(selector.options(&cache), OptionsView::Ready(mandore_gps()));

        selector.hover_preview(&GeoNode::district(2, "Barmer"), &cache);
        let snap = selector.snapshot();
        assert_eq!(snap.preview_block_id, None);
        assert_eq!(snap.dropdown_level, DropdownLevel::Blocks);
    }

    #[test]
    fn seed_drops_block_outside_district() {
        let mut selector = LocationSelector::new("Rajasthan");
        selector.seed(Some(jodhpur()), Some(GeoNode::block(20, "Balotra", 2)), None);
        assert_eq!(selector.path().block_id, None);
    }

    #[test]
    fn options_distinguish_loading_error_and_empty() {
        let mut cache = GeographyCache::new();
        load(&mut cache, CacheKey::Districts, districts());
        let mut selector = LocationSelector::new("Rajasthan");
        selector.change_scope(Scope::Block, &cache);
        selector.open_dropdown(&cache);

        selector.hover_preview(&jodhpur(), &cache);
        assert_eq!(selector.options(&cache), OptionsView::Loading);

        let ticket = cache.begin(blocks_of(1)).unwrap();
        cache.complete(ticket, Err("timeout".into()));
        assert!(matches!(selector.options(&cache), OptionsView::Error(ref e) if e.cause == "timeout"));

        selector.hover_preview(&GeoNode::district(2, "Barmer"), &cache);
        load(&mut cache, blocks_of(2), Vec::new());
        assert_eq!(selector.options(&cache), OptionsView::Empty);
    }

    #[test]
    fn close_dropdown_keeps_commitments() {
        let cache = full_cache();
        let mut selector = LocationSelector::new("Rajasthan");
        selector.change_scope(Scope::District, &cache);
        selector.open_dropdown(&cache);
        selector.close_dropdown();
        let snap = selector.snapshot();
        assert!(!snap.dropdown_open);
        assert_eq!(snap.selected_district_id, Some(1));
    }
}
