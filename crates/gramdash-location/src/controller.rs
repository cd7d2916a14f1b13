//! Session-level location context shared by the dashboards.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gramdash_core::{DropdownLevel, GeoNode, GeoPath, Scope};

use crate::cache::{CacheKey, GeographyCache};
use crate::orchestrator::{FetchOrchestrator, FetchOutcome};
use crate::selector::{LocationSelector, OptionsView, SelectionEvent, SelectionSnapshot, Transition};
use crate::source::GeographySource;

/// Everything one interaction caused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    pub events: Vec<SelectionEvent>,
    pub outcomes: Vec<FetchOutcome>,
}

impl Effects {
    /// The last path committed by this interaction, if any.
    #[must_use]
    pub fn committed(&self) -> Option<GeoPath> {
        self.events.iter().rev().find_map(|e| match e {
            SelectionEvent::Committed(path) => Some(*path),
            SelectionEvent::ScopeChanged { .. } => None,
        })
    }
}

/// Drives a [`LocationSelector`] against a shared geography cache.
///
/// The selector lock is always taken before the cache lock, and neither is
/// held across a fetch.
pub struct LocationController<S> {
    selector: Mutex<LocationSelector>,
    fetcher: FetchOrchestrator<S>,
}

impl<S: GeographySource> LocationController<S> {
    pub fn new(source: S, state_name: impl Into<String>, page_limit: u32) -> Self {
        Self {
            selector: Mutex::new(LocationSelector::new(state_name)),
            fetcher: FetchOrchestrator::new(source, page_limit),
        }
    }

    #[must_use]
    pub fn fetcher(&self) -> &FetchOrchestrator<S> {
        &self.fetcher
    }

    fn selector(&self) -> MutexGuard<'_, LocationSelector> {
        self.selector.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_selector<R>(&self, f: impl FnOnce(&mut LocationSelector, &GeographyCache) -> R) -> R {
        let mut selector = self.selector();
        self.fetcher.read(|cache| f(&mut selector, cache))
    }

    pub async fn change_scope(&self, scope: Scope) -> Effects {
        let transition = self.with_selector(|sel, cache| sel.change_scope(scope, cache));
        let max_rank = scope.max_level().rank();
        let cancelled = self.fetcher.cancel_pending(|key| key.rank() > max_rank);
        if cancelled > 0 {
            tracing::debug!(cancelled, scope = %scope, "dropped fetches the new scope cannot show");
        }
        self.drive(transition).await
    }

    pub async fn hover_preview(&self, node: &GeoNode) -> Effects {
        let transition = self.with_selector(|sel, cache| sel.hover_preview(node, cache));
        self.drive(transition).await
    }

    pub async fn select_node(&self, node: &GeoNode) -> Effects {
        let transition = self.with_selector(|sel, cache| sel.select_node(node, cache));
        self.drive(transition).await
    }

    pub async fn open_dropdown(&self) -> Effects {
        let transition = self.with_selector(LocationSelector::open_dropdown);
        self.drive(transition).await
    }

    pub fn close_dropdown(&self) {
        self.selector().close_dropdown();
    }

    /// Restores a selection handed down by a parent view.
    pub fn seed(&self, district: Option<GeoNode>, block: Option<GeoNode>, gp: Option<GeoNode>) {
        self.selector().seed(district, block, gp);
    }

    /// Re-fetches the list the dropdown is showing.
    pub async fn retry(&self) -> Effects {
        let key = self.with_selector(|sel, _| visible_key(&sel.snapshot()));
        let Some(key) = key else {
            return Effects::default();
        };
        let outcome = self.fetcher.refresh(key).await;
        let mut effects = Effects::default();
        self.settle(outcome, &mut effects, &mut VecDeque::new());
        effects
    }

    #[must_use]
    pub fn snapshot(&self) -> SelectionSnapshot {
        self.selector().snapshot()
    }

    #[must_use]
    pub fn options(&self) -> OptionsView {
        self.with_selector(|sel, cache| sel.options(cache))
    }

    /// Issues the transition's fetches one after another. Each applied
    /// response gives the selector a chance to reconcile, which may queue
    /// further fetches.
    async fn drive(&self, transition: Transition) -> Effects {
        let mut effects = Effects::default();
        effects.events.extend(transition.event);
        let mut queue: VecDeque<CacheKey> = transition.fetches.into();
        while let Some(key) = queue.pop_front() {
            let outcome = self.fetcher.ensure(key).await;
            self.settle(outcome, &mut effects, &mut queue);
        }
        effects
    }

    fn settle(&self, outcome: FetchOutcome, effects: &mut Effects, queue: &mut VecDeque<CacheKey>) {
        if matches!(outcome, FetchOutcome::Applied { .. }) {
            let follow = self.with_selector(LocationSelector::reconcile);
            effects.events.extend(follow.event);
            queue.extend(follow.fetches);
        }
        effects.outcomes.push(outcome);
    }
}

fn visible_key(snapshot: &SelectionSnapshot) -> Option<CacheKey> {
    let district_id = snapshot.preview_district_id.or(snapshot.selected_district_id);
    let block_id = snapshot.preview_block_id.or(snapshot.selected_block_id);
    match snapshot.dropdown_level {
        DropdownLevel::Districts => Some(CacheKey::Districts),
        DropdownLevel::Blocks => district_id.map(|district_id| CacheKey::Blocks { district_id }),
        DropdownLevel::Gps => match (district_id, block_id) {
            (Some(district_id), Some(block_id)) => Some(CacheKey::GramPanchayats {
                district_id,
                block_id,
            }),
            _ => None,
        },
    }
}

/// A location pinned by the user's role (a VDO's GP, a BDO's block).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLocation {
    scope: Scope,
    path: GeoPath,
    label: String,
}

impl FixedLocation {
    #[must_use]
    pub fn gram_panchayat(district: &GeoNode, block: &GeoNode, gp: &GeoNode) -> Self {
        Self {
            scope: Scope::Gp,
            path: GeoPath {
                district_id: Some(district.id),
                block_id: Some(block.id),
                gp_id: Some(gp.id),
            },
            label: gp.name.clone(),
        }
    }

    #[must_use]
    pub fn block(district: &GeoNode, block: &GeoNode) -> Self {
        Self {
            scope: Scope::Block,
            path: GeoPath {
                district_id: Some(district.id),
                block_id: Some(block.id),
                gp_id: None,
            },
            label: block.name.clone(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            active_scope: self.scope,
            dropdown_level: self.scope.max_level(),
            dropdown_open: false,
            selected_location_label: self.label.clone(),
            selected_district_id: self.path.district_id,
            selected_block_id: self.path.block_id,
            selected_gp_id: self.path.gp_id,
            preview_district_id: None,
            preview_block_id: None,
        }
    }
}

/// The location capability a view is built with: either a controller it may
/// drive, or a read-only fixed location.
pub enum LocationContext<S> {
    Interactive(Arc<LocationController<S>>),
    Fixed(FixedLocation),
}

impl<S> Clone for LocationContext<S> {
    fn clone(&self) -> Self {
        match self {
            LocationContext::Interactive(controller) => {
                LocationContext::Interactive(Arc::clone(controller))
            }
            LocationContext::Fixed(fixed) => LocationContext::Fixed(fixed.clone()),
        }
    }
}

impl<S: GeographySource> LocationContext<S> {
    /// The controller, when this view may change the location.
    #[must_use]
    pub fn controller(&self) -> Option<&Arc<LocationController<S>>> {
        match self {
            LocationContext::Interactive(controller) => Some(controller),
            LocationContext::Fixed(_) => None,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SelectionSnapshot {
        match self {
            LocationContext::Interactive(controller) => controller.snapshot(),
            LocationContext::Fixed(fixed) => fixed.snapshot(),
        }
    }

    /// Ignored for a fixed location.
    pub async fn change_scope(&self, scope: Scope) -> Effects {
        match self.controller() {
            Some(controller) => controller.change_scope(scope).await,
            None => Effects::default(),
        }
    }

    /// Ignored for a fixed location.
    pub async fn hover_preview(&self, node: &GeoNode) -> Effects {
        match self.controller() {
            Some(controller) => controller.hover_preview(node).await,
            None => Effects::default(),
        }
    }

    /// Ignored for a fixed location.
    pub async fn select_node(&self, node: &GeoNode) -> Effects {
        match self.controller() {
            Some(controller) => controller.select_node(node).await,
            None => Effects::default(),
        }
    }
}
