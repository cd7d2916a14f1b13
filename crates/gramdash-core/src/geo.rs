//! Administrative geography: the State → District → Block → Gram Panchayat
//! hierarchy and the scopes a dashboard can focus on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

pub type GeoId = i64;

/// Fixed rank of a node in the hierarchy. Districts are rank 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoRank {
    District,
    Block,
    GramPanchayat,
}

impl GeoRank {
    #[must_use]
    pub fn parent(self) -> Option<GeoRank> {
        match self {
            GeoRank::District => None,
            GeoRank::Block => Some(GeoRank::District),
            GeoRank::GramPanchayat => Some(GeoRank::Block),
        }
    }

    #[must_use]
    pub fn child(self) -> Option<GeoRank> {
        match self {
            GeoRank::District => Some(GeoRank::Block),
            GeoRank::Block => Some(GeoRank::GramPanchayat),
            GeoRank::GramPanchayat => None,
        }
    }
}

impl fmt::Display for GeoRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoRank::District => write!(f, "district"),
            GeoRank::Block => write!(f, "block"),
            GeoRank::GramPanchayat => write!(f, "gram panchayat"),
        }
    }
}

/// A district, block or gram panchayat as held by the geography cache.
///
/// `parent_id` is `None` only for districts; blocks point at their district
/// and gram panchayats at their block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoNode {
    pub id: GeoId,
    pub name: String,
    pub parent_id: Option<GeoId>,
    pub rank: GeoRank,
}

impl GeoNode {
    #[must_use]
    pub fn district(id: GeoId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: None,
            rank: GeoRank::District,
        }
    }

    #[must_use]
    pub fn block(id: GeoId, name: impl Into<String>, district_id: GeoId) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: Some(district_id),
            rank: GeoRank::Block,
        }
    }

    #[must_use]
    pub fn gram_panchayat(id: GeoId, name: impl Into<String>, block_id: GeoId) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: Some(block_id),
            rank: GeoRank::GramPanchayat,
        }
    }

    /// True when this node hangs directly under `parent`.
    #[must_use]
    pub fn is_child_of(&self, parent: &GeoNode) -> bool {
        parent.rank.child() == Some(self.rank) && self.parent_id == Some(parent.id)
    }
}

/// The resolved district/block/GP ids of a selection. Ids deeper than the
/// active scope are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeoPath {
    pub district_id: Option<GeoId>,
    pub block_id: Option<GeoId>,
    pub gp_id: Option<GeoId>,
}

impl GeoPath {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.district_id.is_none() && self.block_id.is_none() && self.gp_id.is_none()
    }

    /// The single `(param, id)` pair a scoped backend query filters on: the
    /// district under `District` scope, the block under `Block`, the GP under
    /// `Gp`, nothing for `State` or when the scope's node is unresolved.
    #[must_use]
    pub fn scope_param(&self, scope: Scope) -> Option<(&'static str, GeoId)> {
        match scope {
            Scope::State => None,
            Scope::District => self.district_id.map(|id| ("district_id", id)),
            Scope::Block => self.block_id.map(|id| ("block_id", id)),
            Scope::Gp => self.gp_id.map(|id| ("gp_id", id)),
        }
    }
}

/// The administrative level a dashboard view is focused on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    State,
    District,
    Block,
    Gp,
}

impl Scope {
    pub const ALL: [Scope; 4] = [Scope::State, Scope::District, Scope::Block, Scope::Gp];

    /// Rank whose selection completes this scope. `State` needs none.
    #[must_use]
    pub fn terminal_rank(self) -> Option<GeoRank> {
        match self {
            Scope::State => None,
            Scope::District => Some(GeoRank::District),
            Scope::Block => Some(GeoRank::Block),
            Scope::Gp => Some(GeoRank::GramPanchayat),
        }
    }

    /// Deepest dropdown level reachable under this scope.
    #[must_use]
    pub fn max_level(self) -> DropdownLevel {
        match self {
            Scope::State | Scope::District => DropdownLevel::Districts,
            Scope::Block => DropdownLevel::Blocks,
            Scope::Gp => DropdownLevel::Gps,
        }
    }

    /// Hover previews only exist where the dropdown has more than one level.
    #[must_use]
    pub fn supports_preview(self) -> bool {
        matches!(self, Scope::Block | Scope::Gp)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Scope::State => "State",
            Scope::District => "Districts",
            Scope::Block => "Blocks",
            Scope::Gp => "GPs",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Scope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "state" => Ok(Scope::State),
            "district" | "districts" => Ok(Scope::District),
            "block" | "blocks" => Ok(Scope::Block),
            "gp" | "gps" | "village" | "villages" => Ok(Scope::Gp),
            _ => Err(CoreError::UnknownScope(s.to_string())),
        }
    }
}

/// Which list the location dropdown is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropdownLevel {
    Districts,
    Blocks,
    Gps,
}

impl DropdownLevel {
    #[must_use]
    pub fn rank(self) -> GeoRank {
        match self {
            DropdownLevel::Districts => GeoRank::District,
            DropdownLevel::Blocks => GeoRank::Block,
            DropdownLevel::Gps => GeoRank::GramPanchayat,
        }
    }
}

impl fmt::Display for DropdownLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropdownLevel::Districts => write!(f, "districts"),
            DropdownLevel::Blocks => write!(f, "blocks"),
            DropdownLevel::Gps => write!(f, "gps"),
        }
    }
}
