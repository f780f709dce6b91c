//! Render proxies for shield fields.
//!
//! Each projector draws its field through a proxy object owned by the
//! render side. The projector keeps only a [`ProxyHandle`], and the proxy
//! keeps only the owner's [`ProjectorId`]. Neither owns the other;
//! handles are resolved through the [`ProxyArena`] every tick.
//!
//! Handle ids are never reused, so a stale handle can only fail to
//! resolve, never alias a newer proxy.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::projector::ProjectorId;

/// Handle to a proxy in a [`ProxyArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProxyHandle(u64);

impl ProxyHandle {
    /// Raw id of the handle.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Render-side stand-in for one projector's field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShieldProxy {
    /// Projector this proxy draws for.
    pub owner: ProjectorId,
    /// Field center in world space.
    pub position: Vec2,
}

/// Everything needed to draw one field for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShieldDraw {
    /// Field center.
    pub center: Vec2,
    /// Hexagon radius.
    pub radius: f32,
    /// Culling size, `radius × 2 + 2`.
    pub draw_size: f32,
    /// Hexagon corners for the fill.
    pub hexagon: [Vec2; 6],
    /// White overlay alpha after a hit, absent when no flash is active.
    pub flash_alpha: Option<f32>,
}

/// Storage for live proxies.
#[derive(Debug, Clone)]
pub struct ProxyArena {
    proxies: HashMap<u64, ShieldProxy>,
    next_id: u64,
}

impl ProxyArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            proxies: HashMap::new(),
            next_id: 1,
        }
    }

    /// Resolve a handle.
    #[must_use]
    pub fn get(&self, handle: ProxyHandle) -> Option<&ShieldProxy> {
        self.proxies.get(&handle.0)
    }

    /// Check if a handle still resolves.
    #[must_use]
    pub fn contains(&self, handle: ProxyHandle) -> bool {
        self.proxies.contains_key(&handle.0)
    }

    /// Make sure `slot` refers to a live proxy, creating one if needed.
    ///
    /// Returns true if a proxy was created.
    pub fn ensure(&mut self, slot: &mut Option<ProxyHandle>, owner: ProjectorId, position: Vec2) -> bool {
        if let Some(handle) = *slot {
            if self.contains(handle) {
                return false;
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.proxies.insert(id, ShieldProxy { owner, position });
        *slot = Some(ProxyHandle(id));
        tracing::debug!(proxy = id, owner, "Created shield proxy");
        true
    }

    /// Remove a proxy.
    pub fn remove(&mut self, handle: ProxyHandle) -> Option<ShieldProxy> {
        self.proxies.remove(&handle.0)
    }

    /// Remove every proxy whose owner is no longer alive.
    ///
    /// Returns the number removed.
    pub fn sweep(&mut self, is_alive: impl Fn(ProjectorId) -> bool) -> usize {
        let before = self.proxies.len();
        self.proxies.retain(|_, proxy| is_alive(proxy.owner));
        let removed = before - self.proxies.len();
        if removed > 0 {
            tracing::debug!(removed, "Swept orphaned shield proxies");
        }
        removed
    }

    /// Number of live proxies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    /// Check if no proxies are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Live proxies in handle order.
    #[must_use]
    pub fn sorted(&self) -> Vec<(ProxyHandle, ShieldProxy)> {
        let mut proxies: Vec<_> = self
            .proxies
            .iter()
            .map(|(&id, &proxy)| (ProxyHandle(id), proxy))
            .collect();
        proxies.sort_unstable_by_key(|(handle, _)| *handle);
        proxies
    }
}

impl Default for ProxyArena {
    fn default() -> Self {
        Self::new()
    }
}
