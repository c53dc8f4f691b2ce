//! Region orchestration.
//!
//! `CameraManager` owns every region of a combat scene. Gameplay reports
//! spawns and despawns; once per frame `advance` runs the fixed tick order:
//!
//! 1. purge targets the provider reports as gone
//! 2. engagement state machine for every secondary region
//! 3. partition of the engagement zone (only when the active set changed)
//! 4. framing of every enabled region
//! 5. screen shake
//! 6. combat state
//!
//! Which region owns a target is recorded in one place, the owner map. Merge
//! and split transfer ownership between a secondary region and the primary.

use std::collections::{HashMap, VecDeque};

use bevy::math::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::CameraConfig;
use crate::engagement::{
    EngagementState, Thresholds, Transition, horizontal_distance, next_state, transition,
};
use crate::error::{ConfigError, RegionError};
use crate::geometry::NormRect;
use crate::offscreen::{OffscreenIndicator, indicator};
use crate::partition::partition;
use crate::region::{RegionKind, RegionView, SlotId, ViewportRegion};
use crate::shake::ShakeState;
use crate::target::{TargetId, TargetProvider, TargetSnapshot, TrackedEntity};

/// Outbound notification, drained by the host once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraEvent {
    RegionCreated {
        slot: SlotId,
        kind: RegionKind,
        target: TargetId,
    },
    RegionRemoved {
        slot: SlotId,
        kind: RegionKind,
    },
    /// First engagement of a region since it was created.
    NewlyEngaged { slot: SlotId, target: TargetId },
    Merged { slot: SlotId, target: TargetId },
    Split { slot: SlotId, target: TargetId },
    /// At least one region became engaged after none were.
    EngagementStarted,
    /// The last engaged region disengaged.
    EngagementCleared,
    /// All slots were taken; the target waits in the pending queue.
    CapacityRefused { target: TargetId },
}

/// Owns and drives all camera regions of one combat scene.
#[derive(Debug)]
pub struct CameraManager {
    config: CameraConfig,
    thresholds: Thresholds,
    slots: Vec<Option<ViewportRegion>>,
    /// Single source of truth for which region frames a target.
    owners: HashMap<TargetId, SlotId>,
    /// Targets refused for capacity, retried in order when a slot frees.
    pending: VecDeque<(TargetId, bool)>,
    primary: Option<SlotId>,
    radar: Option<SlotId>,
    /// Active secondary slots the current partition was computed for.
    partitioned: Vec<SlotId>,
    partition_dirty: bool,
    engaged: bool,
    screen_aspect: f32,
    rng: ChaCha8Rng,
    events: Vec<CameraEvent>,
}

impl CameraManager {
    /// Validates `config` and creates an empty manager.
    pub fn new(config: CameraConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let slots = (0..config.max_concurrent_regions).map(|_| None).collect();

        Ok(Self {
            thresholds: Thresholds::from(&config),
            rng: ChaCha8Rng::seed_from_u64(config.shake.seed),
            config,
            slots,
            owners: HashMap::new(),
            pending: VecDeque::new(),
            primary: None,
            radar: None,
            partitioned: Vec::new(),
            partition_dirty: true,
            engaged: false,
            screen_aspect: 16.0 / 9.0,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn screen_aspect(&self) -> f32 {
        self.screen_aspect
    }

    pub fn set_screen_aspect(&mut self, aspect: f32) {
        self.screen_aspect = aspect;
    }

    /// Moves the engagement zone at runtime. The partition is recomputed on the next tick.
    pub fn set_engagement_zone(&mut self, zone: NormRect) -> Result<(), ConfigError> {
        self.config.check_engagement_zone(zone)?;
        self.config.engagement_zone = zone;
        self.partition_dirty = true;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Creates a region for a newly spawned entity.
    ///
    /// A primary spawn also creates the radar region when one is configured
    /// and a slot is left for it. When every slot is taken the target is
    /// queued and admitted as soon as a slot frees.
    pub fn on_target_spawned(
        &mut self,
        id: TargetId,
        is_primary: bool,
    ) -> Result<SlotId, RegionError> {
        match self.spawn_region(id, is_primary) {
            Err(RegionError::CapacityExceeded { capacity }) => {
                tracing::warn!(
                    "[camera] No free region slot for {:?} (capacity {}), queued",
                    id,
                    capacity
                );
                self.pending.push_back((id, is_primary));
                self.events.push(CameraEvent::CapacityRefused { target: id });
                Err(RegionError::CapacityExceeded { capacity })
            }
            other => other,
        }
    }

    fn spawn_region(&mut self, id: TargetId, is_primary: bool) -> Result<SlotId, RegionError> {
        if self.owners.contains_key(&id) || self.pending.iter().any(|(t, _)| *t == id) {
            return Err(RegionError::AlreadyTracked(id));
        }
        if is_primary && let Some(existing) = self.primary_target() {
            return Err(RegionError::PrimaryExists(existing));
        }

        let slot = self.free_slot().ok_or(RegionError::CapacityExceeded {
            capacity: self.slots.len(),
        })?;

        let (kind, rect) = if is_primary {
            (RegionKind::Primary, self.config.primary_zone)
        } else {
            (RegionKind::Secondary, self.config.engagement_zone)
        };
        self.insert_region(ViewportRegion::new(
            slot,
            kind,
            id,
            rect,
            self.config.minimum_zoom,
        ));
        self.owners.insert(id, slot);

        if is_primary {
            self.primary = Some(slot);
            if let Some(radar) = self.config.radar {
                match self.free_slot() {
                    Some(radar_slot) => {
                        self.insert_region(ViewportRegion::new(
                            radar_slot,
                            RegionKind::Radar,
                            id,
                            radar.zone,
                            self.config.minimum_zoom,
                        ));
                        self.radar = Some(radar_slot);
                    }
                    None => {
                        tracing::warn!("[camera] No free slot left for the radar region");
                    }
                }
            }
        }

        Ok(slot)
    }

    fn insert_region(&mut self, region: ViewportRegion) {
        let slot = region.slot();
        tracing::info!(
            "[camera] Region {} created ({:?}) for {:?}",
            slot.0,
            region.kind(),
            region.home()
        );
        self.events.push(CameraEvent::RegionCreated {
            slot,
            kind: region.kind(),
            target: region.home(),
        });
        self.slots[slot.0] = Some(region);
    }

    /// Drops every reference to a destroyed entity and tears down the region created for it.
    pub fn on_target_destroyed(&mut self, id: TargetId) -> Result<(), RegionError> {
        if let Some(index) = self.pending.iter().position(|(t, _)| *t == id) {
            self.pending.remove(index);
            return Ok(());
        }

        let owner = self
            .owners
            .remove(&id)
            .ok_or(RegionError::UnknownTarget(id))?;

        if self.primary_target() == Some(id) {
            self.remove_primary();
        } else {
            if let Some(region) = self.region_mut(owner) {
                region.remove_target(id);
            }
            if let Some(home) = self.home_slot_of(id) {
                self.take_region(home);
            }
        }

        tracing::info!("[camera] Target {:?} destroyed", id);
        self.admit_pending();
        Ok(())
    }

    /// Tears down the primary and radar regions, handing merged entities back to their own regions.
    fn remove_primary(&mut self) {
        let Some(slot) = self.primary.take() else {
            return;
        };
        let Some(region) = self.take_region(slot) else {
            return;
        };

        for &target in region.targets().iter().filter(|t| **t != region.home()) {
            let Some(home) = self.home_slot_of(target) else {
                self.owners.remove(&target);
                continue;
            };
            if let Some(secondary) = self.region_mut(home) {
                secondary.add_target(target);
                secondary.engagement = EngagementState::Disabled;
            }
            self.owners.insert(target, home);
            self.events.push(CameraEvent::Split { slot: home, target });
        }

        if let Some(radar) = self.radar.take() {
            self.take_region(radar);
        }
    }

    fn take_region(&mut self, slot: SlotId) -> Option<ViewportRegion> {
        let region = self.slots.get_mut(slot.0)?.take()?;
        tracing::info!("[camera] Region {} removed ({:?})", slot.0, region.kind());
        self.events.push(CameraEvent::RegionRemoved {
            slot,
            kind: region.kind(),
        });
        self.partition_dirty = true;
        Some(region)
    }

    fn admit_pending(&mut self) {
        while self.free_slot().is_some() {
            let Some((id, is_primary)) = self.pending.pop_front() else {
                break;
            };
            match self.spawn_region(id, is_primary) {
                Ok(slot) => {
                    tracing::info!("[camera] Pending target {:?} admitted to region {}", id, slot.0);
                }
                Err(err) => {
                    tracing::warn!("[camera] Dropping pending target {:?}: {}", id, err);
                }
            }
        }
    }

    /// Removes every region. Called at scene end.
    pub fn clear(&mut self) {
        for index in 0..self.slots.len() {
            self.take_region(SlotId(index));
        }
        self.owners.clear();
        self.pending.clear();
        self.primary = None;
        self.radar = None;
        self.partitioned.clear();
        if self.engaged {
            self.engaged = false;
            self.events.push(CameraEvent::EngagementCleared);
        }
    }

    // ---------------------------------------------------------------------
    // Merge / split
    // ---------------------------------------------------------------------

    /// Moves a secondary region's entity into the primary region.
    ///
    /// Returns false when nothing changed (already merged, no primary, not a secondary).
    pub fn merge_region(&mut self, slot: SlotId) -> bool {
        let Some(primary) = self.primary else {
            return false;
        };
        let (home, was_merged) = match self.region_mut(slot) {
            Some(region) if region.kind() == RegionKind::Secondary => {
                let home = region.home();
                let was_merged = region.is_merged();
                region.remove_target(home);
                region.engagement = EngagementState::Merged;
                (home, was_merged)
            }
            _ => return false,
        };

        let added = self
            .region_mut(primary)
            .is_some_and(|region| region.add_target(home));
        self.owners.insert(home, primary);

        if !was_merged {
            tracing::info!("[camera] Region {} merged into primary", slot.0);
            self.events.push(CameraEvent::Merged { slot, target: home });
        }
        added || !was_merged
    }

    /// Returns a merged entity from the primary region to its own region.
    ///
    /// Returns false and leaves the region untouched when it is not merged.
    pub fn split_region(&mut self, slot: SlotId) -> bool {
        let home = match self.region_mut(slot) {
            Some(region) if region.kind() == RegionKind::Secondary && region.is_merged() => {
                let home = region.home();
                region.add_target(home);
                region.engagement = EngagementState::Active;
                home
            }
            _ => return false,
        };

        if let Some(region) = self.primary.and_then(|primary| self.region_mut(primary)) {
            region.remove_target(home);
        }
        self.owners.insert(home, slot);

        tracing::info!("[camera] Region {} split from primary", slot.0);
        self.events.push(CameraEvent::Split { slot, target: home });
        true
    }

    // ---------------------------------------------------------------------
    // Tick
    // ---------------------------------------------------------------------

    /// Runs one frame of the camera director.
    pub fn advance(&mut self, delta_seconds: f32, provider: &impl TargetProvider) {
        self.purge_gone(provider);
        self.update_engagement(provider);
        self.update_partition();
        self.frame_regions(delta_seconds, provider);
        self.update_shake(delta_seconds);
        self.update_combat_state();
    }

    fn purge_gone(&mut self, provider: &impl TargetProvider) {
        // Queued targets go first so a freed slot is never handed to a dead entity.
        self.pending.retain(|(id, _)| {
            let alive = provider.snapshot(*id).is_some();
            if !alive {
                tracing::debug!("[camera] Pending target {:?} is gone, dropped from queue", id);
            }
            alive
        });

        let mut gone: Vec<TargetId> = self
            .owners
            .keys()
            .copied()
            .filter(|id| provider.snapshot(*id).is_none())
            .collect();
        gone.sort();
        for id in gone {
            // Tearing down the primary can already have released this target.
            if !self.owners.contains_key(&id) {
                continue;
            }
            if let Err(err) = self.on_target_destroyed(id) {
                tracing::debug!("[camera] Purging gone target {:?}: {}", id, err);
            }
        }
    }

    fn update_engagement(&mut self, provider: &impl TargetProvider) {
        let primary_x = self
            .primary_target()
            .and_then(|id| provider.snapshot(id))
            .map(|snapshot| snapshot.follow_anchor().x);

        for slot in self.slots_of_kind(RegionKind::Secondary) {
            let Some((home, current)) = self.region(slot).map(|r| (r.home(), r.engagement())) else {
                continue;
            };
            let Some(snapshot) = provider.snapshot(home) else {
                continue;
            };
            let distance = primary_x.map_or(f32::INFINITY, |x| {
                horizontal_distance(snapshot.follow_anchor().x, x)
            });
            let next = next_state(current, distance, &self.thresholds);

            match transition(current, next) {
                Some(Transition::Engage) => {
                    if let Some(region) = self.region_mut(slot) {
                        region.engagement = EngagementState::Active;
                    }
                    tracing::info!("[camera] Region {} engaged at distance {:.2}", slot.0, distance);
                    self.notify_engaged(slot, home);
                }
                Some(Transition::Disengage) => {
                    if let Some(region) = self.region_mut(slot) {
                        region.engagement = EngagementState::Disabled;
                    }
                    tracing::info!("[camera] Region {} disengaged at distance {:.2}", slot.0, distance);
                }
                Some(Transition::Merge) => {
                    self.merge_region(slot);
                    self.notify_engaged(slot, home);
                }
                Some(Transition::Split) => {
                    self.split_region(slot);
                }
                Some(Transition::SplitAndDisengage) => {
                    self.split_region(slot);
                    if let Some(region) = self.region_mut(slot) {
                        region.engagement = EngagementState::Disabled;
                    }
                    tracing::info!("[camera] Region {} disengaged at distance {:.2}", slot.0, distance);
                }
                None => {}
            }
        }
    }

    fn notify_engaged(&mut self, slot: SlotId, target: TargetId) {
        let Some(region) = self.region_mut(slot) else {
            return;
        };
        if !region.ever_engaged {
            region.ever_engaged = true;
            self.events.push(CameraEvent::NewlyEngaged { slot, target });
        }
    }

    fn update_partition(&mut self) {
        let active = self.active_slots();
        if active == self.partitioned && !self.partition_dirty {
            return;
        }

        let rects = partition(
            self.config.engagement_zone,
            active.len(),
            self.config.separator_normalized(),
        );
        for (slot, rect) in active.iter().zip(rects) {
            if let Some(region) = self.region_mut(*slot) {
                region.set_rect(rect);
            }
        }
        tracing::debug!("[camera] Engagement zone split across {} regions", active.len());

        self.partitioned = active;
        self.partition_dirty = false;
    }

    fn frame_regions(&mut self, delta_seconds: f32, provider: &impl TargetProvider) {
        let config = &self.config;
        let screen_aspect = self.screen_aspect;

        for region in self.slots.iter_mut().flatten() {
            if !region.is_enabled() {
                continue;
            }
            let snapshots: Vec<TargetSnapshot> = region
                .targets()
                .iter()
                .filter_map(|id| provider.snapshot(*id))
                .collect();
            region.frame(&snapshots, config, screen_aspect, delta_seconds);
        }
    }

    fn update_shake(&mut self, delta_seconds: f32) {
        let enabled = self.config.shake.enabled;

        for region in self.slots.iter_mut().flatten() {
            let running = enabled && region.shake.is_some_and(|shake| !shake.is_finished());
            match region.shake.as_mut() {
                Some(shake) if running => {
                    region.shake_offset = shake.sample(&mut self.rng);
                    shake.advance(delta_seconds);
                }
                _ => {
                    region.shake = None;
                    region.shake_offset = Vec2::ZERO;
                }
            }
        }
    }

    fn update_combat_state(&mut self) {
        let engaged = self
            .slots
            .iter()
            .flatten()
            .any(|r| r.kind() == RegionKind::Secondary && r.engagement().is_engaged());
        if engaged == self.engaged {
            return;
        }

        self.engaged = engaged;
        if engaged {
            tracing::info!("[camera] Combat started");
            self.events.push(CameraEvent::EngagementStarted);
        } else {
            tracing::info!("[camera] Combat cleared");
            self.events.push(CameraEvent::EngagementCleared);
        }
    }

    // ---------------------------------------------------------------------
    // Runtime effects
    // ---------------------------------------------------------------------

    /// Starts a decaying shake on one region. Radar regions refuse.
    pub fn shake(&mut self, slot: SlotId, intensity: f32, duration: f32) -> Result<(), RegionError> {
        let enabled = self.config.shake.enabled;
        let region = self.region_mut(slot).ok_or(RegionError::NoSuchRegion(slot))?;
        if region.kind() == RegionKind::Radar {
            tracing::warn!("[camera] Shake rejected for radar region {}", slot.0);
            return Err(RegionError::ShakeUnsupported(slot));
        }
        if enabled {
            region.shake = Some(ShakeState::new(intensity, duration));
        }
        Ok(())
    }

    /// Indicator for a target outside the primary region's frame.
    pub fn offscreen_indicator(
        &self,
        target: TargetId,
        provider: &impl TargetProvider,
        edge_distance: f32,
    ) -> Option<OffscreenIndicator> {
        let view = self.region(self.primary?)?.view();
        let point = provider.snapshot(target)?.follow_anchor();
        indicator(&view.world_frame(self.screen_aspect), point, edge_distance)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn region(&self, slot: SlotId) -> Option<&ViewportRegion> {
        self.slots.get(slot.0)?.as_ref()
    }

    fn region_mut(&mut self, slot: SlotId) -> Option<&mut ViewportRegion> {
        self.slots.get_mut(slot.0)?.as_mut()
    }

    pub fn regions(&self) -> impl Iterator<Item = &ViewportRegion> {
        self.slots.iter().flatten()
    }

    pub fn region_count(&self) -> usize {
        self.regions().count()
    }

    pub fn primary_slot(&self) -> Option<SlotId> {
        self.primary
    }

    pub fn radar_slot(&self) -> Option<SlotId> {
        self.radar
    }

    pub fn primary_target(&self) -> Option<TargetId> {
        self.region(self.primary?).map(ViewportRegion::home)
    }

    /// Region currently framing `target`.
    pub fn owner_of(&self, target: TargetId) -> Option<SlotId> {
        self.owners.get(&target).copied()
    }

    /// Region currently framing the primary entity.
    pub fn region_holding_primary(&self) -> Option<SlotId> {
        self.owner_of(self.primary_target()?)
    }

    /// Active, unmerged secondary regions in slot order.
    pub fn active_slots(&self) -> Vec<SlotId> {
        self.regions()
            .filter(|r| r.kind() == RegionKind::Secondary && r.engagement() == EngagementState::Active)
            .map(ViewportRegion::slot)
            .collect()
    }

    pub fn active_region_count(&self) -> usize {
        self.active_slots().len()
    }

    /// Position of `slot` among the active secondary regions (left to right).
    pub fn active_index_of(&self, slot: SlotId) -> Option<usize> {
        self.active_slots().iter().position(|s| *s == slot)
    }

    pub fn pending_targets(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.pending.iter().map(|(id, _)| *id)
    }

    /// Whether any secondary region is active or merged.
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn views(&self) -> Vec<RegionView> {
        self.regions().map(ViewportRegion::view).collect()
    }

    pub fn drain_events(&mut self) -> Vec<CameraEvent> {
        std::mem::take(&mut self.events)
    }

    fn free_slot(&self) -> Option<SlotId> {
        self.slots.iter().position(Option::is_none).map(SlotId)
    }

    fn slots_of_kind(&self, kind: RegionKind) -> Vec<SlotId> {
        self.regions()
            .filter(|r| r.kind() == kind)
            .map(ViewportRegion::slot)
            .collect()
    }

    /// Secondary region created for `target`.
    fn home_slot_of(&self, target: TargetId) -> Option<SlotId> {
        self.regions()
            .find(|r| r.kind() == RegionKind::Secondary && r.home() == target)
            .map(ViewportRegion::slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Extents;

    const PLAYER: TargetId = TargetId(1);
    const ENEMY: TargetId = TargetId(2);
    const DT: f32 = 1.0 / 60.0;

    fn config() -> CameraConfig {
        CameraConfig {
            engagement_distance: 10.0,
            share_distance: 3.0,
            minimum_zoom: 0.1,
            radar: None,
            ..CameraConfig::default()
        }
    }

    fn tank(x: f32) -> TargetSnapshot {
        TargetSnapshot::new(Vec2::new(x, 0.0), Extents::symmetric(1.0, 1.0))
    }

    fn world(entries: &[(TargetId, f32)]) -> HashMap<TargetId, TargetSnapshot> {
        entries.iter().map(|(id, x)| (*id, tank(*x))).collect()
    }

    fn count(events: &[CameraEvent], pred: impl Fn(&CameraEvent) -> bool) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    fn duel() -> (CameraManager, SlotId, SlotId) {
        let mut manager = CameraManager::new(config()).unwrap();
        let primary = manager.on_target_spawned(PLAYER, true).unwrap();
        let enemy = manager.on_target_spawned(ENEMY, false).unwrap();
        (manager, primary, enemy)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = CameraConfig {
            share_distance: 20.0,
            engagement_distance: 10.0,
            ..config()
        };
        assert!(matches!(
            CameraManager::new(config),
            Err(ConfigError::NoHysteresis { .. })
        ));
    }

    #[test]
    fn test_engage_merge_split_walkthrough() {
        let (mut manager, primary, enemy) = duel();

        manager.advance(DT, &world(&[(PLAYER, 0.0), (ENEMY, 12.0)]));
        assert_eq!(manager.region(enemy).unwrap().engagement(), EngagementState::Disabled);
        assert!(!manager.region(enemy).unwrap().is_enabled());
        manager.drain_events();

        manager.advance(DT, &world(&[(PLAYER, 0.0), (ENEMY, 8.0)]));
        assert_eq!(manager.region(enemy).unwrap().engagement(), EngagementState::Active);
        let events = manager.drain_events();
        assert_eq!(count(&events, |e| matches!(e, CameraEvent::NewlyEngaged { .. })), 1);
        assert!(events.contains(&CameraEvent::EngagementStarted));
        assert!(manager.is_engaged());

        manager.advance(DT, &world(&[(PLAYER, 0.0), (ENEMY, 2.0)]));
        assert!(manager.region(enemy).unwrap().is_merged());
        assert!(!manager.region(enemy).unwrap().is_enabled());
        assert_eq!(manager.region(primary).unwrap().targets(), &[PLAYER, ENEMY]);
        assert_eq!(manager.owner_of(ENEMY), Some(primary));
        assert!(manager.region(primary).unwrap().has_follow_point());

        manager.advance(DT, &world(&[(PLAYER, 0.0), (ENEMY, 5.0)]));
        assert_eq!(manager.region(enemy).unwrap().engagement(), EngagementState::Active);
        assert_eq!(manager.region(primary).unwrap().targets(), &[PLAYER]);
        assert_eq!(manager.region(enemy).unwrap().targets(), &[ENEMY]);
        assert_eq!(manager.owner_of(ENEMY), Some(enemy));
        assert!(!manager.region(primary).unwrap().has_follow_point());

        // Re-engaging never repeats the one-time notification.
        let events = manager.drain_events();
        assert_eq!(count(&events, |e| matches!(e, CameraEvent::NewlyEngaged { .. })), 0);
        assert_eq!(count(&events, |e| matches!(e, CameraEvent::Split { .. })), 1);

        manager.advance(DT, &world(&[(PLAYER, 0.0), (ENEMY, 30.0)]));
        assert!(!manager.is_engaged());
        assert!(manager.drain_events().contains(&CameraEvent::EngagementCleared));
    }

    #[test]
    fn test_merge_twice_keeps_single_entry() {
        let (mut manager, primary, enemy) = duel();

        // Nothing to split while the region is still disabled.
        assert!(!manager.split_region(enemy));
        assert_eq!(manager.region(enemy).unwrap().engagement(), EngagementState::Disabled);
        assert_eq!(manager.active_region_count(), 0);

        assert!(manager.merge_region(enemy));
        assert!(!manager.merge_region(enemy));
        let primary_targets = manager.region(primary).unwrap().targets();
        assert_eq!(primary_targets.iter().filter(|t| **t == ENEMY).count(), 1);

        assert!(manager.split_region(enemy));
        assert!(!manager.split_region(enemy));
        assert_eq!(manager.region(primary).unwrap().targets(), &[PLAYER]);
        assert_eq!(manager.region(enemy).unwrap().targets(), &[ENEMY]);
    }

    #[test]
    fn test_capacity_refusal_queues_target() {
        let config = CameraConfig {
            max_concurrent_regions: 2,
            ..config()
        };
        let mut manager = CameraManager::new(config).unwrap();
        manager.on_target_spawned(PLAYER, true).unwrap();
        let first = manager.on_target_spawned(ENEMY, false).unwrap();

        let third = TargetId(3);
        assert_eq!(
            manager.on_target_spawned(third, false),
            Err(RegionError::CapacityExceeded { capacity: 2 })
        );
        assert_eq!(manager.pending_targets().collect::<Vec<_>>(), vec![third]);
        assert!(
            manager
                .drain_events()
                .contains(&CameraEvent::CapacityRefused { target: third })
        );

        manager.on_target_destroyed(ENEMY).unwrap();
        assert_eq!(manager.owner_of(third), Some(first));
        assert_eq!(manager.pending_targets().count(), 0);
    }

    #[test]
    fn test_duplicate_spawns_are_refused() {
        let (mut manager, _, _) = duel();
        assert_eq!(
            manager.on_target_spawned(ENEMY, false),
            Err(RegionError::AlreadyTracked(ENEMY))
        );
        assert_eq!(
            manager.on_target_spawned(TargetId(9), true),
            Err(RegionError::PrimaryExists(PLAYER))
        );
        assert_eq!(
            manager.on_target_destroyed(TargetId(9)),
            Err(RegionError::UnknownTarget(TargetId(9)))
        );
    }

    #[test]
    fn test_destroying_merged_entity_tears_down_its_region() {
        let (mut manager, primary, enemy) = duel();
        manager.advance(DT, &world(&[(PLAYER, 0.0), (ENEMY, 1.0)]));
        assert!(manager.region(enemy).unwrap().is_merged());
        manager.drain_events();

        manager.on_target_destroyed(ENEMY).unwrap();
        assert!(manager.region(enemy).is_none());
        assert_eq!(manager.region(primary).unwrap().targets(), &[PLAYER]);
        assert_eq!(manager.owner_of(ENEMY), None);
        assert!(manager.drain_events().contains(&CameraEvent::RegionRemoved {
            slot: enemy,
            kind: RegionKind::Secondary,
        }));

        manager.advance(DT, &world(&[(PLAYER, 0.0)]));
        assert!(!manager.is_engaged());
    }

    #[test]
    fn test_gone_targets_are_purged_on_advance() {
        let (mut manager, _, enemy) = duel();
        manager.advance(DT, &world(&[(PLAYER, 0.0), (ENEMY, 8.0)]));

        manager.advance(DT, &world(&[(PLAYER, 0.0)]));
        assert!(manager.region(enemy).is_none());
        assert_eq!(manager.region_count(), 1);
        assert_eq!(manager.active_region_count(), 0);
    }

    #[test]
    fn test_gone_pending_target_never_gets_a_region() {
        let config = CameraConfig {
            max_concurrent_regions: 2,
            ..config()
        };
        let mut manager = CameraManager::new(config).unwrap();
        manager.on_target_spawned(PLAYER, true).unwrap();
        let freed = manager.on_target_spawned(ENEMY, false).unwrap();
        let queued = TargetId(3);
        assert!(manager.on_target_spawned(queued, false).is_err());
        manager.drain_events();

        manager.advance(DT, &world(&[(PLAYER, 0.0)]));
        assert_eq!(manager.pending_targets().count(), 0);
        assert_eq!(manager.owner_of(queued), None);
        assert!(manager.region(freed).is_none());
        let events = manager.drain_events();
        assert_eq!(count(&events, |e| matches!(e, CameraEvent::RegionCreated { .. })), 0);

        // The freed slot is still available to live targets.
        assert_eq!(manager.on_target_spawned(TargetId(4), false), Ok(freed));
    }

    #[test]
    fn test_primary_loss_returns_merged_entities() {
        let (mut manager, primary, enemy) = duel();
        manager.advance(DT, &world(&[(PLAYER, 0.0), (ENEMY, 1.0)]));
        assert_eq!(manager.region_holding_primary(), Some(primary));

        manager.on_target_destroyed(PLAYER).unwrap();
        assert!(manager.primary_slot().is_none());
        assert_eq!(manager.owner_of(ENEMY), Some(enemy));
        assert_eq!(manager.region(enemy).unwrap().targets(), &[ENEMY]);
        assert_eq!(manager.region(enemy).unwrap().engagement(), EngagementState::Disabled);

        // Without a player nothing can engage.
        manager.advance(DT, &world(&[(ENEMY, 1.0)]));
        assert!(!manager.is_engaged());
    }

    #[test]
    fn test_active_regions_partition_in_slot_order() {
        let mut manager = CameraManager::new(config()).unwrap();
        manager.on_target_spawned(PLAYER, true).unwrap();
        let ids = [TargetId(10), TargetId(11), TargetId(12)];
        let slots: Vec<SlotId> = ids
            .iter()
            .map(|id| manager.on_target_spawned(*id, false).unwrap())
            .collect();

        let provider = world(&[(PLAYER, 0.0), (ids[0], 6.0), (ids[1], -7.0), (ids[2], 8.0)]);
        manager.advance(DT, &provider);

        assert_eq!(manager.active_region_count(), 3);
        assert_eq!(manager.active_index_of(slots[1]), Some(1));
        let rects: Vec<NormRect> = slots
            .iter()
            .map(|s| manager.region(*s).unwrap().rect())
            .collect();
        assert!(rects[0].right() <= rects[1].x);
        assert!(rects[1].right() <= rects[2].x);

        let zone = manager.config().engagement_zone;
        let separator = manager.config().separator_normalized();
        let total: f32 = rects.iter().map(|r| r.width).sum();
        assert!((total + 2.0 * separator - zone.width).abs() < 1e-5);

        // Disengaging the middle region gives the other two the whole zone.
        let provider = world(&[(PLAYER, 0.0), (ids[0], 6.0), (ids[1], -40.0), (ids[2], 8.0)]);
        manager.advance(DT, &provider);
        assert_eq!(manager.active_index_of(slots[2]), Some(1));
        assert!((manager.region(slots[0]).unwrap().rect().x - zone.x).abs() < 1e-6);
        assert!((manager.region(slots[2]).unwrap().rect().right() - zone.right()).abs() < 1e-5);
    }

    #[test]
    fn test_moving_engagement_zone_repartitions() {
        let (mut manager, _, enemy) = duel();
        manager.advance(DT, &world(&[(PLAYER, 0.0), (ENEMY, 8.0)]));

        let zone = NormRect::new(0.1, 0.1, 0.5, 0.5);
        manager.set_engagement_zone(zone).unwrap();
        manager.advance(DT, &world(&[(PLAYER, 0.0), (ENEMY, 8.0)]));
        assert_eq!(manager.region(enemy).unwrap().rect(), zone);

        assert!(
            manager
                .set_engagement_zone(NormRect::new(0.9, 0.0, 0.5, 0.5))
                .is_err()
        );
    }

    #[test]
    fn test_zone_too_narrow_for_separators_is_rejected() {
        let (mut manager, _, enemy) = duel();
        manager.advance(DT, &world(&[(PLAYER, 0.0), (ENEMY, 8.0)]));
        let before = manager.region(enemy).unwrap().rect();

        assert!(matches!(
            manager.set_engagement_zone(NormRect::new(0.5, 0.5, 0.01, 0.2)),
            Err(ConfigError::NotPositive { .. })
        ));
        manager.advance(DT, &world(&[(PLAYER, 0.0), (ENEMY, 8.0)]));

        let zone = manager.config().engagement_zone;
        let rect = manager.region(enemy).unwrap().rect();
        assert_eq!(rect, before);
        assert!(rect.width > 0.0);
        assert!(rect.right() <= zone.right() + 1e-6);
    }

    #[test]
    fn test_radar_follows_player_and_refuses_shake() {
        let config = CameraConfig {
            radar: Some(crate::config::RadarConfig::default()),
            ..config()
        };
        let mut manager = CameraManager::new(config).unwrap();
        let primary = manager.on_target_spawned(PLAYER, true).unwrap();
        let radar = manager.radar_slot().unwrap();
        assert_ne!(primary, radar);
        assert_eq!(manager.region_count(), 2);

        manager.advance(DT, &world(&[(PLAYER, 3.0)]));
        let view = manager.region(radar).unwrap().view();
        assert_eq!(view.kind, RegionKind::Radar);
        assert!(view.enabled);
        assert!(view.focus.x > 3.0);

        assert_eq!(
            manager.shake(radar, 1.0, 1.0),
            Err(RegionError::ShakeUnsupported(radar))
        );
        assert_eq!(
            manager.shake(SlotId(5), 1.0, 1.0),
            Err(RegionError::NoSuchRegion(SlotId(5)))
        );

        manager.on_target_destroyed(PLAYER).unwrap();
        assert_eq!(manager.region_count(), 0);
        assert!(manager.radar_slot().is_none());
    }

    #[test]
    fn test_shake_offsets_view_then_settles() {
        let mut manager = CameraManager::new(config()).unwrap();
        let primary = manager.on_target_spawned(PLAYER, true).unwrap();
        let provider = world(&[(PLAYER, 0.0)]);
        manager.advance(DT, &provider);

        manager.shake(primary, 1.0, 1.0).unwrap();
        manager.advance(DT, &provider);
        let region = manager.region(primary).unwrap();
        assert!(((region.view().focus - region.focus()).length() - 1.0).abs() < 1e-4);

        manager.advance(1.0, &provider);
        manager.advance(DT, &provider);
        let region = manager.region(primary).unwrap();
        assert_eq!(region.view().focus, region.focus());
    }

    #[test]
    fn test_shake_disabled_globally() {
        let mut config = config();
        config.shake.enabled = false;
        let mut manager = CameraManager::new(config).unwrap();
        let primary = manager.on_target_spawned(PLAYER, true).unwrap();
        let provider = world(&[(PLAYER, 0.0)]);

        assert!(manager.shake(primary, 1.0, 1.0).is_ok());
        manager.advance(DT, &provider);
        let region = manager.region(primary).unwrap();
        assert_eq!(region.view().focus, region.focus());
    }

    #[test]
    fn test_offscreen_indicator_for_distant_enemy() {
        let (mut manager, _, _) = duel();
        let provider = world(&[(PLAYER, 0.0), (ENEMY, 500.0)]);
        manager.advance(DT, &provider);

        let result = manager.offscreen_indicator(ENEMY, &provider, 0.5).unwrap();
        assert!(result.direction.x > 0.9);
        assert!(manager.offscreen_indicator(PLAYER, &provider, 0.5).is_none());
    }

    #[test]
    fn test_clear_removes_everything() {
        let (mut manager, _, _) = duel();
        manager.advance(DT, &world(&[(PLAYER, 0.0), (ENEMY, 8.0)]));
        manager.drain_events();

        manager.clear();
        assert_eq!(manager.region_count(), 0);
        assert_eq!(manager.owner_of(PLAYER), None);
        let events = manager.drain_events();
        assert_eq!(count(&events, |e| matches!(e, CameraEvent::RegionRemoved { .. })), 2);
        assert!(events.contains(&CameraEvent::EngagementCleared));
    }
}
