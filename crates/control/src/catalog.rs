//! Track catalog — the fixed, build-time list of playable tracks.
//!
//! Each track pairs a storage path with the display color the LED announces
//! when the track starts. The catalog never changes at runtime; what *does*
//! vary is which of the files actually exist on the removable medium, which
//! is why selection goes through [`Catalog::find_present`].

use platform::{Rgb, Storage};

/// Number of tracks on the appliance.
pub const TRACK_COUNT: usize = 9;

/// Index into the catalog, always in `0..TRACK_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackId(u8);

impl TrackId {
    /// The first track; where the box starts after power-on.
    pub const FIRST: TrackId = TrackId(0);

    /// Create a `TrackId` if `index` is within the catalog.
    pub fn new(index: u8) -> Option<Self> {
        (usize::from(index) < TRACK_COUNT).then_some(Self(index))
    }

    /// Position in the catalog.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// The following track, wrapping back to the first after the last.
    #[must_use]
    pub fn next(self) -> Self {
        // TRACK_COUNT fits in u8 and self.0 < TRACK_COUNT.
        #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
        Self((self.0 + 1) % TRACK_COUNT as u8)
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    /// Path on the removable medium.
    pub path: &'static str,
    /// Color announced on the LED when this track starts.
    pub color: Rgb,
}

/// The fixed track list.
#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: [Track; TRACK_COUNT],
}

impl Catalog {
    /// The shipped nine-track catalog.
    pub const fn builtin() -> Self {
        Self {
            tracks: [
                Track { path: "/music/01.mp3", color: Rgb::new(255, 0, 0) },
                Track { path: "/music/02.mp3", color: Rgb::new(255, 96, 0) },
                Track { path: "/music/03.mp3", color: Rgb::new(255, 220, 0) },
                Track { path: "/music/04.mp3", color: Rgb::new(0, 255, 0) },
                Track { path: "/music/05.mp3", color: Rgb::new(0, 255, 200) },
                Track { path: "/music/06.mp3", color: Rgb::new(0, 80, 255) },
                Track { path: "/music/07.mp3", color: Rgb::new(130, 0, 255) },
                Track { path: "/music/08.mp3", color: Rgb::new(255, 0, 180) },
                Track { path: "/music/09.mp3", color: Rgb::new(255, 255, 255) },
            ],
        }
    }

    /// Number of tracks.
    pub const fn len(&self) -> usize {
        TRACK_COUNT
    }

    /// The catalog is never empty.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Look up a track by id.
    pub fn track(&self, id: TrackId) -> &Track {
        // TrackId is constructed < TRACK_COUNT, so the lookup cannot miss.
        #[allow(clippy::indexing_slicing)]
        &self.tracks[id.index()]
    }

    /// Find the first present track at or after `start`, probing linearly
    /// modulo the catalog size for at most one full cycle.
    ///
    /// A storage error on one path is treated the same as an absent file —
    /// the probe moves on. Returns `None` when the whole catalog came up
    /// empty; the caller must not issue a play command in that case.
    pub fn find_present<S: Storage>(&self, storage: &mut S, start: TrackId) -> Option<TrackId> {
        let mut id = start;
        for _ in 0..TRACK_COUNT {
            match storage.exists(self.track(id).path) {
                Ok(true) => return Some(id),
                Ok(false) | Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("track {} missing, probing next", id.index());
                    id = id.next();
                }
            }
        }
        None
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use platform::mocks::MockStorage;

    #[test]
    fn track_id_wraps_after_last() {
        let last = TrackId::new(8).unwrap();
        assert_eq!(last.next(), TrackId::FIRST);
    }

    #[test]
    fn track_id_rejects_out_of_range() {
        assert!(TrackId::new(9).is_none());
        assert!(TrackId::new(u8::MAX).is_none());
    }

    #[test]
    fn builtin_catalog_paths_are_distinct() {
        let catalog = Catalog::builtin();
        for i in 0..TRACK_COUNT {
            for j in 0..i {
                let (a, b) = (
                    catalog.track(TrackId::new(i as u8).unwrap()),
                    catalog.track(TrackId::new(j as u8).unwrap()),
                );
                assert_ne!(a.path, b.path);
            }
        }
    }

    #[test]
    fn find_present_probes_in_order() {
        let catalog = Catalog::builtin();
        let mut storage = MockStorage::new();
        storage.add_present("/music/06.mp3"); // only track index 5 exists

        let found = catalog.find_present(&mut storage, TrackId::FIRST);
        assert_eq!(found, Some(TrackId::new(5).unwrap()));

        let probes: Vec<&str> = storage.probes().iter().map(|p| p.as_str()).collect();
        assert_eq!(
            probes,
            [
                "/music/01.mp3",
                "/music/02.mp3",
                "/music/03.mp3",
                "/music/04.mp3",
                "/music/05.mp3",
                "/music/06.mp3",
            ]
        );
    }

    #[test]
    fn find_present_wraps_around_the_end() {
        let catalog = Catalog::builtin();
        let mut storage = MockStorage::new();
        storage.add_present("/music/02.mp3");

        let start = TrackId::new(7).unwrap();
        let found = catalog.find_present(&mut storage, start);
        assert_eq!(found, Some(TrackId::new(1).unwrap()));
    }

    #[test]
    fn find_present_empty_catalog_gives_none_after_full_cycle() {
        let catalog = Catalog::builtin();
        let mut storage = MockStorage::new();

        assert_eq!(catalog.find_present(&mut storage, TrackId::FIRST), None);
        assert_eq!(storage.probes().len(), TRACK_COUNT);
    }
}
