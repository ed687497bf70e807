//! Lookup of zones by identifier string or numeric id.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::zonedb::ZoneInfo;

/// An index over a static set of zones.
///
/// The name map is built once at construction; lookups afterwards do
/// not allocate. Numeric-id lookup scans the registry, which is small
/// for any realistic deployment.
#[derive(Debug)]
pub struct ZoneRegistrar {
    zones: &'static [&'static ZoneInfo],
    by_name: HashMap<&'static str, &'static ZoneInfo>,
}

impl ZoneRegistrar {
    #[must_use]
    pub fn new(zones: &'static [&'static ZoneInfo]) -> Self {
        let by_name = zones.iter().map(|zone| (zone.name, *zone)).collect();
        Self { zones, by_name }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Look a zone up by its IANA identifier, e.g.
    /// `"America/Los_Angeles"`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&'static ZoneInfo> {
        self.by_name.get(name).copied()
    }

    /// Look a zone up by its stable numeric identifier.
    #[must_use]
    pub fn find_by_id(&self, zone_id: u32) -> Option<&'static ZoneInfo> {
        self.zones
            .iter()
            .find(|zone| zone.zone_id == zone_id)
            .copied()
    }

    /// All registered zone identifiers.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.zones.iter().map(|zone| zone.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ZoneRegistrar;
    use crate::zonedb::data::ZONE_REGISTRY;
    use crate::zonedb::zone_identifier;

    #[test]
    fn finds_by_name_and_id() {
        let registrar = ZoneRegistrar::new(&ZONE_REGISTRY);
        assert!(!registrar.is_empty());

        let la = registrar
            .find_by_name("America/Los_Angeles")
            .expect("registered zone");
        assert_eq!(la.zone_id, zone_identifier("America/Los_Angeles"));
        assert!(core::ptr::eq(
            registrar.find_by_id(la.zone_id).expect("registered id"),
            la
        ));

        assert!(registrar.find_by_name("Mars/Olympus_Mons").is_none());
        assert!(registrar.find_by_id(0).is_none());
    }
}
