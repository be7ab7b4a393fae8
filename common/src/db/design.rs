use crate::db::indices::ComponentId;
use crate::error::DesignError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One terminal of one component, unique across the design.
///
/// The document format writes these as `"id_pin"` strings, e.g. `"42_0"`
/// is pin 0 of component 42.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinRef {
    pub component: u32,
    pub pin: u8,
}

impl PinRef {
    pub fn new(component: u32, pin: u8) -> Self {
        Self { component, pin }
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.component, self.pin)
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid terminal reference '{0}' (expected 'component_pin')")]
pub struct ParsePinRefError(String);

impl FromStr for PinRef {
    type Err = ParsePinRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (comp, pin) = s
            .split_once('_')
            .ok_or_else(|| ParsePinRefError(s.to_string()))?;
        let component = comp
            .parse()
            .map_err(|_| ParsePinRefError(s.to_string()))?;
        let pin = pin.parse().map_err(|_| ParsePinRefError(s.to_string()))?;
        Ok(PinRef { component, pin })
    }
}

impl Serialize for PinRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PinRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A circuit element with 2 or 3 terminals. `connections[i]` holds the
/// remote terminals pin `i` is wired to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Component {
    pub id: u32,
    #[serde(default)]
    pub label: String,
    pub terminals: u8,
    #[serde(default)]
    pub connections: Vec<BTreeSet<PinRef>>,
}

impl Component {
    pub fn new(id: u32, label: impl Into<String>, terminals: u8) -> Self {
        Self {
            id,
            label: label.into(),
            terminals,
            connections: vec![BTreeSet::new(); terminals as usize],
        }
    }
}

/// An undirected routing requirement between two terminals, stored in
/// canonical `a < b` order so the derived net list is duplicate-free.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Net {
    pub a: PinRef,
    pub b: PinRef,
}

impl Net {
    pub fn new(x: PinRef, y: PinRef) -> Self {
        if x <= y {
            Net { a: x, b: y }
        } else {
            Net { a: y, b: x }
        }
    }
}

/// The component list handed to the core by the editor layer. Read-only
/// input: synthesis never mutates component identity.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Design {
    pub components: Vec<Component>,
}

impl Design {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Records the connection on both endpoints, the way the schematic
    /// editor's add-wire tool does.
    pub fn add_connection(&mut self, a: PinRef, b: PinRef) {
        for comp in &mut self.components {
            if comp.id == a.component {
                comp.connections[a.pin as usize].insert(b);
            }
            if comp.id == b.component {
                comp.connections[b.pin as usize].insert(a);
            }
        }
    }

    /// Maps user-facing component ids to dense indices (placement order).
    pub fn id_map(&self) -> HashMap<u32, ComponentId> {
        self.components
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, ComponentId::new(i)))
            .collect()
    }

    pub fn terminal_cells_needed(&self) -> usize {
        self.components.iter().map(|c| c.terminals as usize).sum()
    }

    /// Derives the routing requirements from every component's connection
    /// sets, collapsing each undirected pair to a single net.
    pub fn net_list(&self) -> Vec<Net> {
        let mut nets = BTreeSet::new();
        for comp in &self.components {
            for (pin, remotes) in comp.connections.iter().enumerate() {
                let local = PinRef::new(comp.id, pin as u8);
                for &remote in remotes {
                    if remote != local {
                        nets.insert(Net::new(local, remote));
                    }
                }
            }
        }
        nets.into_iter().collect()
    }

    /// Fail-fast input validation, run once before any search iteration.
    pub fn validate(&self, core: u32) -> Result<(), DesignError> {
        if core < 2 {
            return Err(DesignError::CoreTooSmall(core));
        }

        let mut terminals_by_id = HashMap::new();
        for comp in &self.components {
            if terminals_by_id.insert(comp.id, comp.terminals).is_some() {
                return Err(DesignError::DuplicateId(comp.id));
            }
            if !(2..=3).contains(&comp.terminals) {
                return Err(DesignError::BadTerminalCount {
                    id: comp.id,
                    terminals: comp.terminals,
                });
            }
            if comp.connections.len() != comp.terminals as usize {
                return Err(DesignError::ConnectionShape(comp.id));
            }
        }

        for comp in &self.components {
            for (pin, remotes) in comp.connections.iter().enumerate() {
                let local = PinRef::new(comp.id, pin as u8);
                for &remote in remotes {
                    if remote == local {
                        return Err(DesignError::SelfLoop(local.to_string()));
                    }
                    match terminals_by_id.get(&remote.component) {
                        Some(&t) if remote.pin < t => {}
                        _ => {
                            return Err(DesignError::DanglingTerminal(remote.to_string()));
                        }
                    }
                }
            }
        }

        // Each terminal may belong to at most one net; a shared terminal
        // would force two routed paths through the same cell.
        let mut in_use = HashSet::new();
        for net in self.net_list() {
            for pin in [net.a, net.b] {
                if !in_use.insert(pin) {
                    return Err(DesignError::SharedTerminal(pin.to_string()));
                }
            }
        }

        let needed = self.terminal_cells_needed();
        let capacity = (core as usize) * (core as usize);
        if needed > capacity {
            return Err(DesignError::DoesNotFit {
                needed,
                core,
                capacity,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_caps() -> Design {
        let mut design = Design::new();
        design.add_component(Component::new(0, "C1", 2));
        design.add_component(Component::new(1, "C2", 2));
        design.add_connection(PinRef::new(0, 0), PinRef::new(1, 1));
        design.add_connection(PinRef::new(0, 1), PinRef::new(1, 0));
        design
    }

    #[test]
    fn pin_ref_string_form() {
        let p = PinRef::new(42, 1);
        assert_eq!(p.to_string(), "42_1");
        assert_eq!("42_1".parse::<PinRef>().unwrap(), p);
        assert!("42".parse::<PinRef>().is_err());
        assert!("a_b".parse::<PinRef>().is_err());

        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"42_1\"");
        assert_eq!(serde_json::from_str::<PinRef>(&json).unwrap(), p);
    }

    #[test]
    fn net_list_collapses_undirected_duplicates() {
        let design = two_caps();
        // Both endpoints record each wire, but each pair appears once.
        let nets = design.net_list();
        assert_eq!(nets.len(), 2);
        assert_eq!(
            nets[0],
            Net::new(PinRef::new(0, 0), PinRef::new(1, 1))
        );
        assert_eq!(
            nets[1],
            Net::new(PinRef::new(0, 1), PinRef::new(1, 0))
        );
    }

    #[test]
    fn validate_accepts_well_formed() {
        assert_eq!(two_caps().validate(3), Ok(()));
    }

    #[test]
    fn validate_rejects_duplicate_id() {
        let mut design = two_caps();
        design.add_component(Component::new(0, "dup", 2));
        assert_eq!(design.validate(8), Err(DesignError::DuplicateId(0)));
    }

    #[test]
    fn validate_rejects_dangling_terminal() {
        let mut design = two_caps();
        design.components[0].connections[0].insert(PinRef::new(9, 0));
        assert_eq!(
            design.validate(8),
            Err(DesignError::DanglingTerminal("9_0".into()))
        );
    }

    #[test]
    fn validate_rejects_out_of_range_pin() {
        let mut design = two_caps();
        design.components[0].connections[0].insert(PinRef::new(1, 2));
        assert_eq!(
            design.validate(8),
            Err(DesignError::DanglingTerminal("1_2".into()))
        );
    }

    #[test]
    fn validate_rejects_self_loop() {
        let mut design = two_caps();
        design.components[1].connections[0].insert(PinRef::new(1, 0));
        assert_eq!(design.validate(8), Err(DesignError::SelfLoop("1_0".into())));
    }

    #[test]
    fn validate_rejects_shared_terminal() {
        // Pin 0_0 wired into two nets; routing both would overlap at its
        // cell, so this is rejected up front.
        let mut design = Design::new();
        design.add_component(Component::new(0, "C1", 2));
        design.add_component(Component::new(1, "C2", 2));
        design.add_connection(PinRef::new(0, 0), PinRef::new(1, 0));
        design.add_connection(PinRef::new(0, 0), PinRef::new(1, 1));
        assert_eq!(
            design.validate(8),
            Err(DesignError::SharedTerminal("0_0".into()))
        );
    }

    #[test]
    fn validate_rejects_oversized_design() {
        let mut design = Design::new();
        for id in 0..3 {
            design.add_component(Component::new(id, "", 2));
        }
        // 6 terminal cells cannot fit a 2x2 core.
        assert_eq!(
            design.validate(2),
            Err(DesignError::DoesNotFit {
                needed: 6,
                core: 2,
                capacity: 4
            })
        );
    }

    #[test]
    fn design_round_trips_through_json() {
        let design = two_caps();
        let json = serde_json::to_string(&design).unwrap();
        let back: Design = serde_json::from_str(&json).unwrap();
        assert_eq!(back.components.len(), 2);
        assert_eq!(back.net_list(), design.net_list());
    }
}
