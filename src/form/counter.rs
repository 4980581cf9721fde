//! Counter widgets.
//!
//! A counter is a display input the scout can edit or bump, paired with a
//! hidden shadow input that carries the value into the submitted payload.
//! Every operation writes the same value to both nodes. Invalid input is
//! never reported: it is parsed leniently and clamped.

use super::document::FormDocument;
use std::collections::HashMap;
use thiserror::Error;

/// Upper bound for the leveled coral counters (L2-L4).
pub const LEVELED_MAX: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoralLevel {
    L1,
    L2,
    L3,
    L4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgaeLocation {
    FloorHole,
    Barge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutoKind {
    Coral,
    Algae,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterId {
    Coral(CoralLevel),
    CoralDropped,
    Algae(AlgaeLocation),
    Auto(AutoKind),
}

impl CounterId {
    pub const ALL: [CounterId; 9] = [
        CounterId::Auto(AutoKind::Coral),
        CounterId::Auto(AutoKind::Algae),
        CounterId::Coral(CoralLevel::L1),
        CounterId::Coral(CoralLevel::L2),
        CounterId::Coral(CoralLevel::L3),
        CounterId::Coral(CoralLevel::L4),
        CounterId::CoralDropped,
        CounterId::Algae(AlgaeLocation::FloorHole),
        CounterId::Algae(AlgaeLocation::Barge),
    ];

    /// Counters cleared by the coral reset.
    pub const CORAL: [CounterId; 5] = [
        CounterId::Coral(CoralLevel::L1),
        CounterId::Coral(CoralLevel::L2),
        CounterId::Coral(CoralLevel::L3),
        CounterId::Coral(CoralLevel::L4),
        CounterId::CoralDropped,
    ];

    /// Counters cleared by the algae reset.
    pub const ALGAE: [CounterId; 2] = [
        CounterId::Algae(AlgaeLocation::FloorHole),
        CounterId::Algae(AlgaeLocation::Barge),
    ];

    pub fn display_id(self) -> &'static str {
        match self {
            CounterId::Coral(CoralLevel::L1) => "coralL1Count",
            CounterId::Coral(CoralLevel::L2) => "coralL2Count",
            CounterId::Coral(CoralLevel::L3) => "coralL3Count",
            CounterId::Coral(CoralLevel::L4) => "coralL4Count",
            CounterId::CoralDropped => "coralDroppedCount",
            CounterId::Algae(AlgaeLocation::FloorHole) => "algaeFloorHoleCount",
            CounterId::Algae(AlgaeLocation::Barge) => "algaeBargeCount",
            CounterId::Auto(AutoKind::Coral) => "autoCoral",
            CounterId::Auto(AutoKind::Algae) => "autoAlgae",
        }
    }

    /// Auto-period inputs are a single node and have no shadow.
    pub fn shadow_id(self) -> Option<&'static str> {
        match self {
            CounterId::Coral(CoralLevel::L1) => Some("coralL1Input"),
            CounterId::Coral(CoralLevel::L2) => Some("coralL2Input"),
            CounterId::Coral(CoralLevel::L3) => Some("coralL3Input"),
            CounterId::Coral(CoralLevel::L4) => Some("coralL4Input"),
            CounterId::CoralDropped => Some("coralDroppedInput"),
            CounterId::Algae(AlgaeLocation::FloorHole) => Some("algaeFloorHoleInput"),
            CounterId::Algae(AlgaeLocation::Barge) => Some("algaeBargeInput"),
            CounterId::Auto(_) => None,
        }
    }

    /// L1 is exempt from the cap; only L2-L4 are leveled.
    pub fn upper_bound(self) -> Option<u32> {
        match self {
            CounterId::Coral(CoralLevel::L2 | CoralLevel::L3 | CoralLevel::L4) => Some(LEVELED_MAX),
            _ => None,
        }
    }

    pub fn clamp(self, value: i64) -> u32 {
        let upper = self.upper_bound().unwrap_or(u32::MAX);
        value.clamp(0, i64::from(upper)) as u32
    }
}

/// Parse the leading integer of `text` the way a lenient number field does:
/// optional whitespace and sign, then digits; anything after is ignored.
/// Returns `None` when no digit leads the text.
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    seen.then_some(if negative { -value } else { value })
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("counter {counter:?} has no element with id '{id}'")]
    MissingElement { counter: CounterId, id: &'static str },
}

#[derive(Debug, Clone, Copy)]
struct CounterBinding {
    display: usize,
    shadow: Option<usize>,
}

/// Typed mapping from counter to the document nodes it drives, validated
/// once when a page is built.
#[derive(Debug, Clone)]
pub struct CounterBindings {
    bindings: HashMap<CounterId, CounterBinding>,
}

impl CounterBindings {
    pub fn bind(doc: &FormDocument) -> Result<Self, BindError> {
        let mut bindings = HashMap::with_capacity(CounterId::ALL.len());
        for counter in CounterId::ALL {
            let display_id = counter.display_id();
            let display = doc.index_of(display_id).ok_or(BindError::MissingElement {
                counter,
                id: display_id,
            })?;
            let shadow = match counter.shadow_id() {
                Some(id) => Some(
                    doc.index_of(id)
                        .ok_or(BindError::MissingElement { counter, id })?,
                ),
                None => None,
            };
            bindings.insert(counter, CounterBinding { display, shadow });
        }
        Ok(Self { bindings })
    }

    /// The counter whose display node sits at `index`, if any.
    pub fn counter_at(&self, index: usize) -> Option<CounterId> {
        self.bindings
            .iter()
            .find(|(_, b)| b.display == index)
            .map(|(id, _)| *id)
    }

    fn read(&self, doc: &FormDocument, binding: CounterBinding) -> Option<i64> {
        doc.element(binding.display)
            .and_then(|el| parse_int_prefix(&el.value))
    }

    fn write(&self, doc: &mut FormDocument, binding: CounterBinding, value: u32) {
        let text = value.to_string();
        if let Some(el) = doc.element_mut(binding.display) {
            el.value = text.clone();
        }
        if let Some(el) = binding.shadow.and_then(|i| doc.element_mut(i)) {
            el.value = text;
        }
    }

    /// Current value as displayed, after lenient parsing and clamping.
    pub fn value(&self, doc: &FormDocument, counter: CounterId) -> u32 {
        self.bindings
            .get(&counter)
            .map(|b| counter.clamp(self.read(doc, *b).unwrap_or(0)))
            .unwrap_or(0)
    }

    pub fn increment(&self, doc: &mut FormDocument, counter: CounterId) -> u32 {
        let Some(binding) = self.bindings.get(&counter).copied() else {
            return 0;
        };
        let current = counter.clamp(self.read(doc, binding).unwrap_or(0));
        let next = match counter.upper_bound() {
            Some(max) if current >= max => current,
            _ => current.saturating_add(1),
        };
        self.write(doc, binding, next);
        next
    }

    pub fn decrement(&self, doc: &mut FormDocument, counter: CounterId) -> u32 {
        let Some(binding) = self.bindings.get(&counter).copied() else {
            return 0;
        };
        let current = counter.clamp(self.read(doc, binding).unwrap_or(0));
        let next = current.saturating_sub(1);
        self.write(doc, binding, next);
        next
    }

    /// Commit a manual edit: reparse the display, coerce garbage to 0, clamp,
    /// and re-sync both nodes.
    pub fn normalize(&self, doc: &mut FormDocument, counter: CounterId) -> u32 {
        let Some(binding) = self.bindings.get(&counter).copied() else {
            return 0;
        };
        let value = counter.clamp(self.read(doc, binding).unwrap_or(0));
        self.write(doc, binding, value);
        value
    }

    pub fn reset(&self, doc: &mut FormDocument, counters: &[CounterId]) {
        for counter in counters {
            if let Some(binding) = self.bindings.get(counter).copied() {
                self.write(doc, binding, 0);
            }
        }
    }
}
