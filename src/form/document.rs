//! The scouting form document.
//!
//! Holds every form control in document order, keyed by its element id. The
//! layout is fixed: element ids and field names form the contract with the
//! submission endpoint (`args[...]` names) and with the counter bindings
//! (`coral{Level}Count` / `coral{Level}Input`, ...).

/// What kind of control an element is, plus any state that is not a plain
/// string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Text,
    Number,
    /// Shadow input that carries a counter value into the payload.
    Hidden,
    Checkbox { checked: bool },
    Radio {
        options: &'static [&'static str],
        selected: Option<usize>,
    },
    TextArea,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub id: &'static str,
    /// Field name used in the submitted payload. Nameless elements are never
    /// serialized.
    pub name: Option<&'static str>,
    pub label: &'static str,
    pub kind: ElementKind,
    pub value: String,
    pub required: bool,
    default_value: &'static str,
}

impl Element {
    fn new(id: &'static str, name: Option<&'static str>, label: &'static str, kind: ElementKind) -> Self {
        Self {
            id,
            name,
            label,
            kind,
            value: String::new(),
            required: false,
            default_value: "",
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn with_default(mut self, value: &'static str) -> Self {
        self.default_value = value;
        self.value = value.to_string();
        self
    }

    /// Whether a typed character may be inserted into this element.
    ///
    /// Numeric inputs take ASCII digits only, so no sign, exponent or
    /// decimal point ever reaches them.
    pub fn accepts_char(&self, c: char) -> bool {
        match self.kind {
            ElementKind::Number => c.is_ascii_digit(),
            ElementKind::Text | ElementKind::TextArea => !c.is_control(),
            _ => false,
        }
    }

    pub fn is_editable_text(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::Text | ElementKind::Number | ElementKind::TextArea
        )
    }

    pub fn is_focusable(&self) -> bool {
        !matches!(self.kind, ElementKind::Hidden)
    }

    /// The value this element contributes to the payload, if any.
    fn submitted_value(&self) -> Option<String> {
        match &self.kind {
            ElementKind::Checkbox { checked } => checked.then(|| "on".to_string()),
            ElementKind::Radio { options, selected } => {
                selected.and_then(|i| options.get(i)).map(|s| s.to_string())
            }
            _ => Some(self.value.clone()),
        }
    }

    fn is_filled(&self) -> bool {
        match &self.kind {
            ElementKind::Checkbox { checked } => *checked,
            ElementKind::Radio { selected, .. } => selected.is_some(),
            _ => !self.value.trim().is_empty(),
        }
    }

    fn reset(&mut self) {
        self.value = self.default_value.to_string();
        match &mut self.kind {
            ElementKind::Checkbox { checked } => *checked = false,
            ElementKind::Radio { selected, .. } => *selected = None,
            _ => {}
        }
    }
}

pub const CLIMB_OPTIONS: &[&str] = &["Shallow", "Deep", "Park", "Not Attempted"];

/// Ordered name/value pairs captured at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    pairs: Vec<(String, String)>,
}

impl FormPayload {
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

/// All controls of the scouting form, in document order.
#[derive(Debug, Clone)]
pub struct FormDocument {
    elements: Vec<Element>,
}

impl FormDocument {
    #[cfg(test)]
    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// The match scouting form.
    pub fn scouting_form() -> Self {
        use ElementKind::*;

        let mut elements = vec![
            Element::new("scoutName", Some("args[name]"), "Name", Text).required(),
            Element::new("matchNumber", Some("args[match_number]"), "Match Number", Number)
                .required(),
            Element::new("teamNumber", Some("args[team_number]"), "Team Number", Number)
                .required(),
            Element::new("autoCoral", Some("args[auto_coral]"), "Auto Coral", Number)
                .with_default("0"),
            Element::new("autoAlgae", Some("args[auto_algae]"), "Auto Algae", Number)
                .with_default("0"),
            Element::new("autoLeave", Some("args[auto_leave]"), "Auto Leave", Checkbox { checked: false }),
            Element::new("algaeClear", Some("args[algae_clear]"), "Algae Clear", Checkbox { checked: false }),
        ];

        let coral = [
            ("coralL1Count", "coralL1Input", "args[l1_coral]", "Coral L1"),
            ("coralL2Count", "coralL2Input", "args[l2_coral]", "Coral L2"),
            ("coralL3Count", "coralL3Input", "args[l3_coral]", "Coral L3"),
            ("coralL4Count", "coralL4Input", "args[l4_coral]", "Coral L4"),
            ("coralDroppedCount", "coralDroppedInput", "args[dropped_coral]", "Coral Dropped"),
            ("algaeFloorHoleCount", "algaeFloorHoleInput", "args[algae_floor_hole]", "Algae Floor Hole"),
            ("algaeBargeCount", "algaeBargeInput", "args[algae_barge]", "Algae Barge"),
        ];
        for (display, shadow, name, label) in coral {
            elements.push(Element::new(display, None, label, Number).with_default("0"));
            elements.push(Element::new(shadow, Some(name), label, Hidden).with_default("0"));
        }

        elements.push(
            Element::new(
                "climb",
                Some("args[climb]"),
                "Climb",
                Radio {
                    options: CLIMB_OPTIONS,
                    selected: None,
                },
            )
            .required(),
        );
        elements.push(Element::new("defenseBot", Some("args[defense_bot]"), "Defense Bot", Checkbox { checked: false }));
        elements.push(Element::new("notes", Some("args[notes]"), "Notes", TextArea));

        Self { elements }
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn element_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.elements.get_mut(index)
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.get(id).map(|e| e.value.as_str())
    }

    pub fn set_value(&mut self, id: &str, value: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                el.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Indices of the elements a user can move focus to.
    pub fn focusable(&self) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_focusable())
            .map(|(i, _)| i)
            .collect()
    }

    /// Capture every named field in document order.
    pub fn payload(&self) -> FormPayload {
        let pairs = self
            .elements
            .iter()
            .filter_map(|e| {
                let name = e.name?;
                e.submitted_value().map(|v| (name.to_string(), v))
            })
            .collect();
        FormPayload { pairs }
    }

    /// First required element without a value.
    pub fn first_missing_required(&self) -> Option<&Element> {
        self.elements.iter().find(|e| e.required && !e.is_filled())
    }

    /// Restore every control to its initial value.
    pub fn reset(&mut self) {
        for el in &mut self.elements {
            el.reset();
        }
    }
}
