use crate::error::SmatchError;
use serde::{Deserialize, Serialize};

/// Which triple kinds take part in matching and in the triple totals.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripleSelection {
    /// Instance, attribute and relation triples
    All,

    JustInstance,

    JustAttribute,

    JustRelation,
}

impl Default for TripleSelection {
    fn default() -> Self {
        TripleSelection::All
    }
}

impl TripleSelection {
    /// Combines the three "just-X" switches. Setting more than one is a usage error.
    pub fn from_flags(
        just_instance: bool,
        just_attribute: bool,
        just_relation: bool,
    ) -> Result<TripleSelection, SmatchError> {
        match (just_instance, just_attribute, just_relation) {
            (false, false, false) => Ok(TripleSelection::All),
            (true, false, false) => Ok(TripleSelection::JustInstance),
            (false, true, false) => Ok(TripleSelection::JustAttribute),
            (false, false, true) => Ok(TripleSelection::JustRelation),
            _ => Err(SmatchError::ConflictingSelection),
        }
    }

    pub fn kinds(self) -> TripleKinds {
        match self {
            TripleSelection::All => TripleKinds::all(),
            TripleSelection::JustInstance => TripleKinds {
                instance: true,
                attribute: false,
                relation: false,
            },
            TripleSelection::JustAttribute => TripleKinds {
                instance: false,
                attribute: true,
                relation: false,
            },
            TripleSelection::JustRelation => TripleKinds {
                instance: false,
                attribute: false,
                relation: true,
            },
        }
    }
}

/// The triple kinds the candidate pool is built from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TripleKinds {
    pub instance: bool,
    pub attribute: bool,
    pub relation: bool,
}

impl TripleKinds {
    pub fn all() -> TripleKinds {
        TripleKinds {
            instance: true,
            attribute: true,
            relation: true,
        }
    }
}

impl Default for TripleKinds {
    fn default() -> Self {
        TripleKinds::all()
    }
}

/// Scorer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmatchConfig {
    /// Number of random restarts after the first, smart-initialized round.
    pub restarts: usize,

    pub selection: TripleSelection,

    /// Digits after the decimal point in formatted scores.
    pub significant: usize,

    /// Accumulate a single corpus-level score instead of emitting one score per pair.
    pub document_level: bool,

    /// Also output precision and recall, not only the F-score.
    pub precision_recall: bool,
}

impl Default for SmatchConfig {
    fn default() -> Self {
        SmatchConfig {
            restarts: 4,
            selection: TripleSelection::All,
            significant: 4,
            document_level: true,
            precision_recall: false,
        }
    }
}

impl SmatchConfig {
    pub fn new() -> SmatchConfig {
        SmatchConfig::default()
    }

    pub fn restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    pub fn selection(mut self, selection: TripleSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the selection from the three "just-X" switches.
    pub fn just(
        self,
        just_instance: bool,
        just_attribute: bool,
        just_relation: bool,
    ) -> Result<Self, SmatchError> {
        Ok(self.selection(TripleSelection::from_flags(
            just_instance,
            just_attribute,
            just_relation,
        )?))
    }

    pub fn significant(mut self, significant: usize) -> Self {
        self.significant = significant;
        self
    }

    pub fn document_level(mut self, document_level: bool) -> Self {
        self.document_level = document_level;
        self
    }

    pub fn precision_recall(mut self, precision_recall: bool) -> Self {
        self.precision_recall = precision_recall;
        self
    }

    /// Number of hill-climbing rounds per graph pair.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.restarts + 1
    }
}
