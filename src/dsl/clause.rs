//! Clause tree: the JSON shape a filter specification arrives in.
//! Deserialized straight off the wire with `serde`; `compile.rs` is where
//! these turn into a `Chain`/`Scorer`.

use serde::Deserialize;

/// Root document: one JSON filter spec file.
#[derive(Debug, Clone, Deserialize)]
pub struct ClauseFile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub deck: String,
    pub stake: String,
    #[serde(default)]
    pub must: Vec<Clause>,
    #[serde(default)]
    pub should: Vec<Clause>,
    #[serde(default, rename = "mustNot")]
    pub must_not: Vec<Clause>,
}

/// A clause's ante list plus whether the JSON actually set it, so a
/// composite's helper `antes` only fills in for children that left theirs
/// unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnteSpec {
    pub antes: Vec<u8>,
    pub explicitly_set: bool,
}

impl Default for AnteSpec {
    fn default() -> Self {
        AnteSpec { antes: (1..=8).collect(), explicitly_set: false }
    }
}

impl AnteSpec {
    /// Fold a composite parent's helper ante list into a child that didn't
    /// set its own; a child's explicit antes always win over the helper.
    pub fn inherit(self, helper: &AnteSpec) -> AnteSpec {
        if self.explicitly_set || !helper.explicitly_set {
            self
        } else {
            helper.clone()
        }
    }
}

/// Slot ranges a clause scans.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sources {
    #[serde(default, rename = "shopSlots")]
    pub shop_slots: Option<Vec<u32>>,
    #[serde(default, rename = "packSlots")]
    pub pack_slots: Option<Vec<u32>>,
}

fn default_min() -> u32 {
    1
}

/// One clause: atomic when `type` names an item category, a composite when
/// it's `"And"`/`"Or"` (in which case `clauses` holds the children and the
/// other fields are ignored).
#[derive(Debug, Clone, Deserialize)]
pub struct Clause {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub clauses: Option<Vec<Clause>>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub values: Option<Vec<String>>,
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub antes: Option<Vec<u8>>,
    #[serde(default)]
    pub sources: Option<Sources>,
    #[serde(default, rename = "minShopSlot")]
    pub min_shop_slot: Option<u32>,
    #[serde(default, rename = "maxShopSlot")]
    pub max_shop_slot: Option<u32>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub suit: Option<String>,
    #[serde(default)]
    pub seal: Option<String>,
    #[serde(default)]
    pub enhancement: Option<String>,
    #[serde(default = "default_min")]
    pub min: u32,
    #[serde(default)]
    pub score: Option<i64>,
}

impl Clause {
    pub fn is_composite(&self) -> bool {
        matches!(self.kind.as_str(), "And" | "Or")
    }

    /// This clause's own ante list, recording whether `antes` was present.
    pub fn ante_spec(&self) -> AnteSpec {
        match &self.antes {
            Some(antes) => AnteSpec { antes: antes.clone(), explicitly_set: true },
            None => AnteSpec::default(),
        }
    }

    /// Every target name this clause matches against: `value` and/or
    /// `values`, combined.
    pub fn target_names(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(v) = &self.value {
            out.push(v.clone());
        }
        if let Some(vs) = &self.values {
            out.extend(vs.iter().cloned());
        }
        out
    }

    /// Whether this clause's target list is the `"Any"` wildcard, matching
    /// the whole category regardless of name.
    pub fn is_wildcard(&self) -> bool {
        self.target_names().iter().any(|n| n.eq_ignore_ascii_case("any"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_child_antes_survive_helper_inheritance() {
        let child = AnteSpec { antes: vec![2], explicitly_set: true };
        let helper = AnteSpec { antes: vec![1, 2], explicitly_set: true };
        assert_eq!(child.inherit(&helper).antes, vec![2]);
    }

    #[test]
    fn unset_child_antes_adopt_the_helper() {
        let child = AnteSpec::default();
        let helper = AnteSpec { antes: vec![1, 2], explicitly_set: true };
        assert_eq!(child.inherit(&helper).antes, vec![1, 2]);
    }

    #[test]
    fn unset_helper_never_overrides_anything() {
        let child = AnteSpec::default();
        let helper = AnteSpec::default();
        assert_eq!(child.clone().inherit(&helper), child);
    }

    #[test]
    fn parses_a_minimal_clause_file() {
        let json = r#"{
            "name": "test",
            "deck": "Red",
            "stake": "White",
            "must": [{ "type": "Joker", "value": "Blueprint", "antes": [2], "sources": { "shopSlots": [7] } }]
        }"#;
        let file: ClauseFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.must.len(), 1);
        assert_eq!(file.must[0].antes, Some(vec![2]));
    }

    #[test]
    fn wildcard_value_is_recognised_case_insensitively() {
        let clause = Clause {
            kind: "Joker".into(),
            clauses: None,
            value: Some("ANY".into()),
            values: None,
            edition: None,
            antes: None,
            sources: None,
            min_shop_slot: None,
            max_shop_slot: None,
            rank: None,
            suit: None,
            seal: None,
            enhancement: None,
            min: 1,
            score: None,
        };
        assert!(clause.is_wildcard());
    }
}
