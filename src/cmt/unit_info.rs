//! Per-unit state collected while a unit is type checked.
//!
//! The type checker records partial tree fragments (when checking stops
//! before a complete tree exists) and value-to-value dependency edges. Both
//! are flushed into the annotation file when the unit is persisted.

use super::cmt_file::{BinaryAnnots, BinaryPart};
use crate::types::ValueDescription;

/// A dependency edge: `(used, user)`.
pub type ValueDependency = (ValueDescription, ValueDescription);

/// What [`UnitInfo::take`] and [`UnitInfo::snapshot`] hand back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitSnapshot {
    /// Fragments in recording order.
    pub fragments: Vec<BinaryPart>,
    /// Dependency edges in recording order.
    pub value_deps: Vec<ValueDependency>,
}

/// Accumulator for one compilation unit.
///
/// Owned by the unit's [`CompilationContext`](crate::context::CompilationContext);
/// it is empty before a unit starts and after every persistence attempt.
#[derive(Debug, Default)]
pub struct UnitInfo {
    fragments: Vec<BinaryPart>,
    value_deps: Vec<ValueDependency>,
}

impl UnitInfo {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a partial fragment.
    pub fn record_fragment(&mut self, part: BinaryPart) {
        self.fragments.push(part);
    }

    /// Record that `user` depends on `used`.
    ///
    /// Edges between two descriptions declared at the same location are
    /// self-references and are dropped.
    pub fn record_value_dependency(&mut self, used: &ValueDescription, user: &ValueDescription) {
        if used.val_loc != user.val_loc {
            self.value_deps.push((used.clone(), user.clone()));
        }
    }

    /// Copy the current state without clearing it.
    pub fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            fragments: self.fragments.clone(),
            value_deps: self.value_deps.clone(),
        }
    }

    /// Move the state out, leaving the accumulator empty.
    pub fn take(&mut self) -> UnitSnapshot {
        UnitSnapshot {
            fragments: std::mem::take(&mut self.fragments),
            value_deps: std::mem::take(&mut self.value_deps),
        }
    }

    /// Discard everything recorded so far.
    pub fn reset(&mut self) {
        self.fragments.clear();
        self.value_deps.clear();
    }

    /// Fragments recorded so far.
    pub fn saved_fragments(&self) -> &[BinaryPart] {
        &self.fragments
    }

    /// Replace the recorded fragments, e.g. to roll back a failed attempt.
    pub fn set_saved_fragments(&mut self, fragments: Vec<BinaryPart>) {
        self.fragments = fragments;
    }

    /// Annotations for an implementation whose checking stopped early.
    pub fn partial_implementation(&self) -> BinaryAnnots {
        BinaryAnnots::PartialImplementation(self.fragments.clone())
    }

    /// Annotations for an interface whose checking stopped early.
    pub fn partial_interface(&self) -> BinaryAnnots {
        BinaryAnnots::PartialInterface(self.fragments.clone())
    }

    /// Number of dependency edges recorded.
    pub fn value_dependency_count(&self) -> usize {
        self.value_deps.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty() && self.value_deps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{Location, Position};
    use crate::types::{Env, TypeDesc, TypeExpr, ValueKind};
    use crate::types::typedtree::{Pattern, PatternDesc};

    fn value_at(line: i32) -> ValueDescription {
        let pos = Position::new("Foo.res", line, 0, line * 10);
        ValueDescription {
            val_type: TypeExpr::generic(TypeDesc::Tvar(None), line),
            val_kind: ValueKind::ValReg,
            val_loc: Location::from_positions(pos.clone(), pos),
            val_attributes: vec![],
        }
    }

    fn fragment() -> BinaryPart {
        BinaryPart::PartialPattern(Pattern::new(
            PatternDesc::Tpat_any,
            Location::none(),
            TypeExpr::generic(TypeDesc::Tvar(None), 0),
            Env::empty(),
        ))
    }

    #[test]
    fn test_self_edges_dropped() {
        let mut info = UnitInfo::new();
        let a = value_at(1);
        info.record_value_dependency(&a, &a.clone());
        assert!(info.is_empty());
    }

    #[test]
    fn test_edges_in_call_order() {
        let mut info = UnitInfo::new();
        let (a, b, c) = (value_at(1), value_at(2), value_at(3));
        info.record_value_dependency(&a, &b);
        info.record_value_dependency(&b, &c);

        let snap = info.snapshot();
        assert_eq!(snap.value_deps, vec![(a, b.clone()), (b, c)]);
        assert_eq!(info.value_dependency_count(), 2);
    }

    #[test]
    fn test_take_empties() {
        let mut info = UnitInfo::new();
        info.record_fragment(fragment());
        info.record_value_dependency(&value_at(1), &value_at(2));

        let taken = info.take();
        assert_eq!(taken.fragments.len(), 1);
        assert_eq!(taken.value_deps.len(), 1);
        assert!(info.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut info = UnitInfo::new();
        info.record_fragment(fragment());
        info.reset();
        assert!(info.is_empty());
        assert_eq!(info.take(), UnitSnapshot::default());
    }

    #[test]
    fn test_saved_fragments_restore() {
        let mut info = UnitInfo::new();
        info.record_fragment(fragment());
        let saved = info.saved_fragments().to_vec();

        info.record_fragment(fragment());
        assert_eq!(info.saved_fragments().len(), 2);

        info.set_saved_fragments(saved);
        assert_eq!(info.saved_fragments().len(), 1);
    }

    #[test]
    fn test_partial_annots_keep_order() {
        let mut info = UnitInfo::new();
        info.record_fragment(fragment());
        info.record_fragment(BinaryPart::PartialSignature(
            crate::types::typedtree::Signature {
                sig_items: vec![],
                sig_type: vec![],
                sig_final_env: Env::empty(),
            },
        ));

        match info.partial_implementation() {
            BinaryAnnots::PartialImplementation(parts) => {
                assert!(matches!(parts[0], BinaryPart::PartialPattern(_)));
                assert!(matches!(parts[1], BinaryPart::PartialSignature(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(info.partial_interface().is_interface());
        assert_eq!(info.saved_fragments().len(), 2);
    }
}
