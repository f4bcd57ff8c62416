//! Signature shape comparison between an overridden method and its override.
//!
//! Rules are checked in a fixed priority order and the first one that
//! applies decides the outcome. Only syntactic shape is compared: types are
//! matched structurally, never resolved or inferred.
//!
//! Two rules settle the whole comparison as compatible as soon as a single
//! parameter position passes them: an extra trailing parameter that has a
//! default, and a pair of equal scalar types. Positions after that are not
//! inspected, so a later mismatch in the same method goes unreported.

use crate::core::{MethodSignature, ParameterSignature};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::ControlFlow;

/// Outcome of comparing an ancestor method with a descendant override.
///
/// Variants are listed in rule priority order; the discriminant is the
/// stable numeric result code shown in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    Compatible = 0,
    ReferenceMismatch = 1,
    ReturnTypeMismatch = 2,
    FewerParameters = 3,
    ExtraParameterNoDefault = 4,
    ParameterReferenceMismatch = 5,
    ParameterNullabilityMismatch = 6,
    ParameterTypeMismatch = 7,
    DefaultValueDropped = 8,
}

impl DiscrepancyKind {
    pub const ALL: [DiscrepancyKind; 9] = [
        Self::Compatible,
        Self::ReferenceMismatch,
        Self::ReturnTypeMismatch,
        Self::FewerParameters,
        Self::ExtraParameterNoDefault,
        Self::ParameterReferenceMismatch,
        Self::ParameterNullabilityMismatch,
        Self::ParameterTypeMismatch,
        Self::DefaultValueDropped,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_compatible(self) -> bool {
        self == Self::Compatible
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Compatible => "signatures are compatible",
            Self::ReferenceMismatch => "return-by-reference differs",
            Self::ReturnTypeMismatch => "return type differs",
            Self::FewerParameters => "override declares fewer parameters",
            Self::ExtraParameterNoDefault => "extra parameter has no default value",
            Self::ParameterReferenceMismatch => "parameter pass-by-reference differs",
            Self::ParameterNullabilityMismatch => "parameter type declared on one side only",
            Self::ParameterTypeMismatch => "parameter type differs",
            Self::DefaultValueDropped => "override drops a parameter default value",
        }
    }
}

impl fmt::Display for DiscrepancyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.description())
    }
}

/// Classify how `descendant` differs from the `ancestor` method it overrides.
///
/// Pure and total: the same inputs always give the same answer, and a
/// method compared with itself is always [`DiscrepancyKind::Compatible`].
pub fn compare(ancestor: &MethodSignature, descendant: &MethodSignature) -> DiscrepancyKind {
    if ancestor.by_reference != descendant.by_reference {
        return DiscrepancyKind::ReferenceMismatch;
    }
    if ancestor.return_type != descendant.return_type {
        return DiscrepancyKind::ReturnTypeMismatch;
    }
    if descendant.parameters.len() < ancestor.parameters.len() {
        return DiscrepancyKind::FewerParameters;
    }

    for (position, theirs) in descendant.parameters.iter().enumerate() {
        let outcome = match ancestor.parameters.get(position) {
            Some(ours) => compare_parameters(ours, theirs),
            None if theirs.has_default => ControlFlow::Break(DiscrepancyKind::Compatible),
            None => ControlFlow::Break(DiscrepancyKind::ExtraParameterNoDefault),
        };
        if let ControlFlow::Break(kind) = outcome {
            return kind;
        }
    }

    DiscrepancyKind::Compatible
}

/// Check one positional parameter pair. `Continue` moves on to the next
/// position; `Break` settles the whole comparison.
fn compare_parameters(
    ours: &ParameterSignature,
    theirs: &ParameterSignature,
) -> ControlFlow<DiscrepancyKind> {
    if ours.by_reference != theirs.by_reference {
        return ControlFlow::Break(DiscrepancyKind::ParameterReferenceMismatch);
    }

    match (&ours.param_type, &theirs.param_type) {
        (Some(_), None) | (None, Some(_)) => {
            return ControlFlow::Break(DiscrepancyKind::ParameterNullabilityMismatch);
        }
        (Some(our_type), Some(their_type)) if our_type.is_scalar() || their_type.is_scalar() => {
            return ControlFlow::Break(if our_type == their_type {
                DiscrepancyKind::Compatible
            } else {
                DiscrepancyKind::ParameterTypeMismatch
            });
        }
        (Some(our_type), Some(their_type)) if our_type != their_type => {
            return ControlFlow::Break(DiscrepancyKind::ParameterTypeMismatch);
        }
        _ => {}
    }

    if ours.has_default && !theirs.has_default {
        return ControlFlow::Break(DiscrepancyKind::DefaultValueDropped);
    }

    ControlFlow::Continue(())
}
