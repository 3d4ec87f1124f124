//! Assertion helpers for results and access decisions

use crate::policy::{Decision, DecisionReason, PolicyError, ReferenceKind};
use std::fmt::Debug;

/// Assert that a Result is Ok and return the value
pub fn assert_ok<T, E: Debug>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("Expected Ok, got Err: {:?}", e),
    }
}

/// Assert that a Result is Err and return the error
pub fn assert_err<T: Debug, E>(result: Result<T, E>) -> E {
    match result {
        Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
        Err(e) => e,
    }
}

/// Assert that an evaluation granted access for `reason`
pub fn assert_allowed(result: Result<Decision, PolicyError>, reason: DecisionReason) {
    let decision = assert_ok(result);
    if decision != Decision::allow(reason) {
        panic!("Expected allowed ({}), got {}", reason, decision);
    }
}

/// Assert that an evaluation denied access for `reason`
pub fn assert_denied(result: Result<Decision, PolicyError>, reason: DecisionReason) {
    let decision = assert_ok(result);
    if decision != Decision::deny(reason) {
        panic!("Expected denied ({}), got {}", reason, decision);
    }
}

/// Assert that a check failed on a missing reference of the given kind
pub fn assert_unresolvable<T: Debug>(result: Result<T, PolicyError>, expected: ReferenceKind) {
    match assert_err(result) {
        PolicyError::UnresolvableReference { kind, .. } if kind == expected => {}
        other => panic!("Expected unresolvable {}, got {:?}", expected, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_ok() {
        let result: Result<i32, &str> = Ok(42);
        assert_eq!(assert_ok(result), 42);
    }

    #[test]
    #[should_panic(expected = "Expected Ok, got Err")]
    fn test_assert_ok_panics_on_err() {
        let result: Result<i32, &str> = Err("error");
        let _ = assert_ok(result);
    }

    #[test]
    #[should_panic(expected = "Expected Err, got Ok")]
    fn test_assert_err_panics_on_ok() {
        let result: Result<i32, &str> = Ok(42);
        let _ = assert_err(result);
    }

    #[test]
    fn test_assert_allowed() {
        assert_allowed(Ok(Decision::allow(DecisionReason::Author)), DecisionReason::Author);
    }

    #[test]
    #[should_panic(expected = "Expected allowed")]
    fn test_assert_allowed_panics_on_other_reason() {
        assert_allowed(
            Ok(Decision::allow(DecisionReason::StreamOwner)),
            DecisionReason::Author,
        );
    }

    #[test]
    #[should_panic(expected = "Expected denied")]
    fn test_assert_denied_panics_on_allow() {
        assert_denied(
            Ok(Decision::allow(DecisionReason::SpaceMember)),
            DecisionReason::SpaceMember,
        );
    }
}
