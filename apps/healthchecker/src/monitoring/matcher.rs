use super::types::{ExpectedResponse, ObservedResponse};

/// Compare an expected response pattern with what a probe observed.
///
/// A status code of 0 matches any code. The header constraint only applies
/// when the captured header has the same name as the expected one, which
/// is always the case for responses produced by a `Checker` asked to
/// capture `expected.header.key`. A pattern without constraints matches
/// everything.
pub fn responses_match(expected: &ExpectedResponse, observed: &ObservedResponse) -> bool {
    let mut matched = true;

    if expected.code != 0 {
        matched = expected.code == observed.code;
    }

    if expected.header.key == observed.header.key {
        matched = matched && expected.header.value == observed.header.value;
    }

    matched
}
