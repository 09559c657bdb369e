use crate::backend::RecordedCommand;
use crate::scene::SceneEvent;

/// Compares recorded collaborator commands against the expected sequence.
///
/// Returns a list of human-readable failure descriptions. An empty list means the
/// sequences are identical.
pub fn check_commands(actual: &[RecordedCommand], expected: &[RecordedCommand]) -> Vec<String> {
    check_sequence("command", actual, expected)
}

/// Compares the push/pop events of a scene run against the expected sequence.
pub fn check_scene_events(actual: &[SceneEvent], expected: &[SceneEvent]) -> Vec<String> {
    check_sequence("event", actual, expected)
}

fn check_sequence<T: PartialEq + std::fmt::Debug>(
    kind: &str,
    actual: &[T],
    expected: &[T],
) -> Vec<String> {
    let mut failures = Vec::new();

    for (index, (actual, expected)) in actual.iter().zip(expected).enumerate() {
        if actual != expected {
            failures.push(format!(
                "[{kind} {index}] expected {expected:?} but got {actual:?}"
            ));
        }
    }

    if actual.len() != expected.len() {
        failures.push(format!(
            "expected {} {kind}s but got {}, unmatched tail {}",
            expected.len(),
            actual.len(),
            if actual.len() > expected.len() {
                format!("{:?}", &actual[expected.len()..])
            } else {
                format!("{:?}", &expected[actual.len()..])
            },
        ));
    }

    failures
}
