/// Failure notification module
///
/// Turns a failing check into a request against the configured
/// notification endpoint:
/// - `template` substitutes the failure details into the body
/// - `notifier` clones the shared template and dispatches it
pub mod notifier;
pub mod template;

pub use notifier::Notifier;
pub use template::{ErrorReport, replace_variables};
