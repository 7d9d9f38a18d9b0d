mod errors;
mod reference;
mod route;
mod scope;

pub use errors::{Error, Errors, ScopedError};
pub use scope::Scope;

/// Validate a candidate notification policy tree against the receivers and
/// mute time intervals of the configuration `doc` into which it will be written.
///
/// All violations are returned, ordered by a pre-order walk of the tree.
/// Neither the tree nor the document are modified.
pub fn validate_policy_tree(
    root: &models::Route,
    doc: &models::ConfigDocument,
) -> Result<(), Errors> {
    let mut errors = Errors::new();
    route::walk_policy_tree(root, doc.receivers(), doc.mute_time_intervals(), &mut errors);
    errors.into_result()
}
