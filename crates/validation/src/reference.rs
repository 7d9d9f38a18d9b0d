use super::{Error, Errors, Scope};

/// Verify that `ref_name` is exactly one of `names`, or push an error which
/// suggests the closest defined name if there's a plausible one.
pub fn walk_reference<'a, I>(
    scope: Scope,
    entity: &'static str,
    ref_name: &str,
    names: I,
    errors: &mut Errors,
) where
    I: Iterator<Item = &'a str> + Clone,
{
    if names.clone().any(|name| name == ref_name) {
        return;
    }

    let closest = names
        .filter_map(|name| {
            let dist = strsim::osa_distance(ref_name, name);

            if dist <= 4 {
                Some((dist, name))
            } else {
                None
            }
        })
        .min();

    if let Some((_, suggest_name)) = closest {
        Error::NoSuchEntitySuggest {
            entity,
            name: ref_name.to_string(),
            suggest_name: suggest_name.to_string(),
        }
        .push(scope, errors);
    } else {
        Error::NoSuchEntity {
            entity,
            name: ref_name.to_string(),
        }
        .push(scope, errors);
    }
}
