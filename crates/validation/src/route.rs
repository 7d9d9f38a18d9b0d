use super::{reference, Error, Errors, Scope};
use models::{MuteTimeInterval, Receiver, Route};

pub fn walk_policy_tree(
    root: &Route,
    receivers: &[Receiver],
    mute_time_intervals: &[MuteTimeInterval],
    errors: &mut Errors,
) {
    let scope = Scope::root();

    if root.receiver.as_deref().map_or(true, str::is_empty) {
        Error::RootReceiverMissing.push(scope, errors);
    }
    walk_route(scope, root, receivers, mute_time_intervals, errors);
}

fn walk_route(
    scope: Scope,
    route: &Route,
    receivers: &[Receiver],
    mute_time_intervals: &[MuteTimeInterval],
    errors: &mut Errors,
) {
    if matches!(route.repeat_interval, Some(d) if d.is_zero()) {
        Error::RepeatIntervalNotPositive.push(scope.push_prop("repeat_interval"), errors);
    }

    // An empty receiver of a child route is treated as absent.
    match route.receiver.as_deref() {
        None | Some("") => (),
        Some(receiver) => reference::walk_reference(
            scope.push_prop("receiver"),
            "receiver",
            receiver,
            receivers.iter().map(|r| r.name.as_str()),
            errors,
        ),
    }

    let intervals_scope = scope.push_prop("mute_time_intervals");
    for (index, name) in route.mute_time_intervals.iter().enumerate() {
        reference::walk_reference(
            intervals_scope.push_item(index),
            "mute time interval",
            name,
            mute_time_intervals.iter().map(|m| m.name.as_str()),
            errors,
        );
    }

    let routes_scope = scope.push_prop("routes");
    for (index, child) in route.routes.iter().enumerate() {
        walk_route(
            routes_scope.push_item(index),
            child,
            receivers,
            mute_time_intervals,
            errors,
        );
    }
}
