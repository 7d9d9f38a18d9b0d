use models::{ConfigDocument, MuteTimeInterval, Receiver, Route};
use quickcheck::{Arbitrary, Gen};
use std::time::Duration;

const RECEIVERS: &[&str] = &["email", "pager", "slack", "webhook"];
const INTERVALS: &[&str] = &["nights", "weekends", "holidays"];

/// A candidate policy tree and the configuration it's validated against.
/// Names are drawn from small alphabets so that references both resolve
/// and dangle with high frequency.
#[derive(Clone, Debug)]
struct Case {
    tree: Route,
    doc: ConfigDocument,
}

fn gen_range(g: &mut Gen, n: usize) -> usize {
    <usize as Arbitrary>::arbitrary(g) % n
}

fn gen_route(g: &mut Gen, depth: usize, is_root: bool) -> Route {
    let receiver = if is_root || bool::arbitrary(g) {
        Some(RECEIVERS[gen_range(g, RECEIVERS.len())].to_string())
    } else {
        None
    };
    let repeat_interval = match gen_range(g, 4) {
        0 => Some(Duration::ZERO),
        1 => Some(Duration::from_secs(3600)),
        _ => None,
    };
    let mute_time_intervals = (0..gen_range(g, 3))
        .map(|_| INTERVALS[gen_range(g, INTERVALS.len())].to_string())
        .collect();
    let routes = if depth == 0 {
        Vec::new()
    } else {
        (0..gen_range(g, 3))
            .map(|_| gen_route(g, depth - 1, false))
            .collect()
    };

    Route {
        receiver,
        repeat_interval,
        mute_time_intervals,
        routes,
        ..Default::default()
    }
}

impl Arbitrary for Case {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut doc = models::decode(models::DEFAULT_CONFIGURATION).unwrap();
        doc.alertmanager_config.receivers = RECEIVERS
            .iter()
            .filter(|_| gen_range(g, 4) != 0)
            .map(|name| Receiver::new(*name))
            .collect();
        doc.alertmanager_config.mute_time_intervals = INTERVALS
            .iter()
            .filter(|_| gen_range(g, 4) != 0)
            .map(|name| MuteTimeInterval::new(*name))
            .collect();

        Self {
            tree: gen_route(g, 3, true),
            doc,
        }
    }
}

/// Independent statement of when a tree is valid.
fn expect_valid(tree: &Route, doc: &ConfigDocument) -> bool {
    let mut valid = true;
    tree.walk(&mut |route| {
        if let Some(receiver) = &route.receiver {
            valid &= doc.receiver(receiver).is_some();
        }
        for name in &route.mute_time_intervals {
            valid &= doc.mute_time_interval(name).is_some();
        }
        valid &= route.repeat_interval != Some(Duration::ZERO);
    });
    valid
}

#[test]
fn validation_succeeds_iff_references_resolve_and_intervals_are_positive() {
    fn prop(case: Case) -> bool {
        let outcome = validation::validate_policy_tree(&case.tree, &case.doc);
        outcome.is_ok() == expect_valid(&case.tree, &case.doc)
    }

    quickcheck::QuickCheck::new()
        .tests(1000)
        .quickcheck(prop as fn(Case) -> bool);
}

#[test]
fn each_dangling_reference_is_reported_once() {
    fn prop(case: Case) -> bool {
        let mut expect = 0;
        case.tree.walk(&mut |route| {
            if let Some(receiver) = &route.receiver {
                expect += case.doc.receiver(receiver).is_none() as usize;
            }
            for name in &route.mute_time_intervals {
                expect += case.doc.mute_time_interval(name).is_none() as usize;
            }
            expect += (route.repeat_interval == Some(Duration::ZERO)) as usize;
        });

        match validation::validate_policy_tree(&case.tree, &case.doc) {
            Ok(()) => expect == 0,
            Err(errors) => errors.len() == expect,
        }
    }

    quickcheck::QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Case) -> bool);
}
