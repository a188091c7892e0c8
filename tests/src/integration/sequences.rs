//! # Randomised Re-subscribe Sequences
//!
//! Drives one adapter through arbitrary sequences of identity changes and
//! checks after every step that the updater holds exactly the entry the
//! adapter's current binding calls for, and that add/remove calls never
//! leave more than one registration outstanding.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Harness, TestMsg};
    use interface_diagnostics::{
        publisher_diagnostic_name, subscriber_diagnostic_name, DiagnosedPublisher,
        DiagnosedSubscriber,
    };
    use proptest::prelude::*;
    use topic_bus::Subscriber;

    const TOPICS: [&str; 3] = ["/alpha", "/beta", "/gamma"];

    #[derive(Debug, Clone)]
    enum SubOp {
        Subscribe(usize),
        Resubscribe,
        Unsubscribe,
        MaxTimeDelay(f64),
        MinFrequency(f64),
        Recreate,
    }

    #[derive(Debug, Clone)]
    enum PubOp {
        Assign(usize),
        MaxTimeDelay(f64),
        Publish,
        Recreate,
    }

    fn sub_op() -> impl Strategy<Value = SubOp> {
        prop_oneof![
            (0..TOPICS.len()).prop_map(SubOp::Subscribe),
            Just(SubOp::Resubscribe),
            Just(SubOp::Unsubscribe),
            (0.0f64..5.0).prop_map(SubOp::MaxTimeDelay),
            (0.0f64..50.0).prop_map(SubOp::MinFrequency),
            Just(SubOp::Recreate),
        ]
    }

    fn pub_op() -> impl Strategy<Value = PubOp> {
        prop_oneof![
            (0..TOPICS.len()).prop_map(PubOp::Assign),
            (0.0f64..5.0).prop_map(PubOp::MaxTimeDelay),
            Just(PubOp::Publish),
            Just(PubOp::Recreate),
        ]
    }

    fn new_subscriber(h: &Harness) -> DiagnosedSubscriber<TestMsg> {
        DiagnosedSubscriber::new(&h.updater, Subscriber::new()).unwrap()
    }

    proptest! {
        #[test]
        fn subscriber_registration_tracks_binding(ops in prop::collection::vec(sub_op(), 1..40)) {
            let h = Harness::new();
            let mut sub = new_subscriber(&h);
            let mut last: Option<usize> = None;
            let mut bound = false;

            for op in ops {
                match op {
                    SubOp::Subscribe(i) => {
                        sub.subscribe(&h.bus, TOPICS[i]).unwrap();
                        last = Some(i);
                        bound = true;
                    }
                    SubOp::Resubscribe => {
                        sub.resubscribe().unwrap();
                        bound = last.is_some();
                    }
                    SubOp::Unsubscribe => {
                        sub.unsubscribe();
                        bound = false;
                    }
                    SubOp::MaxTimeDelay(delay) => {
                        sub.max_time_delay(delay).unwrap();
                    }
                    SubOp::MinFrequency(freq) => {
                        sub.min_frequency(freq);
                    }
                    SubOp::Recreate => {
                        drop(sub);
                        prop_assert!(h.updater.is_empty());
                        sub = new_subscriber(&h);
                        last = None;
                        bound = false;
                    }
                }

                let expected: Vec<String> = match (bound, last) {
                    (true, Some(i)) => vec![subscriber_diagnostic_name(TOPICS[i])],
                    _ => Vec::new(),
                };
                prop_assert_eq!(h.updater.names(), expected.clone());
                prop_assert_eq!(h.observer.outstanding(), expected.len() as i64);
                prop_assert!(h.observer.peak() <= 1);
            }

            drop(sub);
            prop_assert!(h.updater.is_empty());
            prop_assert_eq!(h.observer.outstanding(), 0);
        }

        #[test]
        fn publisher_registration_tracks_assignment(ops in prop::collection::vec(pub_op(), 1..40)) {
            let h = Harness::new();
            let mut publisher = DiagnosedPublisher::<TestMsg>::new(&h.updater);
            let mut assigned: Option<usize> = None;

            for op in ops {
                match op {
                    PubOp::Assign(i) => {
                        publisher.assign(h.bus.advertise(TOPICS[i]).unwrap()).unwrap();
                        assigned = Some(i);
                    }
                    PubOp::MaxTimeDelay(delay) => {
                        publisher.max_time_delay(delay).unwrap();
                    }
                    PubOp::Publish => {
                        publisher.publish(h.message(0.0, 0));
                    }
                    PubOp::Recreate => {
                        drop(publisher);
                        prop_assert!(h.updater.is_empty());
                        publisher = DiagnosedPublisher::new(&h.updater);
                        assigned = None;
                    }
                }

                let expected: Vec<String> = assigned
                    .map(|i| publisher_diagnostic_name(TOPICS[i]))
                    .into_iter()
                    .collect();
                prop_assert_eq!(h.updater.names(), expected.clone());
                prop_assert_eq!(h.observer.outstanding(), expected.len() as i64);
                prop_assert!(h.observer.peak() <= 1);
                prop_assert_eq!(
                    publisher.topic(),
                    assigned.map_or("", |i| TOPICS[i])
                );
            }
        }
    }
}
