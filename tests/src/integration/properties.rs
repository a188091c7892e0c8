//! # Registration Lifecycle Guarantees
//!
//! Each test drives the adapters against an instrumented updater and checks
//! the table after every step.
//!
//! 1. no double registration across re-subscribes
//! 2. dropping an adapter restores the table
//! 3. unsubscribe clears the registration; later messages are ignored
//! 4. publishing before assignment is safe and leaves the table alone
//! 5. `min_frequency` survives re-subscription
//! 6. re-subscribe replaces, never leaks

#[cfg(test)]
mod tests {
    use crate::fixtures::{Harness, TestMsg};
    use diag_msgs::Level;
    use interface_diagnostics::{DiagnosedPublisher, DiagnosedSubscriber};
    use topic_bus::{MessagePublisher, Subscriber};

    fn subscriber(h: &Harness) -> DiagnosedSubscriber<TestMsg> {
        DiagnosedSubscriber::new(&h.updater, Subscriber::new()).unwrap()
    }

    // =========================================================================
    // NO DOUBLE REGISTRATION
    // =========================================================================

    #[test]
    fn test_single_entry_across_resubscribes() {
        let h = Harness::new();
        let mut sub = subscriber(&h);

        for topic in ["/a", "/b", "/a", "/c", "/c"] {
            sub.subscribe(&h.bus, topic).unwrap();
            assert_eq!(h.updater.names(), vec![format!("{topic} subscriber")]);
        }
    }

    #[test]
    fn test_only_current_decorators_registered() {
        let h = Harness::new();
        let mut left = subscriber(&h);
        let mut right = subscriber(&h);

        left.subscribe(&h.bus, "/left").unwrap();
        right.subscribe(&h.bus, "/right").unwrap();
        left.subscribe(&h.bus, "/left2").unwrap();
        drop(right);

        assert_eq!(h.updater.names(), vec!["/left2 subscriber".to_string()]);
    }

    // =========================================================================
    // DEREGISTRATION ON DROP
    // =========================================================================

    #[test]
    fn test_subscriber_drop_restores_count() {
        let h = Harness::new();
        h.updater.add_fn("unrelated", |_| {}).unwrap();
        let before = h.updater.len();

        let mut sub = subscriber(&h);
        sub.subscribe(&h.bus, "/scan").unwrap();
        assert_eq!(h.updater.len(), before + 1);
        drop(sub);

        assert_eq!(h.updater.len(), before);
        assert!(h.updater.contains("unrelated"));
    }

    #[test]
    fn test_publisher_drop_restores_count() {
        let h = Harness::new();
        let before = h.updater.len();

        let mut publisher = DiagnosedPublisher::<TestMsg>::new(&h.updater);
        publisher.assign(h.bus.advertise("/cmd").unwrap()).unwrap();
        assert_eq!(h.updater.len(), before + 1);
        drop(publisher);

        assert_eq!(h.updater.len(), before);
        assert_eq!(h.observer.outstanding(), 0);
    }

    // =========================================================================
    // UNSUBSCRIBE CLEARS REGISTRATION
    // =========================================================================

    #[test]
    fn test_unsubscribe_removes_exactly_one() {
        let h = Harness::new();
        let mut sub = subscriber(&h);
        sub.subscribe(&h.bus, "/scan").unwrap();
        let subscribed = h.updater.len();

        sub.unsubscribe();
        assert_eq!(h.updater.len(), subscribed - 1);
        assert!(!h.updater.contains("/scan subscriber"));
    }

    #[test]
    fn test_messages_after_unsubscribe_are_ignored() {
        let h = Harness::new();
        let publisher = h.bus.advertise::<TestMsg>("/scan").unwrap();
        let mut sub = subscriber(&h);
        sub.subscribe(&h.bus, "/scan").unwrap();
        publisher.publish(h.message(0.0, 1));

        sub.unsubscribe();
        publisher.publish(h.message(0.0, 2));
        assert_eq!(sub.spin_once(), 0);
        sub.unsubscribe();
        assert!(h.updater.is_empty());
    }

    #[test]
    fn test_message_without_registration_is_noop() {
        let h = Harness::new();
        let publisher = h.bus.advertise::<TestMsg>("/scan").unwrap();
        let mut owner = subscriber(&h);
        owner.subscribe(&h.bus, "/scan").unwrap();

        // Bound to the topic, but the name is taken: no registration.
        let mut shadow = subscriber(&h);
        assert!(shadow.subscribe(&h.bus, "/scan").is_err());
        assert!(!shadow.is_registered());

        publisher.publish(h.message(0.0, 1));
        assert_eq!(shadow.spin_once(), 1);
        assert_eq!(owner.spin_once(), 1);
        h.clock.advance_secs(1.0);

        let array = h.updater.force_update();
        let status = array.find("/scan subscriber").unwrap();
        assert_eq!(status.value("Events in window"), Some("1"));
    }

    // =========================================================================
    // PUBLISH WITHOUT ENDPOINT
    // =========================================================================

    #[test]
    fn test_unassigned_publish_touches_nothing() {
        let h = Harness::new();
        let publisher = DiagnosedPublisher::<TestMsg>::new(&h.updater);

        assert_eq!(publisher.publish(h.message(0.0, 1)), 0);
        assert_eq!(publisher.publish_shared(h.message(0.0, 2).into()), 0);
        assert_eq!(h.observer.adds(), 0);
        assert_eq!(h.observer.removes(), 0);
        assert_eq!(h.observer.misses(), 0);
        assert!(h.updater.is_empty());
    }

    // =========================================================================
    // THRESHOLD ROUND-TRIP
    // =========================================================================

    #[test]
    fn test_min_frequency_carried_to_new_topic() {
        let h = Harness::new();
        let mut sub = subscriber(&h);
        sub.min_frequency(5.0);
        sub.subscribe(&h.bus, "/a").unwrap();
        sub.subscribe(&h.bus, "/b").unwrap();
        h.clock.advance_secs(1.0);

        let array = h.updater.force_update();
        let status = array.find("/b subscriber").unwrap();
        assert_eq!(status.value("Minimum acceptable frequency (Hz)"), Some("5"));
        assert_eq!(status.level, Level::Error);
    }

    #[test]
    fn test_min_frequency_carried_across_max_time_delay() {
        let h = Harness::new();
        let publisher = h.bus.advertise::<TestMsg>("/scan").unwrap();
        let mut sub = subscriber(&h);
        sub.subscribe(&h.bus, "/scan").unwrap();
        sub.min_frequency(5.0).max_time_delay(1.0).unwrap();

        for i in 0..3 {
            publisher.publish(h.message(0.1, i));
        }
        sub.spin_once();
        h.clock.advance_secs(1.0);

        let array = h.updater.force_update();
        let status = array.find("/scan subscriber").unwrap();
        assert_eq!(status.level, Level::Warn);
        assert!(status.message.contains("Frequency too low."));
    }

    // =========================================================================
    // RE-SUBSCRIBE REPLACES, NEVER LEAKS
    // =========================================================================

    #[test]
    fn test_add_remove_balance_at_every_step() {
        let h = Harness::new();
        let mut sub = subscriber(&h);

        sub.subscribe(&h.bus, "/a").unwrap();
        assert_eq!(h.observer.outstanding(), 1);
        sub.subscribe(&h.bus, "/b").unwrap();
        assert_eq!(h.observer.outstanding(), 1);
        sub.max_time_delay(0.5).unwrap();
        assert_eq!(h.observer.outstanding(), 1);
        sub.resubscribe().unwrap();
        assert_eq!(h.observer.outstanding(), 1);

        assert_eq!(h.observer.peak(), 1);
        assert_eq!(h.observer.adds(), 4);
        assert_eq!(h.observer.removes(), 3);
        assert!(h.updater.contains("/b subscriber"));
        assert!(!h.updater.contains("/a subscriber"));
    }

    #[test]
    fn test_publisher_reassign_balance() {
        let h = Harness::new();
        let mut publisher = DiagnosedPublisher::<TestMsg>::new(&h.updater);

        publisher.assign(h.bus.advertise("/a").unwrap()).unwrap();
        publisher.assign(h.bus.advertise("/b").unwrap()).unwrap();
        publisher.max_time_delay(0.5).unwrap();

        assert_eq!(h.observer.outstanding(), 1);
        assert_eq!(h.observer.peak(), 1);
        assert_eq!(h.updater.names(), vec!["/b topic status".to_string()]);
    }
}
