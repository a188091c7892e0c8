//! # Reporting
//!
//! Diagnosed endpoints as seen from the `/diagnostics` topic and from the
//! Prometheus registry.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Harness, TestMsg};
    use diag_msgs::{DiagnosticArray, Level, ManualClock, Time};
    use diag_telemetry::{encode_metrics, register_metrics, REGISTRATIONS_TOTAL};
    use diagnostic_updater::{Updater, UpdaterConfig, DIAGNOSTICS_TOPIC};
    use interface_diagnostics::{DiagnosedPublisher, DiagnosedSubscriber};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;
    use topic_bus::{MessagePublisher, MessageSubscriber, Subscriber, TopicBus};

    type Reports = Rc<RefCell<Vec<DiagnosticArray>>>;

    fn collect_reports(bus: &TopicBus) -> (Subscriber<DiagnosticArray>, Reports) {
        let reports = Rc::new(RefCell::new(Vec::new()));
        let mut sub = Subscriber::with_topic(bus, DIAGNOSTICS_TOPIC).unwrap();
        let sink = reports.clone();
        sub.register_callback(Box::new(move |array: &Arc<DiagnosticArray>| {
            sink.borrow_mut().push((**array).clone());
        }));
        (sub, reports)
    }

    #[test]
    fn test_reports_follow_endpoint_lifecycle() {
        let h = Harness::new();
        let (mut reports_sub, reports) = collect_reports(&h.bus);
        let scans = h.bus.advertise::<TestMsg>("/scan").unwrap();

        let mut sub = DiagnosedSubscriber::<TestMsg>::new(&h.updater, Subscriber::new()).unwrap();
        sub.min_frequency(2.0).max_time_delay(0.5).unwrap();
        sub.subscribe(&h.bus, "/scan").unwrap();
        let mut cmd = DiagnosedPublisher::<TestMsg>::new(&h.updater);
        cmd.assign(h.bus.advertise("/cmd").unwrap()).unwrap();

        for i in 0..4 {
            scans.publish(h.message(0.1, i));
            cmd.publish(h.message(0.0, i));
        }
        sub.spin_once();
        h.clock.advance_secs(1.0);
        h.updater.force_update();

        sub.unsubscribe();
        drop(cmd);
        h.clock.advance_secs(1.0);
        h.updater.force_update();

        assert_eq!(reports_sub.spin_once(), 2);
        let reports = reports.borrow();

        let first = &reports[0];
        assert_eq!(first.status.len(), 2);
        assert_eq!(first.find("/scan subscriber").unwrap().level, Level::Ok);
        assert_eq!(first.find("/cmd topic status").unwrap().level, Level::Ok);

        assert!(reports[1].status.is_empty());
    }

    #[test]
    fn test_status_names_carry_node_prefix() {
        let clock = ManualClock::new(Time::from_secs(10));
        let bus = TopicBus::new();
        let updater = Updater::builder()
            .config(UpdaterConfig::default().with_node_name("lidar"))
            .clock(Arc::new(clock.clone()))
            .bus(&bus)
            .build()
            .unwrap();

        let mut sub = DiagnosedSubscriber::<TestMsg>::new(&updater, Subscriber::new()).unwrap();
        sub.subscribe(&bus, "/scan").unwrap();

        let array = updater.force_update();
        assert!(array.find("lidar: /scan subscriber").is_some());
        assert_eq!(updater.names(), vec!["/scan subscriber".to_string()]);
    }

    #[test]
    fn test_stale_endpoint_reports_no_events() {
        let h = Harness::new();
        let mut sub = DiagnosedSubscriber::<TestMsg>::new(&h.updater, Subscriber::new()).unwrap();
        sub.min_frequency(1.0);
        sub.subscribe(&h.bus, "/scan").unwrap();
        h.clock.advance_secs(2.0);

        let array = h.updater.force_update();
        let status = array.find("/scan subscriber").unwrap();
        assert_eq!(status.level, Level::Error);
        assert!(status.message.contains("No events recorded."));
    }

    #[test]
    fn test_registrations_are_counted() {
        register_metrics().unwrap();
        let h = Harness::new();
        let before = REGISTRATIONS_TOTAL.get();

        let mut sub = DiagnosedSubscriber::<TestMsg>::new(&h.updater, Subscriber::new()).unwrap();
        sub.subscribe(&h.bus, "/a").unwrap();
        sub.subscribe(&h.bus, "/b").unwrap();

        // Counters are process wide; other tests only add to them.
        assert!(REGISTRATIONS_TOTAL.get() >= before + 2);
        let text = encode_metrics().unwrap();
        assert!(text.contains("diag_registrations_total"));
        assert!(text.contains("diag_registrations_active"));
    }
}
