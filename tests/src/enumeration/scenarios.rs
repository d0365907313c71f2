#![cfg(test)]

use std::sync::atomic::Ordering;
use std::sync::Arc;

use subrecon_common::wordlist::Wordlist;
use subrecon_core::enumeration::Stage;
use subrecon_core::sources::Collector;

use crate::stubs::*;

/***** Passive collection *****/

#[tokio::test]
async fn passive_names_are_normalized_and_deduplicated() {
    let mut cfg = config();
    cfg.active = false;
    cfg.validate = false;

    let ct = StaticCollector::new(
        "crt.sh",
        &["www.example.com", "api.example.com", "WWW.example.com"],
    );
    let mut service = service(cfg, Arc::new(StubResolver::new(&[])))
        .with_collectors(vec![ct.clone() as Arc<dyn Collector>]);

    let report = service.run().await;

    assert_eq!(names(&report.discovered), vec!["api.example.com", "www.example.com"]);
    assert_eq!(report.validated, report.discovered);
    assert_eq!(ct.calls.load(Ordering::SeqCst), 1);
    assert_eq!(service.stage(), Stage::Done);
}

#[tokio::test]
async fn failing_collectors_do_not_stop_later_ones() {
    let mut cfg = config();
    cfg.active = false;
    cfg.validate = false;

    let failing = Arc::new(FailingCollector::default());
    let later = StaticCollector::new("later", &["ok.example.com"]);
    let mut service = service(cfg, Arc::new(StubResolver::new(&[]))).with_collectors(vec![
        failing.clone() as Arc<dyn Collector>,
        Arc::new(PanickingCollector),
        later.clone(),
    ]);

    let report = service.run().await;

    assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    assert_eq!(later.calls.load(Ordering::SeqCst), 1);
    assert_eq!(names(&report.discovered), vec!["ok.example.com"]);
}

#[tokio::test]
async fn passive_only_never_probes() {
    let mut cfg = config();
    cfg.active = false;
    cfg.validate = false;

    let resolver = Arc::new(StubResolver::new(&[]));
    let mut service = service(cfg, resolver.clone())
        .with_wordlist(Wordlist::from_words(["www", "mail"]))
        .with_collectors(seed(&[]));

    let report = service.run().await;

    assert!(report.discovered.is_empty());
    assert_eq!(resolver.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn every_run_starts_from_an_empty_store() {
    let mut cfg = config();
    cfg.active = false;
    cfg.validate = false;

    let rotating = RotatingCollector::new(&[&["first.example.com"], &["second.example.com"]]);
    let mut service = service(cfg, Arc::new(StubResolver::new(&[])))
        .with_collectors(vec![rotating as Arc<dyn Collector>]);

    let first = service.run().await;
    assert_eq!(names(&first.discovered), vec!["first.example.com"]);
    assert_eq!(service.stage(), Stage::Done);

    let second = service.run().await;
    assert_eq!(names(&second.discovered), vec!["second.example.com"]);
    assert_eq!(names(&second.validated), vec!["second.example.com"]);
    assert_eq!(service.stage(), Stage::Done);
    assert!(!service.candidates().contains("first.example.com"));
}

/***** Active collection *****/

#[tokio::test]
async fn brute_force_adds_only_resolving_words() {
    let mut cfg = config();
    cfg.passive = false;
    cfg.validate = false;

    let mut service = service(cfg, Arc::new(StubResolver::new(&["www.example.com"])))
        .with_wordlist(Wordlist::from_words(["www", "mail"]));

    let report = service.run().await;

    assert_eq!(names(&report.discovered), vec!["www.example.com"]);
}

#[tokio::test]
async fn brute_force_respects_the_wordlist_cap() {
    let mut cfg = config();
    cfg.passive = false;
    cfg.validate = false;
    cfg.max_wordlist = 1;

    let resolver = Arc::new(StubResolver::new(&["www.example.com", "mail.example.com"]));
    let mut service = service(cfg, resolver)
        .with_wordlist(Wordlist::from_words(["www", "mail"]));

    let report = service.run().await;

    assert_eq!(names(&report.discovered), vec!["www.example.com"]);
}

#[tokio::test]
async fn zone_transfer_names_go_through_the_store() {
    let mut cfg = config();
    cfg.passive = false;
    cfg.validate = false;

    let zone = StaticZone {
        names: vec![
            "example.com".to_string(),
            "NS1.example.com.".to_string(),
            "www.example.com".to_string(),
            "evil.org".to_string(),
        ],
    };
    let mut service =
        service(cfg, Arc::new(StubResolver::new(&[]))).with_zone_transfer(Arc::new(zone));

    let report = service.run().await;

    assert_eq!(names(&report.discovered), vec!["ns1.example.com", "www.example.com"]);
}

#[tokio::test]
async fn refused_zone_transfer_still_runs_brute_force() {
    let mut cfg = config();
    cfg.passive = false;
    cfg.validate = false;

    let mut service = service(cfg, Arc::new(StubResolver::new(&["vpn.example.com"])))
        .with_zone_transfer(Arc::new(RefusingZone))
        .with_wordlist(Wordlist::from_words(["vpn"]));

    let report = service.run().await;

    assert_eq!(names(&report.discovered), vec!["vpn.example.com"]);
}

/***** Hidden expansion *****/

#[tokio::test]
async fn hidden_variants_are_probed_from_known_names() {
    let mut cfg = config();
    cfg.active = false;
    cfg.validate = false;

    let resolver = StubResolver::new(&["dev-staging.example.com", "qa-dev.example.com"]);
    let mut service = service(cfg, Arc::new(resolver))
        .with_collectors(seed(&["dev.example.com"]));

    let report = service.run().await;

    assert_eq!(
        names(&report.discovered),
        vec!["dev-staging.example.com", "dev.example.com", "qa-dev.example.com"]
    );
}

/***** Validation and reporting *****/

#[tokio::test]
async fn validation_uses_the_validator() {
    let mut cfg = config();
    cfg.active = false;

    let mut service = service(cfg, Arc::new(StubResolver::new(&[])))
        .with_collectors(seed(&["www.example.com", "old.example.com"]))
        .with_validator(Arc::new(StubResolver::new(&["www.example.com"])));

    let report = service.run().await;

    assert_eq!(names(&report.discovered), vec!["old.example.com", "www.example.com"]);
    assert_eq!(names(&report.validated), vec!["www.example.com"]);
    assert_eq!(service.validated().len(), 1);
}

#[tokio::test]
async fn every_sink_gets_the_report_once() {
    let mut cfg = config();
    cfg.active = false;
    cfg.validate = false;

    let recording = Arc::new(RecordingSink::default());
    let mut service = service(cfg, Arc::new(StubResolver::new(&[])))
        .with_collectors(seed(&["www.example.com"]))
        .with_sink(Arc::new(BrokenSink))
        .with_sink(recording.clone());

    let report = service.run().await;

    let reports = recording.reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0], report);
    assert_eq!(reports[0].domain.as_str(), "example.com");
}
