#![cfg(test)]

use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use subrecon_common::wordlist::Wordlist;

use crate::stubs::*;

const LABELS: &[&str] = &["www", "api", "mail", "vpn", "dev", "cdn", "git", "ci", "db", "ns1"];

fn random_case(name: &str) -> String {
    name.chars()
        .map(|c| if rand::random::<bool>() { c.to_ascii_uppercase() } else { c })
        .collect()
}

/***** Store invariants *****/

#[tokio::test]
async fn every_discovered_name_is_inside_the_domain() {
    let mut cfg = config();
    cfg.active = false;
    cfg.validate = false;

    let noisy = seed(&[
        "www.example.com",
        "example.com",
        "example.com.evil.org",
        "notexample.com",
        "other.org",
        "*.api.example.com",
        "deep.api.example.com",
    ]);
    let mut service = service(cfg, Arc::new(StubResolver::new(&[]))).with_collectors(noisy);

    let report = service.run().await;

    assert!(!report.discovered.is_empty());
    for name in &report.discovered {
        assert!(name.as_str().ends_with(".example.com"), "{name} escaped the domain");
        assert_eq!(name.as_str(), name.as_str().to_ascii_lowercase());
    }
    let discovered = names(&report.discovered);
    assert!(!discovered.contains(&"example.com".to_string()));
    assert!(!discovered.contains(&"notexample.com".to_string()));
}

#[tokio::test]
async fn concurrent_case_variants_are_stored_once() {
    let service = service(config(), Arc::new(StubResolver::new(&[])));
    let store = Arc::clone(service.candidates());

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            for label in LABELS {
                store.add(&random_case(&format!("{label}.example.com")));
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.len(), LABELS.len());
    let stored: HashSet<String> = store.snapshot().iter().map(|h| h.as_str().to_string()).collect();
    for label in LABELS {
        assert!(stored.contains(&format!("{label}.example.com")));
    }
}

/***** Validation invariants *****/

#[tokio::test]
async fn validated_names_are_always_discovered_names() {
    for _ in 0..5 {
        let mut cfg = config();
        cfg.active = false;

        let all: Vec<String> = LABELS.iter().map(|l| format!("{l}.example.com")).collect();
        let live: Vec<&str> = all
            .iter()
            .filter(|_| rand::random::<bool>())
            .map(String::as_str)
            .collect();
        let hosts: Vec<&str> = all.iter().map(String::as_str).collect();

        let mut service = service(cfg, Arc::new(StubResolver::new(&[])))
            .with_collectors(seed(&hosts))
            .with_validator(Arc::new(StubResolver::new(&live)));

        let report = service.run().await;

        let discovered: HashSet<_> = report.discovered.iter().collect();
        assert!(report.validated.iter().all(|h| discovered.contains(h)));
        assert_eq!(report.validated.len(), live.len());
    }
}

#[tokio::test]
async fn names_found_during_validation_are_not_validated() {
    let mut cfg = config();
    cfg.active = false;

    let service = service(cfg, Arc::new(StubResolver::new(&[])))
        .with_collectors(seed(&["www.example.com", "api.example.com"]));
    let validator = GrowingValidator::new(Arc::clone(service.candidates()), "late.example.com");
    let mut service = service.with_validator(Arc::new(validator));

    let report = service.run().await;

    assert_eq!(names(&report.validated), vec!["api.example.com", "www.example.com"]);
    assert_eq!(
        names(&report.discovered),
        vec!["api.example.com", "late.example.com", "www.example.com"]
    );
}

#[tokio::test]
async fn skipping_validation_keeps_every_name() {
    let mut cfg = config();
    cfg.active = false;
    cfg.validate = false;

    let validator = Arc::new(StubResolver::new(&[]));
    let mut service = service(cfg, Arc::new(StubResolver::new(&[])))
        .with_collectors(seed(&["a.example.com", "b.example.com"]))
        .with_validator(validator.clone());

    let report = service.run().await;

    assert_eq!(report.validated, report.discovered);
    assert_eq!(report.validated.len(), 2);
    assert_eq!(validator.lookups.load(Ordering::SeqCst), 0);
}

/***** Concurrency bound *****/

#[tokio::test]
async fn probes_never_exceed_the_thread_count() {
    let mut cfg = config();
    cfg.passive = false;
    cfg.validate = false;
    cfg.threads = 5;

    let words: Vec<String> = (0..120).map(|i| format!("host{i}")).collect();
    let resolver = Arc::new(StubResolver::new(&["host7.example.com"]).with_random_delay(5));
    let mut service = service(cfg, resolver.clone()).with_wordlist(Wordlist::from_words(&words));

    let report = service.run().await;

    let peak = resolver.peak.load(Ordering::SeqCst);
    assert!(peak >= 1 && peak <= 5, "peak concurrency was {peak}");
    assert!(names(&report.discovered).contains(&"host7.example.com".to_string()));
}
