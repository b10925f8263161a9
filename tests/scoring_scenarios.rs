//! End-to-end scoring against the bundled model artifact.

use std::path::PathBuf;

use phish_shield::logic::features::layout::idx;
use phish_shield::logic::features::FEATURE_COUNT;
use phish_shield::logic::model::{artifact, ModelArtifact, ModelError};
use phish_shield::logic::policy::{Label, OverrideTable, PolicyConfig, VerdictSource};
use phish_shield::logic::scoring::{ArtifactSources, ScoringConfig, ScoringService, Snapshot};
use phish_shield::logic::url::ParseStatus;
use once_cell::sync::Lazy;
use proptest::prelude::*;

fn models_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models")
}

fn sources() -> ArtifactSources {
    ArtifactSources {
        model_path: models_dir().join("url_model.json"),
        overrides_path: Some(models_dir().join("overrides.json")),
        overrides_enabled: true,
        override_confidence: None,
    }
}

fn service() -> ScoringService {
    ScoringService::from_sources(sources(), ScoringConfig::default()).unwrap()
}

/// Shared read-only instance for property tests
static SHARED: Lazy<ScoringService> = Lazy::new(service);

#[test]
fn google_is_safe() {
    let a = service().score("https://www.google.com");
    assert_eq!(a.status, ParseStatus::Parsed);
    assert_eq!(a.hostname, "www.google.com");
    assert_eq!(a.features.get(idx::NO_HTTPS), Some(0.0));
    assert_eq!(a.verdict.label, Label::Safe);
    assert_eq!(a.verdict.source, VerdictSource::Model);
    assert!(a.verdict.probability < 0.5);
    assert_eq!(a.verdict.risk_score, 0.0);
}

#[test]
fn override_host_is_forced() {
    let a = service().score("http://testsafebrowsing.appspot.com");
    assert_eq!(a.verdict.label, Label::Phishing);
    assert_eq!(a.verdict.confidence, 92.0);
    assert_eq!(a.verdict.source, VerdictSource::Override);
    assert!(a.evaluation.is_none());
}

#[test]
fn override_ignores_features() {
    let service = service();
    for path in ["", "/", "/anything", "/login/account/verify?x=1&y=2", "/~a_b%20c@d"] {
        let a = service.score(&format!("http://testsafebrowsing.appspot.com{}", path));
        assert_eq!(a.verdict.label, Label::Phishing, "path {:?}", path);
        assert_eq!(a.verdict.confidence, 92.0);
    }
}

#[test]
fn override_confidence_comes_from_table_or_env() {
    let custom = ArtifactSources { override_confidence: Some(80.0), ..sources() };
    let service = ScoringService::from_sources(custom, ScoringConfig::default()).unwrap();
    assert_eq!(service.snapshot().overrides.confidence, 80.0);

    let a = service.score("http://testsafebrowsing.appspot.com");
    assert_eq!(a.verdict.confidence, 80.0);
    assert!((a.verdict.probability - 0.8).abs() < 1e-6);
    assert!((a.verdict.risk_score - 20.0).abs() < 1e-4);

    // Threshold changes leave the override confidence alone
    let strict = ScoringConfig { policy: PolicyConfig::new(0.9).unwrap(), ..Default::default() };
    let a = ScoringService::from_sources(sources(), strict).unwrap().score("http://testsafebrowsing.appspot.com");
    assert_eq!(a.verdict.confidence, 92.0);
}

#[test]
fn override_matches_idn_host() {
    let service = service();
    service
        .swap_overrides(OverrideTable::new().with_host("bücher.de", Label::Phishing))
        .unwrap();

    let a = service.score("http://bücher.de/anything");
    assert_eq!(a.status, ParseStatus::Parsed);
    assert_eq!(a.hostname, "bücher.de");
    assert_eq!(a.verdict.label, Label::Phishing);
    assert_eq!(a.verdict.source, VerdictSource::Override);

    let b = service.score("http://BÜCHER.DE/");
    assert_eq!(b.verdict.source, VerdictSource::Override);
}

#[test]
fn empty_url_yields_degenerate_verdict() {
    let a = service().score("");
    assert!(!a.has_input());
    assert_eq!(a.hostname, "");
    assert_eq!(a.features.as_slice().len(), FEATURE_COUNT);
    assert_eq!(a.features.get(idx::URL_LENGTH), Some(0.0));
    assert_eq!(a.features.get(idx::NUM_DOTS), Some(0.0));
    assert_eq!(a.features.get(idx::NO_HTTPS), Some(1.0));
    assert!(a.verdict.probability.is_finite());
}

#[test]
fn ip_login_scores_above_baseline() {
    let service = service();
    let baseline = service.score("https://www.google.com");
    let a = service.score("http://192.168.0.1/login");

    assert_eq!(a.features.get(idx::IP_ADDRESS), Some(1.0));
    assert!(a.features.get(idx::NUM_SENSITIVE_WORDS).unwrap() >= 1.0);
    assert_eq!(a.features.get(idx::NO_HTTPS), Some(1.0));
    assert!(a.verdict.probability > baseline.verdict.probability);
    assert_eq!(a.verdict.label, Label::Phishing);
}

#[test]
fn short_vector_is_rejected_by_model() {
    let service = service();
    let snapshot = service.snapshot();
    let err = snapshot.model.model.evaluate(&[0.0; FEATURE_COUNT - 1]).unwrap_err();
    assert_eq!(
        err,
        ModelError::FeatureCountMismatch { expected: FEATURE_COUNT, actual: FEATURE_COUNT - 1 }
    );
}

#[test]
fn sensitive_words_never_lower_the_score() {
    let service = service();
    let snapshot = service.snapshot();
    let model = &snapshot.model.model;
    let mut v = service.score("http://example.com/a").features;
    let mut last = f32::NEG_INFINITY;
    for n in 0..5 {
        v.set(idx::NUM_SENSITIVE_WORDS, n as f32);
        let raw = model.evaluate_vector(&v).raw_score;
        assert!(raw >= last);
        last = raw;
    }
}

#[test]
fn threshold_is_configurable() {
    let strict = ScoringConfig { policy: PolicyConfig::new(0.35).unwrap(), ..Default::default() };
    let lenient = ScoringConfig { policy: PolicyConfig::new(0.99).unwrap(), ..Default::default() };
    let url = "http://192.168.0.1/login";

    let a = ScoringService::from_sources(sources(), strict).unwrap().score(url);
    let b = ScoringService::from_sources(sources(), lenient).unwrap().score(url);
    assert_eq!(a.verdict.probability, b.verdict.probability);
    assert_eq!(a.verdict.label, Label::Phishing);
    assert_eq!(b.verdict.label, Label::Safe);
}

#[test]
fn disabled_overrides_fall_back_to_model() {
    let sources = ArtifactSources { overrides_enabled: false, ..sources() };
    let service = ScoringService::from_sources(sources, ScoringConfig::default()).unwrap();
    let a = service.score("http://testsafebrowsing.appspot.com");
    assert_eq!(a.verdict.source, VerdictSource::Model);
}

#[test]
fn missing_override_file_means_empty_table() {
    let sources = ArtifactSources {
        overrides_path: Some(models_dir().join("does-not-exist.json")),
        ..sources()
    };
    let service = ScoringService::from_sources(sources, ScoringConfig::default()).unwrap();
    assert!(service.snapshot().overrides.is_empty());
}

#[test]
fn missing_model_is_fatal() {
    let sources = ArtifactSources { model_path: models_dir().join("nope.json"), ..sources() };
    assert!(ScoringService::from_sources(sources, ScoringConfig::default()).is_err());
}

#[test]
fn reload_picks_up_new_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    let overrides_path = dir.path().join("overrides.json");

    let bundled = artifact::load(&models_dir().join("url_model.json")).unwrap();
    artifact::save(&model_path, &ModelArtifact::from_model("v1", &bundled.model)).unwrap();

    let sources = ArtifactSources {
        model_path: model_path.clone(),
        overrides_path: Some(overrides_path.clone()),
        overrides_enabled: true,
        override_confidence: None,
    };
    let service = ScoringService::from_sources(sources, ScoringConfig::default()).unwrap();
    assert_eq!(service.snapshot().model.metadata.name, "v1");
    assert_eq!(service.score("https://bank.example").verdict.source, VerdictSource::Model);

    artifact::save(&model_path, &ModelArtifact::from_model("v2", &bundled.model)).unwrap();
    std::fs::write(&overrides_path, r#"{"hosts": {"bank.example": "safe"}}"#).unwrap();

    let next = service.reload().unwrap();
    assert_eq!(next.model.metadata.name, "v2");
    assert_eq!(service.score("https://bank.example").verdict.source, VerdictSource::Override);

    // Corrupt artifact: reload fails, v2 keeps serving
    std::fs::write(&model_path, b"{ not json").unwrap();
    assert!(service.reload().is_err());
    assert_eq!(service.snapshot().model.metadata.name, "v2");
}

#[test]
fn in_flight_snapshot_survives_swap() {
    let service = service();
    let held: std::sync::Arc<Snapshot> = service.snapshot();
    service
        .swap_overrides(OverrideTable::new().with_host("www.google.com", Label::Phishing))
        .unwrap();
    assert_eq!(held.overrides.lookup("www.google.com"), None);
    assert_eq!(service.score("https://www.google.com").verdict.label, Label::Phishing);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn score_is_deterministic(url in ".{0,300}") {
        let a = SHARED.score(&url);
        let b = SHARED.score(&url);
        prop_assert_eq!(a.verdict, b.verdict);
        prop_assert_eq!(a.features, b.features);
    }

    #[test]
    fn verdict_fields_stay_in_range(url in "(https?://)?[a-z0-9.@/_~%-]{0,120}") {
        let v = SHARED.score(&url).verdict;
        prop_assert!((0.0..=1.0).contains(&v.probability));
        prop_assert!((0.0..=100.0).contains(&v.confidence));
        prop_assert!((0.0..=100.0).contains(&v.risk_score));
    }
}
