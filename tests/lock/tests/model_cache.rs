//! Model cache over the committed artifact.
//!
//! Proves:
//! 1. Many threads resolving the same id share one loaded model
//! 2. Cached and freshly loaded models score identically
//! 3. Replacing the file behind an id is picked up after invalidation

use std::sync::Arc;
use std::time::Duration;

use lock_tests::scenario::SCENARIO_SPIKE;
use lock_tests::workspace::host_telemetry_artifact;
use reconscore_harness::artifact_file::load_artifact_file;
use reconscore_harness::cache::ModelCache;
use reconscore_harness::config::CacheConfig;
use reconscore_kernel::score::evaluate;

#[test]
fn threads_share_one_model() {
    let cache = Arc::new(ModelCache::new(&CacheConfig::default()));
    let path = host_telemetry_artifact();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let path = path.clone();
            std::thread::spawn(move || {
                let model = cache.get_or_load("host", &path).unwrap();
                evaluate(&model, &SCENARIO_SPIKE).unwrap().residual_magnitude.to_bits()
            })
        })
        .collect();
    let bits: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(bits.windows(2).all(|w| w[0] == w[1]));

    let stats = cache.stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hits + stats.misses, 8);

    let fresh = load_artifact_file(&path).unwrap();
    assert_eq!(
        evaluate(&fresh, &SCENARIO_SPIKE).unwrap().residual_magnitude.to_bits(),
        bits[0]
    );
}

#[test]
fn invalidation_picks_up_new_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::copy(host_telemetry_artifact(), &path).unwrap();

    let cache = ModelCache::with_limits(4, usize::MAX, Duration::from_secs(3600));
    let before = cache.get_or_load("host", &path).unwrap();

    let mut doc = before.to_json_value();
    doc["thresholds"]["reconstruction_error"] = 9.0_f64.into();
    std::fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

    // Still cached: same path, not expired.
    let cached = cache.get_or_load("host", &path).unwrap();
    assert!(Arc::ptr_eq(&before, &cached));

    assert!(cache.invalidate("host"));
    let after = cache.get_or_load("host", &path).unwrap();
    assert!((after.threshold() - 9.0).abs() < f64::EPSILON);
    assert_ne!(after.digest(), before.digest());
}
