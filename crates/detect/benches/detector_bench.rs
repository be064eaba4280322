//! 탐지기 벤치마크
//!
//! 분류/귀속/전체 handle 경로의 처리량을 측정합니다.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use accesswatch_core::pipeline::LineDetector;
use accesswatch_detect::classify::{camera_table, location_table, microphone_table};
use accesswatch_detect::detector::{AccessDetector, DetectorShared};
use accesswatch_detect::notify::NotificationThrottle;
use accesswatch_detect::ratelimit::{MonotonicClock, RateWindow};
use accesswatch_detect::sink::SinkHandle;
use accesswatch_detect::PackageAttributor;

const MIC_LINE: &str =
    "08-27 10:15:01.123 I MediaRecorder: start recording uid=10234 package=com.example.rec";
const NOISE_LINE: &str =
    "08-27 10:15:01.123 I ActivityManager: start proc 1234:com.example.app/u0a123";

fn bench_classify(c: &mut Criterion) {
    let mic = microphone_table().unwrap();
    let location = location_table().unwrap();
    let camera = camera_table().unwrap();

    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(1));

    group.bench_function("mic_hit", |b| {
        b.iter(|| mic.classify(black_box(MIC_LINE)))
    });
    group.bench_function("mic_miss", |b| {
        b.iter(|| mic.classify(black_box(NOISE_LINE)))
    });
    group.bench_function("location_miss", |b| {
        b.iter(|| location.classify(black_box(NOISE_LINE)))
    });
    group.bench_function("camera_miss", |b| {
        b.iter(|| camera.classify(black_box(NOISE_LINE)))
    });

    group.finish();
}

fn bench_attribute(c: &mut Criterion) {
    let attributor = PackageAttributor::new().unwrap();

    let mut group = c.benchmark_group("attribute");
    group.throughput(Throughput::Elements(1));

    group.bench_function("column_scan_hit", |b| {
        b.iter(|| {
            attributor.attribute(black_box(
                "08-27 10:15:01.123 I AudioFlinger: com.example.rec opening input stream ok",
            ))
        })
    });
    group.bench_function("uid_package_hit", |b| {
        b.iter(|| attributor.attribute(black_box("uid=1000 package=com.example.app")))
    });
    group.bench_function("generic_scan_fallback", |b| {
        b.iter(|| attributor.attribute(black_box("op from com.fallback.app")))
    });
    group.bench_function("unknown", |b| {
        b.iter(|| attributor.attribute(black_box("plain text with no identifiers at all")))
    });

    group.finish();
}

fn bench_handle_path(c: &mut Criterion) {
    let shared = DetectorShared {
        attributor: Arc::new(PackageAttributor::new().unwrap()),
        window: RateWindow::new(10_000),
        throttle: Arc::new(NotificationThrottle::new(20_000)),
        sink: SinkHandle::new(),
        clock: MonotonicClock::new(),
        alert_title: "Accesswatch Alert".to_owned(),
    };
    let detector = AccessDetector::microphone(shared).unwrap();

    let mut group = c.benchmark_group("handle");
    group.throughput(Throughput::Elements(1));

    // 첫 방출 이후에는 속도 제한에 걸리는 경로가 지배적이다
    group.bench_function("suppressed_hit", |b| {
        b.iter(|| detector.handle(black_box(MIC_LINE)))
    });
    group.bench_function("prefilter_reject", |b| {
        b.iter(|| {
            if detector.matches(black_box(NOISE_LINE)) {
                detector.handle(black_box(NOISE_LINE));
            }
        })
    });

    group.finish();
}

fn bench_dispatch_scaling(c: &mut Criterion) {
    use accesswatch_detect::DetectorRegistry;

    let mut group = c.benchmark_group("dispatch_scaling");

    for line_count in [1usize, 100, 1000] {
        let shared = DetectorShared {
            attributor: Arc::new(PackageAttributor::new().unwrap()),
            window: RateWindow::new(10_000),
            throttle: Arc::new(NotificationThrottle::new(20_000)),
            sink: SinkHandle::new(),
            clock: MonotonicClock::new(),
            alert_title: "Accesswatch Alert".to_owned(),
        };
        let registry = DetectorRegistry::new(shared.window.clone(), shared.sink.clone());
        registry.register(Arc::new(AccessDetector::location(shared.clone()).unwrap()));
        registry.register(Arc::new(
            AccessDetector::microphone(shared.clone()).unwrap(),
        ));
        registry.register(Arc::new(AccessDetector::camera(shared).unwrap()));

        group.throughput(Throughput::Elements(line_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(line_count),
            &line_count,
            |b, &count| {
                b.iter(|| {
                    for _ in 0..count {
                        registry.dispatch(black_box(NOISE_LINE));
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_classify,
    bench_attribute,
    bench_handle_path,
    bench_dispatch_scaling
);
criterion_main!(benches);
