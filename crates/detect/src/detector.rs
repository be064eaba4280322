//! 카테고리별 접근 탐지기
//!
//! [`AccessDetector`]는 패턴 테이블, 귀속기, 속도 제한기, 알림
//! 스로틀, 싱크 핸들을 하나로 묶은 제네릭 구조입니다. 카테고리마다
//! 클래스를 복제하는 대신 (패턴 테이블, 아이콘, 레이블)로
//! 매개변수화된 한 구조를 세 번 구성합니다.
//!
//! `matches`는 정규식 평가 전에 라인을 걸러내는 값싼 부분 문자열
//! 사전 필터입니다. 사전 필터를 통과한 라인만 `handle`에서 분류됩니다.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use metrics::counter;
use tracing::{debug, info};

use accesswatch_core::event::{AccessEvent, AlertEvent};
use accesswatch_core::metrics::{
    DETECT_ALERTS_EMITTED_TOTAL, DETECT_ALERTS_THROTTLED_TOTAL, DETECT_EVENTS_EMITTED_TOTAL,
    DETECT_EVENTS_SUPPRESSED_TOTAL, LABEL_CATEGORY,
};
use accesswatch_core::pipeline::LineDetector;
use accesswatch_core::types::Category;

use crate::attribute::PackageAttributor;
use crate::classify::{self, PatternTable};
use crate::error::DetectError;
use crate::notify::NotificationThrottle;
use crate::ratelimit::{EventRateLimiter, MonotonicClock, RateWindow};
use crate::sink::SinkHandle;

/// 위치 탐지기 사전 필터 부분 문자열
const LOCATION_PREFILTER: &[&str] = &["Location", "FusedLocation", "Gnss:onGnssLocationCb"];

/// 마이크 탐지기 사전 필터 부분 문자열
const MICROPHONE_PREFILTER: &[&str] = &[
    "#audio#",
    "RecognitionClient",
    "MediaRecorder",
    "MediaCodec",
    "CCodec",
    "AudioRecord",
    "SoundTrigger",
    "MPEG4Writer",
    "mic_input",
    "AudioInputStreamProducer",
    "SodaSpeechRecognizer",
    "NetworkSpeechRecognizer",
];

/// 카메라 탐지기 사전 필터 부분 문자열
const CAMERA_PREFILTER: &[&str] = &[
    "Camera",
    "camera",
    "ICamera",
    "Torch",
    "MediaRecorder",
    "CaptureSession",
    "CaptureRequest",
    "MediaCodec",
    "CCodec",
];

/// 탐지기들이 공유하는 협력자 묶음
///
/// 귀속기, 속도 제한 윈도우, 알림 스로틀, 싱크, 시계는 레지스트리가
/// 한 번 구성하고 모든 탐지기에 나눠줍니다.
#[derive(Clone)]
pub struct DetectorShared {
    /// 패키지 귀속기
    pub attributor: Arc<PackageAttributor>,
    /// 공유 속도 제한 윈도우
    pub window: RateWindow,
    /// 카테고리 단위 알림 스로틀
    pub throttle: Arc<NotificationThrottle>,
    /// 이벤트 싱크 핸들
    pub sink: SinkHandle,
    /// 단조 시계
    pub clock: MonotonicClock,
    /// 알림 제목
    pub alert_title: String,
}

/// 한 카테고리의 접근 탐지기
pub struct AccessDetector {
    category: Category,
    prefilter: &'static [&'static str],
    table: PatternTable,
    limiter: EventRateLimiter,
    shared: DetectorShared,
    enabled: AtomicBool,
}

impl AccessDetector {
    fn build(
        category: Category,
        prefilter: &'static [&'static str],
        table: PatternTable,
        shared: DetectorShared,
    ) -> Self {
        Self {
            category,
            prefilter,
            table,
            limiter: EventRateLimiter::new(shared.window.clone()),
            shared,
            enabled: AtomicBool::new(true),
        }
    }

    /// 위치 탐지기를 생성합니다.
    pub fn location(shared: DetectorShared) -> Result<Self, DetectError> {
        Ok(Self::build(
            Category::Location,
            LOCATION_PREFILTER,
            classify::location_table()?,
            shared,
        ))
    }

    /// 마이크 탐지기를 생성합니다.
    pub fn microphone(shared: DetectorShared) -> Result<Self, DetectError> {
        Ok(Self::build(
            Category::Microphone,
            MICROPHONE_PREFILTER,
            classify::microphone_table()?,
            shared,
        ))
    }

    /// 카메라 탐지기를 생성합니다.
    pub fn camera(shared: DetectorShared) -> Result<Self, DetectError> {
        Ok(Self::build(
            Category::Camera,
            CAMERA_PREFILTER,
            classify::camera_table()?,
            shared,
        ))
    }

    /// 카테고리 id로 탐지기를 생성합니다.
    pub fn for_category(category: Category, shared: DetectorShared) -> Result<Self, DetectError> {
        match category {
            Category::Location => Self::location(shared),
            Category::Microphone => Self::microphone(shared),
            Category::Camera => Self::camera(shared),
        }
    }

    /// 탐지 카테고리를 반환합니다.
    pub fn category(&self) -> Category {
        self.category
    }

    fn alert_body(category: Category) -> &'static str {
        match category {
            Category::Location => "Location accessed. Check the monitor for details.",
            Category::Microphone => "Microphone accessed. Check the monitor for details.",
            Category::Camera => "Camera accessed. Check the monitor for details.",
        }
    }
}

impl LineDetector for AccessDetector {
    fn id(&self) -> &str {
        self.category.id()
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        info!(detector = self.id(), enabled, "detector toggled");
    }

    fn matches(&self, line: &str) -> bool {
        self.prefilter.iter().any(|needle| line.contains(needle))
    }

    fn handle(&self, line: &str) {
        let Some(kind) = self.table.classify(line) else {
            return;
        };
        let package = self.shared.attributor.attribute(line);
        let now = self.shared.clock.now_ms();
        // 메트릭 레이블 값은 'static이어야 한다
        let category: &'static str = self.category.id();

        if !self.limiter.should_emit(&package, kind, now) {
            debug!(category, package, kind = %kind, "event suppressed by rate limiter");
            counter!(DETECT_EVENTS_SUPPRESSED_TOTAL, LABEL_CATEGORY => category).increment(1);
            return;
        }
        self.limiter.record(&package, kind, now);

        let event = AccessEvent::new(self.category, package, kind);
        info!(
            category,
            package = %event.package,
            kind = %kind,
            trace_id = %event.metadata.trace_id,
            "access event emitted"
        );
        self.shared.sink.emit_line(&event.message);
        counter!(DETECT_EVENTS_EMITTED_TOTAL, LABEL_CATEGORY => category).increment(1);

        if self.shared.throttle.try_acquire(category, now) {
            let alert = AlertEvent::with_trace(
                self.category,
                self.shared.alert_title.clone(),
                Self::alert_body(self.category),
                event.metadata.trace_id.clone(),
            );
            self.shared.sink.emit_alert(&alert.title, &alert.message);
            counter!(DETECT_ALERTS_EMITTED_TOTAL, LABEL_CATEGORY => category).increment(1);
        } else {
            debug!(category, "alert throttled");
            counter!(DETECT_ALERTS_THROTTLED_TOTAL, LABEL_CATEGORY => category).increment(1);
        }
    }
}
