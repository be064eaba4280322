//! 메트릭 상수 등록
//!
//! 모든 메트릭의 이름을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`
//! 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `accesswatch_`
//! - 모듈명: `reader_`, `detect_`
//! - 접미어: `_total` (counter), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(accesswatch_core::metrics::READER_LINES_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 탐지 카테고리 레이블 키 (location, microphone, camera)
pub const LABEL_CATEGORY: &str = "category";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Reader 메트릭 ────────────────────────────────────────────────

/// Reader: 읽어들인 전체 라인 수 (counter)
pub const READER_LINES_TOTAL: &str = "accesswatch_reader_lines_total";

/// Reader: 자기 식별 마커로 건너뛴 라인 수 (counter)
pub const READER_LINES_SKIPPED_TOTAL: &str = "accesswatch_reader_lines_skipped_total";

// ─── Detect 메트릭 ────────────────────────────────────────────────

/// Detect: 방출된 접근 이벤트 수 (counter, label: category)
pub const DETECT_EVENTS_EMITTED_TOTAL: &str = "accesswatch_detect_events_emitted_total";

/// Detect: 속도 제한으로 억제된 이벤트 수 (counter, label: category)
pub const DETECT_EVENTS_SUPPRESSED_TOTAL: &str = "accesswatch_detect_events_suppressed_total";

/// Detect: 방출된 알림 수 (counter, label: category)
pub const DETECT_ALERTS_EMITTED_TOTAL: &str = "accesswatch_detect_alerts_emitted_total";

/// Detect: 알림 스로틀로 억제된 알림 수 (counter, label: category)
pub const DETECT_ALERTS_THROTTLED_TOTAL: &str = "accesswatch_detect_alerts_throttled_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// `metrics::describe_counter!()`를 호출하여 익스포터의 HELP 텍스트를
/// 설정합니다. 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 일반적으로 `accesswatch-daemon`의 시작 시점에서 호출합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    // Reader
    describe_counter!(
        READER_LINES_TOTAL,
        "Total number of lines read from the log source process"
    );
    describe_counter!(
        READER_LINES_SKIPPED_TOTAL,
        "Total number of lines skipped by self-identifying markers"
    );

    // Detect
    describe_counter!(
        DETECT_EVENTS_EMITTED_TOTAL,
        "Total number of access events emitted per category"
    );
    describe_counter!(
        DETECT_EVENTS_SUPPRESSED_TOTAL,
        "Total number of access events suppressed by the rate limiter"
    );
    describe_counter!(
        DETECT_ALERTS_EMITTED_TOTAL,
        "Total number of user alerts emitted per category"
    );
    describe_counter!(
        DETECT_ALERTS_THROTTLED_TOTAL,
        "Total number of user alerts suppressed by the notification throttle"
    );
}
