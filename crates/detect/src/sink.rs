//! 교체 가능한 이벤트 싱크 핸들
//!
//! 싱크는 레지스트리 구성 시 주입되며, 설정 갱신 시 단일 동기화
//! 지점에서 교체됩니다. 전역 정적 참조를 두지 않습니다.
//!
//! 싱크 호출 실패는 파이프라인 내부 상태에 영향을 주지 않아야 하므로,
//! 핸들이 에러를 이 자리에서 로그로 남기고 삼킵니다. 속도 제한 기록은
//! 싱크 전달 여부와 무관하게 유지됩니다.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::warn;

use accesswatch_core::pipeline::EventSink;

/// 싱크 참조를 보관하는 공유 핸들
///
/// 복제는 같은 싱크 슬롯을 가리키는 핸들을 만듭니다. 싱크가 설정되지
/// 않은 동안의 방출은 조용히 버려집니다.
#[derive(Clone, Default)]
pub struct SinkHandle {
    slot: Arc<RwLock<Option<Arc<dyn EventSink>>>>,
}

impl SinkHandle {
    /// 빈 핸들을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 주어진 싱크로 초기화된 핸들을 생성합니다.
    pub fn with_sink(sink: Arc<dyn EventSink>) -> Self {
        let handle = Self::new();
        handle.replace(Some(sink));
        handle
    }

    /// 보관된 싱크를 교체합니다. `None`은 싱크 제거입니다.
    pub fn replace(&self, sink: Option<Arc<dyn EventSink>>) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = sink;
    }

    /// 싱크가 설정되어 있는지 확인합니다.
    pub fn is_attached(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// 포맷된 로그 레코드를 싱크로 전달합니다.
    ///
    /// 단방향 fire-and-forget입니다. 전달 실패는 경고 로그만 남기고
    /// 무시합니다.
    pub fn emit_line(&self, line: &str) {
        let sink = self
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(sink) = sink {
            if let Err(e) = sink.on_line(line) {
                warn!(error = %e, "sink rejected log record");
            }
        }
    }

    /// 알림을 싱크로 전달합니다.
    ///
    /// `emit_line`과 같은 규약입니다.
    pub fn emit_alert(&self, title: &str, message: &str) {
        let sink = self
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(sink) = sink {
            if let Err(e) = sink.on_alert(title, message) {
                warn!(error = %e, "sink rejected alert");
            }
        }
    }
}
