//! 탐지기 레지스트리
//!
//! 탐지기 집합, 활성화 상태, 공유 속도 제한 윈도우를 소유하는
//! 명시적으로 구성되는 컨텍스트 객체입니다. 전역 싱글턴이 아니며,
//! 리더 루프와 설정 핸들러에 값으로 전달됩니다.
//!
//! 디스패치 순서는 등록 순서입니다. 한 라인이 여러 카테고리의
//! 탐지기에서 처리될 수 있습니다.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use accesswatch_core::pipeline::{EventSink, LineDetector};

use crate::ratelimit::RateWindow;
use crate::sink::SinkHandle;

/// 탐지기 레지스트리
pub struct DetectorRegistry {
    /// 등록 순서를 유지하는 탐지기 목록
    detectors: RwLock<Vec<Arc<dyn LineDetector>>>,
    /// 모든 탐지기가 공유하는 속도 제한 윈도우
    window: RateWindow,
    /// 교체 가능한 싱크 핸들
    sink: SinkHandle,
}

impl DetectorRegistry {
    /// 공유 윈도우와 싱크 핸들로 빈 레지스트리를 생성합니다.
    pub fn new(window: RateWindow, sink: SinkHandle) -> Self {
        Self {
            detectors: RwLock::new(Vec::new()),
            window,
            sink,
        }
    }

    /// 탐지기를 등록합니다.
    ///
    /// 식별자 기준으로 멱등합니다. 같은 id가 이미 있으면 그 자리를
    /// 교체하여 디스패치 순서를 보존하고, 없으면 끝에 추가합니다.
    pub fn register(&self, detector: Arc<dyn LineDetector>) {
        let mut detectors = self
            .detectors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let id = detector.id().to_owned();
        match detectors.iter().position(|d| d.id() == id) {
            Some(pos) => {
                detectors[pos] = detector;
                info!(detector = %id, "detector re-registered");
            }
            None => {
                detectors.push(detector);
                info!(detector = %id, "detector registered");
            }
        }
    }

    /// 탐지기를 활성화하거나 비활성화합니다. 알 수 없는 id는 무시합니다.
    pub fn set_enabled(&self, id: &str, enabled: bool) {
        let detectors = self
            .detectors
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match detectors.iter().find(|d| d.id() == id) {
            Some(detector) => detector.set_enabled(enabled),
            None => warn!(detector = id, "set_enabled for unknown detector ignored"),
        }
    }

    /// 탐지기의 활성화 여부를 반환합니다. 알 수 없는 id는 false입니다.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.detectors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|d| d.id() == id)
            .is_some_and(|d| d.is_enabled())
    }

    /// 공유 속도 제한 윈도우를 갱신합니다.
    ///
    /// 이후의 모든 속도 제한 결정에 즉시 적용됩니다. 0은 무시합니다.
    pub fn update_window(&self, ms: u64) {
        if ms == 0 {
            warn!("ignoring rate window update of 0ms");
            return;
        }
        self.window.set(ms);
        info!(window_ms = ms, "rate window updated");
    }

    /// 현재 속도 제한 윈도우(밀리초)를 반환합니다.
    pub fn window_ms(&self) -> u64 {
        self.window.get()
    }

    /// 이벤트 싱크를 교체합니다. `None`은 싱크 제거입니다.
    pub fn replace_sink(&self, sink: Option<Arc<dyn EventSink>>) {
        self.sink.replace(sink);
        info!("event sink replaced");
    }

    /// 라인 하나를 활성화된 모든 탐지기에 순서대로 디스패치합니다.
    ///
    /// 비활성화된 탐지기는 건너뛰며 호출되지 않습니다. 사전 필터를
    /// 통과한 탐지기만 `handle`을 수행합니다.
    pub fn dispatch(&self, line: &str) {
        let detectors = self
            .detectors
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for detector in detectors.iter() {
            if detector.is_enabled() && detector.matches(line) {
                detector.handle(line);
            }
        }
    }

    /// 등록된 탐지기 id 목록을 등록 순서대로 반환합니다.
    pub fn detector_ids(&self) -> Vec<String> {
        self.detectors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|d| d.id().to_owned())
            .collect()
    }

    /// 등록된 탐지기 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.detectors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// 레지스트리가 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
